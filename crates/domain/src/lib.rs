mod checkout;
mod product;
mod reminder_message;
mod shared;
mod urgency;
mod user;
mod view_event;

pub use checkout::checkout_link;
pub use product::Product;
pub use reminder_message::{ChannelKind, InvalidChannelKindError, ReminderMessage};
pub use shared::email::validate_email;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use urgency::Urgency;
pub use user::User;
pub use view_event::{distinct_viewed_products, ViewEvent};

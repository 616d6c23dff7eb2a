mod composer;
mod sms;

pub use composer::{
    ComposeRequest, ComposerError, IMessageComposer, OpenAiComposer, TemplateComposer,
};
pub use sms::{DeliveryError, DeliveryReceipt, ISmsSender, TwilioSmsApi, UnconfiguredSms};

use nudge_domain::{ViewEvent, ID};
use serde::{Deserialize, Serialize};

/// Wire shape of a recorded view. Field names are the service's published
/// contract, so no serde renaming here.
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewEventDTO {
    pub view_id: ID,
    pub user_id: Option<ID>,
    pub product_id: String,
    pub timestamp: String,
}

impl ViewEventDTO {
    pub fn new(event: ViewEvent) -> Self {
        Self {
            timestamp: event.viewed_at_rfc3339(),
            view_id: event.id,
            user_id: event.user_id,
            product_id: event.product_id,
        }
    }
}

use super::dtos::ViewEventDTO;
use serde::{Deserialize, Serialize};

pub mod record_view {
    use super::*;

    /// Fields arrive as `Option` so that "missing" and "empty" produce the
    /// service's own validation errors instead of serde's.
    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub user_email: Option<String>,
        pub product_id: Option<String>,
        pub product_name: Option<String>,
        pub timestamp: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub data: ViewEventDTO,
    }

    impl APIResponse {
        pub fn new(data: ViewEventDTO) -> Self {
            Self {
                success: true,
                data,
            }
        }
    }
}

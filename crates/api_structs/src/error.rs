use serde::{Deserialize, Serialize};

/// Stable JSON error body: `{ "error": ... }` with optional `details`
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

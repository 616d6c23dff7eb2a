use serde::{Deserialize, Serialize};

/// Counters for one scanner tick
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TickSummaryDTO {
    pub users_scanned: usize,
    pub skipped_cooldown: usize,
    pub skipped_error: usize,
    pub users_processed: usize,
    pub messages_recorded: usize,
}

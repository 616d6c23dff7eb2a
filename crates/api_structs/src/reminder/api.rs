use super::dtos::TickSummaryDTO;
use serde::{Deserialize, Serialize};

pub mod run_scan {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub summary: TickSummaryDTO,
    }

    impl APIResponse {
        pub fn new(summary: TickSummaryDTO) -> Self {
            Self { summary }
        }
    }
}

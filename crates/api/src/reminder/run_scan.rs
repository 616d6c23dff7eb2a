use super::scan_abandoned_carts::{ScanAbandonedCartsUseCase, TickSummary, UseCaseError};
use crate::error::NudgeError;
use crate::shared::usecase::execute;
use actix_web::{web, HttpResponse};
use nudge_api_structs::dtos::TickSummaryDTO;
use nudge_api_structs::run_scan::APIResponse;
use nudge_infra::NudgeContext;

/// Manual trigger: runs one scanner tick synchronously and returns its
/// summary. Mostly useful for operations and black-box tests.
pub async fn run_scan_controller(
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let usecase = ScanAbandonedCartsUseCase;

    execute(usecase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::new(to_dto(summary))))
        .map_err(NudgeError::from)
}

fn to_dto(summary: TickSummary) -> TickSummaryDTO {
    TickSummaryDTO {
        users_scanned: summary.users_scanned,
        skipped_cooldown: summary.skipped_cooldown,
        skipped_error: summary.skipped_error,
        users_processed: summary.users_processed,
        messages_recorded: summary.messages_recorded,
    }
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventFetch(details) => Self::PersistenceFailure(details),
            UseCaseError::TickInProgress => {
                Self::Conflict("A scan tick is already in progress".into())
            }
        }
    }
}

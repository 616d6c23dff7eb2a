use crate::reminder::scan_abandoned_carts::ScanAbandonedCartsUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use nudge_infra::NudgeContext;
use std::time::Duration;

/// Periodically scans for abandoned carts. The first tick fires immediately
/// at startup, then on the configured fixed interval. Ticks never overlap:
/// the usecase holds the context-wide scanner lock while running and refuses
/// reentry, which also covers concurrent manual triggers.
pub fn start_abandoned_cart_scanner(ctx: NudgeContext) {
    actix_web::rt::spawn(async move {
        let mut tick_interval =
            interval(Duration::from_secs(ctx.config.scan_interval_minutes * 60));
        loop {
            tick_interval.tick().await;

            let usecase = ScanAbandonedCartsUseCase;
            let _ = execute(usecase, &ctx).await;
        }
    });
}

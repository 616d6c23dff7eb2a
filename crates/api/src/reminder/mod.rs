mod run_scan;
pub mod scan_abandoned_carts;

use actix_web::web;
use run_scan::run_scan_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/scan", web::post().to(run_scan_controller));
}

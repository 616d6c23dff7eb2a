mod record_view;

use actix_web::web;
use record_view::record_view_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/views", web::post().to(record_view_controller));
}

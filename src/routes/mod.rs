use actix_web::web;

pub mod admin;
pub mod api;
pub mod backend_health;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);
    api::init_api_routes(cfg);
    admin::init_admin_routes(cfg);
}

pub mod backend_health_handler;
pub mod catalog_handler;
pub mod participation_handler;

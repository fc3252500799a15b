use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::PgPool;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
mod middleware;
pub mod db;
pub mod participation;
pub mod telemetry;

use crate::config::jwt::JwtSettings;
use crate::db::{CatalogQueries, PgParticipationStore};
use crate::participation::ParticipationService;
use crate::routes::init_routes;

pub use crate::middleware::auth::Claims;

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool.clone());
    let jwt_settings = web::Data::new(jwt_settings);
    let catalog = web::Data::new(CatalogQueries::new(db_pool.clone()));
    let participations = web::Data::new(ParticipationService::new(
        PgParticipationStore::new(db_pool),
    ));

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(db_pool_data.clone())
            .app_data(jwt_settings.clone())
            .app_data(catalog.clone())
            .app_data(participations.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

use actix_web::{get, web, Responder};
use sqlx::PgPool;

use crate::handlers::backend_health_handler::backend_health_check;

#[get("/backend_health")]
async fn backend_health(pool: web::Data<PgPool>) -> impl Responder {
    backend_health_check(pool).await
}

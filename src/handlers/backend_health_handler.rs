use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// Reports UP when the database answers a trivial query.
pub async fn backend_health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "UP" })),
        Err(e) => {
            tracing::error!("Health check could not reach the database: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "DOWN" }))
        }
    }
}

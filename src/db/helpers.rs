//! Helpers that turn database results into handler responses.
//!
//! - Fetching a required record (NotFound if missing)
//! - Inserting a row whose foreign keys may point nowhere (NotFound for the referenced entity)
//!
//! # Usage
//!
//! ```ignore
//! let fixture = ok_or_return!(require_record(catalog.get_match(id).await, "Match not found"));
//! ```

use actix_web::HttpResponse;

use crate::models::common::ApiResponse;
use crate::participation::store::{self, StoreError};

/// Macro for handlers returning `Result<HttpResponse>`.
/// Converts a `DbResult<T>` to return `Ok(error_response)` on error.
#[macro_export]
macro_rules! ok_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(response) => return Ok(response),
        }
    };
}

/// Result type for database operations that return an HttpResponse on error
pub type DbResult<T> = Result<T, HttpResponse>;

fn database_error(e: &sqlx::Error) -> HttpResponse {
    tracing::error!("Database error: {}", e);
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
}

/// Unwrap an optional database result, returning NotFound if None.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> DbResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(not_found_message))),
        Err(e) => Err(database_error(&e)),
    }
}

/// Unwrap the result of an insert. A foreign key violation means the
/// referenced entity is missing and becomes NotFound.
pub fn insert_result<T>(result: Result<T, sqlx::Error>) -> DbResult<T> {
    match result {
        Ok(record) => Ok(record),
        Err(e) => match StoreError::from(e) {
            StoreError::ForeignKeyViolation { constraint } => {
                let message = match store::referenced_entity(&constraint) {
                    Some(entity) => format!("{} not found", entity),
                    None => "Referenced record not found".to_string(),
                };
                tracing::info!("Insert rejected by {}", constraint);
                Err(HttpResponse::NotFound().json(ApiResponse::<()>::error(message)))
            }
            StoreError::Database(e) => Err(database_error(&e)),
            other => {
                tracing::error!("Constraint violation: {}", other);
                Err(HttpResponse::Conflict().json(ApiResponse::<()>::error(other.to_string())))
            }
        },
    }
}

/// Unwrap a database result, returning InternalServerError on error.
pub fn db_result<T>(result: Result<T, sqlx::Error>) -> DbResult<T> {
    result.map_err(|e| database_error(&e))
}

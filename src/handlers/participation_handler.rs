// src/handlers/participation_handler.rs
//
// Handlers shared by match participants and match scores; routes pick the
// record kind through the type parameter.
use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::db::participation_queries::PgPayload;
use crate::db::PgParticipationStore;
use crate::models::common::{ApiResponse, RemovedCount};
use crate::models::participation::{CreateParticipationRequest, UpdateParticipationRequest};
use crate::participation::{ParticipationError, ParticipationService};

pub type PgParticipationService = ParticipationService<PgParticipationStore>;

// POST /admin/match-participants
pub async fn create_participation<P>(
    service: web::Data<PgParticipationService>,
    body: web::Json<CreateParticipationRequest<P>>,
) -> Result<HttpResponse, ParticipationError>
where
    P: PgPayload + DeserializeOwned,
{
    let record = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        format!("{} created", P::RECORD),
        record,
    )))
}

// POST /admin/match-participants/bulk
pub async fn bulk_create_participations<P>(
    service: web::Data<PgParticipationService>,
    body: web::Json<Vec<CreateParticipationRequest<P>>>,
) -> Result<HttpResponse, ParticipationError>
where
    P: PgPayload + DeserializeOwned,
{
    let records = service.bulk_create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        format!("{} {} records created", records.len(), P::RECORD),
        records,
    )))
}

// GET /api/match-participants/{id}
pub async fn get_participation<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    let view = service.find_by_id::<P>(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(format!("{} found", P::RECORD), view)))
}

// GET /api/matches/{id}/participants
pub async fn list_for_match<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    let views = service.find_by_match::<P>(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match entries", views)))
}

// GET /api/teams/{id}/participations
pub async fn list_for_team<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    let views = service.find_by_team::<P>(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team entries", views)))
}

// GET /api/players/{id}/participations
pub async fn list_for_player<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    let views = service.find_by_player::<P>(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player entries", views)))
}

// PATCH /admin/match-participants/{id}
pub async fn update_participation<P>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateParticipationRequest<P::Changes>>,
) -> Result<HttpResponse, ParticipationError>
where
    P: PgPayload,
    P::Changes: DeserializeOwned,
{
    let record = service
        .update::<P>(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        format!("{} updated", P::RECORD),
        record,
    )))
}

// DELETE /admin/match-participants/{id}
pub async fn delete_participation<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    service.remove::<P>(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// DELETE /admin/matches/{id}/participants
pub async fn delete_for_match<P: PgPayload>(
    service: web::Data<PgParticipationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ParticipationError> {
    let removed = service.remove_by_match::<P>(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        format!("Removed {} {} records", removed, P::RECORD),
        RemovedCount { removed },
    )))
}

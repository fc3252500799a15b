// src/handlers/catalog_handler.rs
use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::db::helpers::{db_result, insert_result, require_record};
use crate::db::CatalogQueries;
use crate::middleware::auth::Claims;
use crate::models::catalog::{
    CreateMatchRequest, CreatePlayerRequest, CreateTeamRequest, CreateTournamentRequest,
};
use crate::models::common::ApiResponse;
use crate::ok_or_return;

fn invalid(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

// POST /admin/tournaments
#[tracing::instrument(
    name = "Create tournament",
    skip(catalog, body, claims),
    fields(username = %claims.username)
)]
pub async fn create_tournament(
    catalog: web::Data<CatalogQueries>,
    body: web::Json<CreateTournamentRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(invalid(message));
    }
    let tournament = ok_or_return!(db_result(catalog.create_tournament(&body).await));
    Ok(HttpResponse::Created().json(ApiResponse::success("Tournament created", tournament)))
}

// GET /api/tournaments/{id}
pub async fn get_tournament(
    catalog: web::Data<CatalogQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tournament = ok_or_return!(require_record(
        catalog.get_tournament(path.into_inner()).await,
        "Tournament not found"
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Tournament found", tournament)))
}

// POST /admin/matches
#[tracing::instrument(
    name = "Create match",
    skip(catalog, body, claims),
    fields(username = %claims.username, tournament_id = %body.tournament_id)
)]
pub async fn create_match(
    catalog: web::Data<CatalogQueries>,
    body: web::Json<CreateMatchRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(invalid(message));
    }
    let fixture = ok_or_return!(insert_result(catalog.create_match(&body).await));
    Ok(HttpResponse::Created().json(ApiResponse::success("Match created", fixture)))
}

// GET /api/matches/{id}
pub async fn get_match(
    catalog: web::Data<CatalogQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let fixture = ok_or_return!(require_record(
        catalog.get_match(path.into_inner()).await,
        "Match not found"
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match found", fixture)))
}

// DELETE /admin/matches/{id}
#[tracing::instrument(name = "Delete match", skip(catalog, claims), fields(username = %claims.username))]
pub async fn delete_match(
    catalog: web::Data<CatalogQueries>,
    path: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    if ok_or_return!(db_result(catalog.delete_match(match_id).await)) {
        tracing::info!("Deleted match {} with its participants and scores", match_id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Match not found")))
    }
}

// POST /admin/teams
pub async fn create_team(
    catalog: web::Data<CatalogQueries>,
    body: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(invalid(message));
    }
    let team = ok_or_return!(db_result(catalog.create_team(&body).await));
    Ok(HttpResponse::Created().json(ApiResponse::success("Team created", team)))
}

// GET /api/teams/{id}
pub async fn get_team(
    catalog: web::Data<CatalogQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let team = ok_or_return!(require_record(
        catalog.get_team(path.into_inner()).await,
        "Team not found"
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team found", team)))
}

// POST /admin/players
pub async fn create_player(
    catalog: web::Data<CatalogQueries>,
    body: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(invalid(message));
    }
    let player = ok_or_return!(insert_result(catalog.create_player(&body).await));
    Ok(HttpResponse::Created().json(ApiResponse::success("Player created", player)))
}

// GET /api/players/{id}
pub async fn get_player(
    catalog: web::Data<CatalogQueries>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let player = ok_or_return!(require_record(
        catalog.get_player(path.into_inner()).await,
        "Player not found"
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player found", player)))
}

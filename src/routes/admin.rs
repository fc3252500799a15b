use actix_web::web;

use crate::handlers::{catalog_handler, participation_handler as entries};
use crate::middleware::auth::AuthMiddleware;
use crate::models::participation::{ScoreLine, Unscored};

/// Write routes, restricted to admins and organizers.
pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware::manage())
            // Catalog
            .service(
                web::resource("/tournaments")
                    .route(web::post().to(catalog_handler::create_tournament))
            )
            .service(
                web::resource("/matches")
                    .route(web::post().to(catalog_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::delete().to(catalog_handler::delete_match))
            )
            .service(
                web::resource("/teams")
                    .route(web::post().to(catalog_handler::create_team))
            )
            .service(
                web::resource("/players")
                    .route(web::post().to(catalog_handler::create_player))
            )

            // Match participants
            .service(
                web::resource("/match-participants")
                    .route(web::post().to(entries::create_participation::<Unscored>))
            )
            .service(
                web::resource("/match-participants/bulk")
                    .route(web::post().to(entries::bulk_create_participations::<Unscored>))
            )
            .service(
                web::resource("/match-participants/{id}")
                    .route(web::patch().to(entries::update_participation::<Unscored>))
                    .route(web::delete().to(entries::delete_participation::<Unscored>))
            )
            .service(
                web::resource("/matches/{id}/participants")
                    .route(web::delete().to(entries::delete_for_match::<Unscored>))
            )

            // Match scores
            .service(
                web::resource("/match-scores")
                    .route(web::post().to(entries::create_participation::<ScoreLine>))
            )
            .service(
                web::resource("/match-scores/bulk")
                    .route(web::post().to(entries::bulk_create_participations::<ScoreLine>))
            )
            .service(
                web::resource("/match-scores/{id}")
                    .route(web::patch().to(entries::update_participation::<ScoreLine>))
                    .route(web::delete().to(entries::delete_participation::<ScoreLine>))
            )
            .service(
                web::resource("/matches/{id}/scores")
                    .route(web::delete().to(entries::delete_for_match::<ScoreLine>))
            )
    );
}

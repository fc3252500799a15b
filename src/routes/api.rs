use actix_web::web;

use crate::handlers::{catalog_handler, participation_handler as entries};
use crate::middleware::auth::AuthMiddleware;
use crate::models::participation::{ScoreLine, Unscored};

/// Read routes, open to any authenticated user.
pub fn init_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(AuthMiddleware::authenticated())
            .service(
                web::resource("/tournaments/{id}")
                    .route(web::get().to(catalog_handler::get_tournament))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::get().to(catalog_handler::get_match))
            )
            .service(
                web::resource("/teams/{id}")
                    .route(web::get().to(catalog_handler::get_team))
            )
            .service(
                web::resource("/players/{id}")
                    .route(web::get().to(catalog_handler::get_player))
            )

            // Match participants
            .service(
                web::resource("/match-participants/{id}")
                    .route(web::get().to(entries::get_participation::<Unscored>))
            )
            .service(
                web::resource("/matches/{id}/participants")
                    .route(web::get().to(entries::list_for_match::<Unscored>))
            )
            .service(
                web::resource("/teams/{id}/participations")
                    .route(web::get().to(entries::list_for_team::<Unscored>))
            )
            .service(
                web::resource("/players/{id}/participations")
                    .route(web::get().to(entries::list_for_player::<Unscored>))
            )

            // Match scores
            .service(
                web::resource("/match-scores/{id}")
                    .route(web::get().to(entries::get_participation::<ScoreLine>))
            )
            .service(
                web::resource("/matches/{id}/scores")
                    .route(web::get().to(entries::list_for_match::<ScoreLine>))
            )
            .service(
                web::resource("/teams/{id}/scores")
                    .route(web::get().to(entries::list_for_team::<ScoreLine>))
            )
            .service(
                web::resource("/players/{id}/scores")
                    .route(web::get().to(entries::list_for_player::<ScoreLine>))
            )
    );
}

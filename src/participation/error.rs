use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::models::common::ApiResponse;
use crate::models::participation::ParticipantType;
use crate::participation::store::{self, StoreError};
use crate::participation::validation::ValidationError;

/// Entities a participation operation may fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Tournament,
    Match,
    Team,
    Player,
    Participant,
    Score,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Tournament => "Tournament",
            Entity::Match => "Match",
            Entity::Team => "Team",
            Entity::Player => "Player",
            Entity::Participant => "Participant",
            Entity::Score => "Score",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParticipationError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} is already participating in this match", .0.entity())]
    AlreadyParticipating(ParticipantType),
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<StoreError> for ParticipationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => match store::duplicate_kind(&constraint) {
                Some(kind) => ParticipationError::AlreadyParticipating(kind),
                None => ParticipationError::Storage(sqlx::Error::Protocol(format!(
                    "unexpected unique violation on `{}`",
                    constraint
                ))),
            },
            StoreError::ForeignKeyViolation { constraint } => {
                match store::referenced_entity(&constraint) {
                    Some(entity) => ParticipationError::NotFound(entity),
                    None => ParticipationError::Storage(sqlx::Error::Protocol(format!(
                        "unexpected foreign key violation on `{}`",
                        constraint
                    ))),
                }
            }
            StoreError::CheckViolation { constraint } => {
                ParticipationError::Validation(ValidationError::ConstraintRejected(constraint))
            }
            StoreError::Database(e) => ParticipationError::Storage(e),
        }
    }
}

impl ResponseError for ParticipationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ParticipationError::NotFound(_) => StatusCode::NOT_FOUND,
            ParticipationError::Validation(_) => StatusCode::BAD_REQUEST,
            ParticipationError::AlreadyParticipating(_) => StatusCode::CONFLICT,
            ParticipationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ParticipationError::Storage(e) => {
                tracing::error!("Participation storage failure: {:?}", e);
                ApiResponse::<()>::error("Database error")
            }
            other => ApiResponse::<()>::error(other.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_team_translates_to_conflict() {
        let err = ParticipationError::from(StoreError::UniqueViolation {
            constraint: "match_participants_match_team_key".into(),
        });
        assert!(matches!(err, ParticipationError::AlreadyParticipating(ParticipantType::Team)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Team is already participating in this match");
    }

    #[test]
    fn missing_reference_translates_to_not_found() {
        let err = ParticipationError::from(StoreError::ForeignKeyViolation {
            constraint: "match_scores_player_id_fkey".into(),
        });
        assert!(matches!(err, ParticipationError::NotFound(Entity::Player)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_constraint_is_a_storage_failure() {
        let err = ParticipationError::from(StoreError::UniqueViolation {
            constraint: "match_participants_pkey".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

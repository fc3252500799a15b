//! Storage seam for participation records.
//!
//! Implementations must enforce the same constraints Postgres does for the
//! `match_participants`/`match_scores` tables: partial uniqueness on
//! `(match_id, team_id)` and `(match_id, player_id)`, foreign keys to the
//! referenced entities, and all-or-nothing bulk inserts. Violations are
//! reported with the constraint names produced by the helpers below.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::participation::{
    NewParticipation, ParticipantType, ParticipationFilter, ParticipationRecord,
    ParticipationView, Payload,
};
use crate::participation::error::Entity;

// Postgres SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: String },
    #[error("foreign key constraint `{constraint}` violated")]
    ForeignKeyViolation { constraint: String },
    #[error("check constraint `{constraint}` violated")]
    CheckViolation { constraint: String },
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::UniqueViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation { constraint }
                }
                Some(CHECK_VIOLATION) => return StoreError::CheckViolation { constraint },
                _ => {}
            }
        }
        StoreError::Database(e)
    }
}

pub fn unique_constraint(table: &str, kind: ParticipantType) -> String {
    format!("{}_match_{}_key", table, kind.as_str())
}

pub fn foreign_key_constraint(table: &str, column: &str) -> String {
    format!("{}_{}_fkey", table, column)
}

/// Which kind of participant a uniqueness constraint deduplicates.
pub fn duplicate_kind(constraint: &str) -> Option<ParticipantType> {
    if constraint.ends_with("_match_team_key") {
        Some(ParticipantType::Team)
    } else if constraint.ends_with("_match_player_key") {
        Some(ParticipantType::Player)
    } else {
        None
    }
}

/// Which entity a foreign key constraint points at.
pub fn referenced_entity(constraint: &str) -> Option<Entity> {
    if constraint.ends_with("_match_id_fkey") {
        Some(Entity::Match)
    } else if constraint.ends_with("_team_id_fkey") {
        Some(Entity::Team)
    } else if constraint.ends_with("_player_id_fkey") {
        Some(Entity::Player)
    } else if constraint.ends_with("_tournament_id_fkey") {
        Some(Entity::Tournament)
    } else {
        None
    }
}

/// Existence lookups for the entities a participation record references.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    async fn match_exists(&self, match_id: Uuid) -> Result<bool, StoreError>;

    async fn team_exists(&self, team_id: Uuid) -> Result<bool, StoreError>;

    async fn player_exists(&self, player_id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ParticipationStore<P: Payload>: ParticipantDirectory {
    /// Insert every entry or none of them. Records come back in input order.
    async fn insert_all(
        &self,
        entries: Vec<NewParticipation<P>>,
    ) -> Result<Vec<ParticipationRecord<P>>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<ParticipationRecord<P>>, StoreError>;

    async fn find_view(&self, id: Uuid) -> Result<Option<ParticipationView<P>>, StoreError>;

    /// Records matching the filter, oldest first.
    async fn list_views(
        &self,
        filter: ParticipationFilter,
    ) -> Result<Vec<ParticipationView<P>>, StoreError>;

    /// Overwrite a stored record and bump `updated_at`.
    /// Returns `None` when the record no longer exists.
    async fn save(
        &self,
        record: ParticipationRecord<P>,
    ) -> Result<Option<ParticipationRecord<P>>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn delete_by_match(&self, match_id: Uuid) -> Result<u64, StoreError>;
}

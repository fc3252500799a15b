// src/models/catalog.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scheduled contest within a tournament.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTournamentRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub tournament_id: Uuid,
    pub name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub team_id: Option<Uuid>,
}

/// Shared name rule for every catalog entity.
pub fn validate_name(label: &str, name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{} name cannot be empty", label));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{} name cannot exceed {} characters",
            label, MAX_NAME_LENGTH
        ));
    }
    if trimmed.contains('\0') {
        return Err(format!("{} name contains invalid characters", label));
    }
    Ok(())
}

impl CreateTournamentRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name("Tournament", &self.name)
    }
}

impl CreateMatchRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name("Match", &self.name)
    }
}

impl CreateTeamRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name("Team", &self.name)
    }
}

impl CreatePlayerRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_name("Player", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_before_checking() {
        assert!(validate_name("Team", "   ").is_err());
        assert!(validate_name("Team", "  Falcons ").is_ok());
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_name("Player", &name).unwrap_err();
        assert_eq!(err, "Player name cannot exceed 100 characters");
    }
}

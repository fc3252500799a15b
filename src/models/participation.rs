// src/models/participation.rs
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::participation::error::Entity;
use crate::participation::validation::ValidationError;

const MAX_DETAILS_LENGTH: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Team,
    Player,
}

impl ParticipantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Team => "team",
            ParticipantType::Player => "player",
        }
    }

    /// Column holding the reference for this kind of participant.
    pub fn reference_column(&self) -> &'static str {
        match self {
            ParticipantType::Team => "team_id",
            ParticipantType::Player => "player_id",
        }
    }

    pub fn entity(&self) -> Entity {
        match self {
            ParticipantType::Team => Entity::Team,
            ParticipantType::Player => Entity::Player,
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "team" => Ok(ParticipantType::Team),
            "player" => Ok(ParticipantType::Player),
            other => Err(ValidationError::UnknownParticipantType(other.to_string())),
        }
    }
}

/// The entity entered into a match: a team or a player, never both.
///
/// Storage keeps this as a `participant_type` column plus two nullable
/// reference columns; the conversion happens in [`Participant::from_columns`]
/// and the accessors below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    Team(Uuid),
    Player(Uuid),
}

impl Participant {
    pub fn participant_type(&self) -> ParticipantType {
        match self {
            Participant::Team(_) => ParticipantType::Team,
            Participant::Player(_) => ParticipantType::Player,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Participant::Team(id) | Participant::Player(id) => *id,
        }
    }

    pub fn team_id(&self) -> Option<Uuid> {
        match self {
            Participant::Team(id) => Some(*id),
            Participant::Player(_) => None,
        }
    }

    pub fn player_id(&self) -> Option<Uuid> {
        match self {
            Participant::Player(id) => Some(*id),
            Participant::Team(_) => None,
        }
    }

    /// Rebuild a participant from its stored column shape.
    pub fn from_columns(
        participant_type: &str,
        team_id: Option<Uuid>,
        player_id: Option<Uuid>,
    ) -> Result<Self, ValidationError> {
        crate::participation::validation::validate_participant(
            Some(participant_type),
            team_id,
            player_id,
        )
    }
}

impl Serialize for Participant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Participant", 3)?;
        state.serialize_field("participant_type", &self.participant_type())?;
        state.serialize_field("team_id", &self.team_id())?;
        state.serialize_field("player_id", &self.player_id())?;
        state.end()
    }
}

/// Kind-specific columns carried by a participation record.
pub trait Payload: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static {
    /// Partial update for the payload columns.
    type Changes: fmt::Debug + Default + Send + Sync + 'static;

    /// Table the records live in. Constraint names are derived from it.
    const TABLE: &'static str;
    /// Entity reported when a record of this kind cannot be found.
    const RECORD: Entity;

    fn validate(&self) -> Result<(), ValidationError>;

    fn apply(&mut self, changes: Self::Changes);
}

/// Payload of a plain match participant: nothing beyond the participant itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Unscored {}

impl Payload for Unscored {
    type Changes = Unscored;

    const TABLE: &'static str = "match_participants";
    const RECORD: Entity = Entity::Participant;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn apply(&mut self, _changes: Unscored) {}
}

/// Score line recorded for a participant of a match.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ScoreLine {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ScoreChanges {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub details: Option<Option<String>>,
}

impl Payload for ScoreLine {
    type Changes = ScoreChanges;

    const TABLE: &'static str = "match_scores";
    const RECORD: Entity = Entity::Score;

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.score.is_finite() {
            return Err(ValidationError::InvalidScore);
        }
        if let Some(details) = &self.details {
            if details.chars().count() > MAX_DETAILS_LENGTH {
                return Err(ValidationError::DetailsTooLong(MAX_DETAILS_LENGTH));
            }
        }
        Ok(())
    }

    fn apply(&mut self, changes: ScoreChanges) {
        if let Some(score) = changes.score {
            self.score = score;
        }
        if let Some(details) = changes.details {
            self.details = details;
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParticipationRecord<P> {
    pub id: Uuid,
    pub match_id: Uuid,
    #[serde(flatten)]
    pub participant: Participant,
    #[serde(flatten)]
    pub payload: P,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type MatchParticipant = ParticipationRecord<Unscored>;
pub type MatchScore = ParticipationRecord<ScoreLine>;

impl<P> ParticipationRecord<P> {
    pub fn team_id(&self) -> Option<Uuid> {
        self.participant.team_id()
    }

    pub fn player_id(&self) -> Option<Uuid> {
        self.participant.player_id()
    }
}

/// A validated record that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParticipation<P> {
    pub match_id: Uuid,
    pub participant: Participant,
    pub payload: P,
}

/// A record joined with the display data of its match, tournament, team and player.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParticipationView<P> {
    #[serde(flatten)]
    pub record: ParticipationRecord<P>,
    pub tournament_id: Uuid,
    pub tournament_name: String,
    pub match_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub team_name: Option<String>,
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationFilter {
    Match(Uuid),
    Team(Uuid),
    Player(Uuid),
}

impl ParticipationFilter {
    pub fn column(&self) -> &'static str {
        match self {
            ParticipationFilter::Match(_) => "match_id",
            ParticipationFilter::Team(_) => "team_id",
            ParticipationFilter::Player(_) => "player_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ParticipationFilter::Match(id)
            | ParticipationFilter::Team(id)
            | ParticipationFilter::Player(id) => *id,
        }
    }

    pub fn entity(&self) -> Entity {
        match self {
            ParticipationFilter::Match(_) => Entity::Match,
            ParticipationFilter::Team(_) => Entity::Team,
            ParticipationFilter::Player(_) => Entity::Player,
        }
    }

    pub fn matches<P>(&self, record: &ParticipationRecord<P>) -> bool {
        match self {
            ParticipationFilter::Match(id) => record.match_id == *id,
            ParticipationFilter::Team(id) => record.team_id() == Some(*id),
            ParticipationFilter::Player(id) => record.player_id() == Some(*id),
        }
    }
}

/// Raw create input, as received from a caller. Nothing here is trusted
/// until it went through [`crate::participation::validation::validate_new`].
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CreateParticipationRequest<P> {
    pub match_id: Option<Uuid>,
    pub participant_type: Option<String>,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    #[serde(flatten)]
    pub payload: P,
}

/// Partial update. For `team_id`/`player_id` an explicit `null` clears the
/// column while an omitted field keeps the stored value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateParticipationRequest<C> {
    #[serde(default)]
    pub match_id: Option<Uuid>,
    #[serde(default)]
    pub participant_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub team_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub player_id: Option<Option<Uuid>>,
    #[serde(flatten)]
    pub changes: C,
}

/// Distinguishes a field set to `null` (`Some(None)`) from an absent one (`None`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn participant_serializes_to_column_shape() {
        let team_id = Uuid::new_v4();
        let value = serde_json::to_value(Participant::Team(team_id)).unwrap();
        assert_eq!(
            value,
            json!({ "participant_type": "team", "team_id": team_id, "player_id": null })
        );
    }

    #[test]
    fn update_request_separates_null_from_missing() {
        let request: UpdateParticipationRequest<Unscored> =
            serde_json::from_value(json!({ "team_id": null })).unwrap();
        assert_eq!(request.team_id, Some(None));
        assert_eq!(request.player_id, None);
    }

    #[test]
    fn score_changes_apply_only_supplied_fields() {
        let mut line = ScoreLine { score: 3.0, details: Some("first half".into()) };
        line.apply(ScoreChanges { score: Some(5.0), details: None });
        assert_eq!(line.score, 5.0);
        assert_eq!(line.details.as_deref(), Some("first half"));

        line.apply(ScoreChanges { score: None, details: Some(None) });
        assert_eq!(line.details, None);
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let line = ScoreLine { score: f64::NAN, details: None };
        assert_eq!(line.validate(), Err(ValidationError::InvalidScore));
    }
}

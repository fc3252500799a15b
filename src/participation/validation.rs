//! Pure validation of participation input.
//!
//! Every write goes through [`validate_participant`] before anything touches
//! storage, so the team/player mutual exclusion can be checked without a
//! database. Storage repeats the check with a CHECK constraint.

use uuid::Uuid;

use crate::models::participation::{
    CreateParticipationRequest, NewParticipation, Participant, ParticipantType, Payload,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("participant_type must be one of: team, player (got `{0}`)")]
    UnknownParticipantType(String),
    #[error("{field} is required when participant_type is {participant_type}")]
    MissingReference {
        participant_type: ParticipantType,
        field: &'static str,
    },
    #[error("{field} must be null when participant_type is {participant_type}")]
    UnexpectedReference {
        participant_type: ParticipantType,
        field: &'static str,
    },
    #[error("at least one entry is required")]
    EmptyBatch,
    #[error("score must be a finite number")]
    InvalidScore,
    #[error("details cannot exceed {0} characters")]
    DetailsTooLong(usize),
    #[error("participation rejected by constraint `{0}`")]
    ConstraintRejected(String),
}

/// Turn the raw `participant_type`/`team_id`/`player_id` triple into a [`Participant`].
pub fn validate_participant(
    participant_type: Option<&str>,
    team_id: Option<Uuid>,
    player_id: Option<Uuid>,
) -> Result<Participant, ValidationError> {
    let participant_type: ParticipantType = participant_type
        .ok_or(ValidationError::MissingField("participant_type"))?
        .parse()?;

    let (wanted, unwanted, other_type) = match participant_type {
        ParticipantType::Team => (team_id, player_id, ParticipantType::Player),
        ParticipantType::Player => (player_id, team_id, ParticipantType::Team),
    };

    if unwanted.is_some() {
        return Err(ValidationError::UnexpectedReference {
            participant_type,
            field: other_type.reference_column(),
        });
    }

    let id = wanted.ok_or(ValidationError::MissingReference {
        participant_type,
        field: participant_type.reference_column(),
    })?;

    Ok(match participant_type {
        ParticipantType::Team => Participant::Team(id),
        ParticipantType::Player => Participant::Player(id),
    })
}

/// Validate a create request into a record ready for storage.
pub fn validate_new<P: Payload>(
    request: CreateParticipationRequest<P>,
) -> Result<NewParticipation<P>, ValidationError> {
    let match_id = request
        .match_id
        .ok_or(ValidationError::MissingField("match_id"))?;
    let participant = validate_participant(
        request.participant_type.as_deref(),
        request.team_id,
        request.player_id,
    )?;
    request.payload.validate()?;

    Ok(NewParticipation {
        match_id,
        participant,
        payload: request.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participation::{ScoreLine, Unscored};

    #[test]
    fn team_participant_requires_team_id_only() {
        let team_id = Uuid::new_v4();
        let participant = validate_participant(Some("team"), Some(team_id), None).unwrap();
        assert_eq!(participant, Participant::Team(team_id));
        assert_eq!(participant.player_id(), None);
    }

    #[test]
    fn player_participant_requires_player_id_only() {
        let player_id = Uuid::new_v4();
        let participant = validate_participant(Some("player"), None, Some(player_id)).unwrap();
        assert_eq!(participant, Participant::Player(player_id));
        assert_eq!(participant.team_id(), None);
    }

    #[test]
    fn both_references_fail_for_either_type() {
        let (team_id, player_id) = (Some(Uuid::new_v4()), Some(Uuid::new_v4()));

        let err = validate_participant(Some("team"), team_id, player_id).unwrap_err();
        assert_eq!(err.to_string(), "player_id must be null when participant_type is team");

        let err = validate_participant(Some("player"), team_id, player_id).unwrap_err();
        assert_eq!(err.to_string(), "team_id must be null when participant_type is player");
    }

    #[test]
    fn missing_reference_fails() {
        assert_eq!(
            validate_participant(Some("team"), None, None),
            Err(ValidationError::MissingReference {
                participant_type: ParticipantType::Team,
                field: "team_id",
            })
        );
        assert_eq!(
            validate_participant(Some("player"), None, None),
            Err(ValidationError::MissingReference {
                participant_type: ParticipantType::Player,
                field: "player_id",
            })
        );
    }

    #[test]
    fn unknown_or_missing_type_fails() {
        let team_id = Some(Uuid::new_v4());
        assert_eq!(
            validate_participant(Some("coach"), team_id, None),
            Err(ValidationError::UnknownParticipantType("coach".into()))
        );
        // Enum values are case sensitive
        assert!(validate_participant(Some("Team"), team_id, None).is_err());
        assert_eq!(
            validate_participant(None, team_id, None),
            Err(ValidationError::MissingField("participant_type"))
        );
    }

    #[test]
    fn new_entry_requires_match_id() {
        let request = CreateParticipationRequest::<Unscored> {
            match_id: None,
            participant_type: Some("team".into()),
            team_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(validate_new(request), Err(ValidationError::MissingField("match_id")));
    }

    #[test]
    fn new_entry_checks_payload() {
        let request = CreateParticipationRequest {
            match_id: Some(Uuid::new_v4()),
            participant_type: Some("player".into()),
            player_id: Some(Uuid::new_v4()),
            team_id: None,
            payload: ScoreLine { score: f64::INFINITY, details: None },
        };
        assert_eq!(validate_new(request), Err(ValidationError::InvalidScore));
    }
}

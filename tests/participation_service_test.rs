use uuid::Uuid;

use tournament_backend::models::participation::{
    CreateParticipationRequest, Participant, ParticipantType, ScoreChanges, ScoreLine, Unscored,
    UpdateParticipationRequest,
};
use tournament_backend::participation::validation::ValidationError;
use tournament_backend::participation::{Entity, InMemoryStore, ParticipationError, ParticipationService};

struct Fixture {
    service: ParticipationService<InMemoryStore>,
    match_id: Uuid,
    other_match_id: Uuid,
    team_id: Uuid,
    other_team_id: Uuid,
    player_id: Uuid,
}

fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let tournament = store.add_tournament("Spring Cup");
    let final_match = store.add_match(tournament.id, "Final").unwrap();
    let semi_final = store.add_match(tournament.id, "Semi-final").unwrap();
    let team = store.add_team("Falcons");
    let other_team = store.add_team("Otters");
    let player = store.add_player("Ada", Some(team.id)).unwrap();

    Fixture {
        service: ParticipationService::new(store),
        match_id: final_match.id,
        other_match_id: semi_final.id,
        team_id: team.id,
        other_team_id: other_team.id,
        player_id: player.id,
    }
}

fn team_entry<P: Default>(match_id: Uuid, team_id: Uuid) -> CreateParticipationRequest<P> {
    CreateParticipationRequest {
        match_id: Some(match_id),
        participant_type: Some("team".to_string()),
        team_id: Some(team_id),
        player_id: None,
        payload: P::default(),
    }
}

fn player_entry<P: Default>(match_id: Uuid, player_id: Uuid) -> CreateParticipationRequest<P> {
    CreateParticipationRequest {
        match_id: Some(match_id),
        participant_type: Some("player".to_string()),
        team_id: None,
        player_id: Some(player_id),
        payload: P::default(),
    }
}

#[tokio::test]
async fn create_team_participant_leaves_player_empty() {
    let f = fixture();

    let record = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .expect("Failed to create participant");

    assert_eq!(record.match_id, f.match_id);
    assert_eq!(record.participant, Participant::Team(f.team_id));
    assert_eq!(record.player_id(), None);
    assert_eq!(record.created_at, record.updated_at);
}

#[tokio::test]
async fn create_player_participant_leaves_team_empty() {
    let f = fixture();

    let record = f
        .service
        .create(player_entry::<Unscored>(f.match_id, f.player_id))
        .await
        .expect("Failed to create participant");

    assert_eq!(record.participant, Participant::Player(f.player_id));
    assert_eq!(record.team_id(), None);
}

#[tokio::test]
async fn create_with_both_references_fails_for_any_type() {
    let f = fixture();

    for participant_type in ["team", "player"] {
        let request = CreateParticipationRequest::<Unscored> {
            match_id: Some(f.match_id),
            participant_type: Some(participant_type.to_string()),
            team_id: Some(f.team_id),
            player_id: Some(f.player_id),
            payload: Unscored::default(),
        };
        let err = f.service.create(request).await.unwrap_err();
        assert!(
            matches!(err, ParticipationError::Validation(ValidationError::UnexpectedReference { .. })),
            "unexpected error for {}: {:?}",
            participant_type,
            err
        );
    }
}

#[tokio::test]
async fn create_without_references_fails() {
    let f = fixture();

    let request = CreateParticipationRequest::<Unscored> {
        match_id: Some(f.match_id),
        participant_type: Some("team".to_string()),
        ..Default::default()
    };
    let err = f.service.create(request).await.unwrap_err();

    assert!(matches!(
        err,
        ParticipationError::Validation(ValidationError::MissingReference { field: "team_id", .. })
    ));
}

#[tokio::test]
async fn create_with_unknown_participant_type_fails() {
    let f = fixture();

    let mut request = team_entry::<Unscored>(f.match_id, f.team_id);
    request.participant_type = Some("referee".to_string());
    let err = f.service.create(request).await.unwrap_err();

    assert!(matches!(
        err,
        ParticipationError::Validation(ValidationError::UnknownParticipantType(_))
    ));
}

#[tokio::test]
async fn create_reports_the_missing_entity() {
    let f = fixture();

    let err = f
        .service
        .create(team_entry::<Unscored>(Uuid::new_v4(), f.team_id))
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Match)));

    let err = f
        .service
        .create(team_entry::<Unscored>(f.match_id, Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Team)));

    let err = f
        .service
        .create(player_entry::<Unscored>(f.match_id, Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Player)));
}

#[tokio::test]
async fn second_entry_for_the_same_team_is_rejected() {
    let f = fixture();

    f.service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .expect("First entry should succeed");
    let err = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap_err();

    assert!(matches!(err, ParticipationError::AlreadyParticipating(ParticipantType::Team)));
    assert_eq!(err.to_string(), "Team is already participating in this match");
}

#[tokio::test]
async fn second_entry_for_the_same_player_is_rejected() {
    let f = fixture();

    f.service
        .create(player_entry::<Unscored>(f.match_id, f.player_id))
        .await
        .expect("First entry should succeed");
    let err = f
        .service
        .create(player_entry::<Unscored>(f.match_id, f.player_id))
        .await
        .unwrap_err();

    assert!(matches!(err, ParticipationError::AlreadyParticipating(ParticipantType::Player)));
}

#[tokio::test]
async fn team_and_player_share_a_match() {
    let f = fixture();

    f.service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .expect("Team entry should succeed");
    f.service
        .create(player_entry::<Unscored>(f.match_id, f.player_id))
        .await
        .expect("Player entry should succeed");
    // The same team may enter another match
    f.service
        .create(team_entry::<Unscored>(f.other_match_id, f.team_id))
        .await
        .expect("Team entry in a second match should succeed");

    let entries = f.service.find_by_match::<Unscored>(f.match_id).await.unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn participants_and_scores_are_deduplicated_separately() {
    let f = fixture();

    f.service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap();
    let score = f
        .service
        .create(team_entry::<ScoreLine>(f.match_id, f.team_id))
        .await
        .expect("Score for a participating team should succeed");

    assert_eq!(score.payload, ScoreLine::default());
}

#[tokio::test]
async fn lookups_fail_for_unknown_filters() {
    let f = fixture();

    let err = f.service.find_by_match::<Unscored>(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Match)));

    let err = f.service.find_by_team::<ScoreLine>(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Team)));

    let err = f.service.find_by_player::<Unscored>(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Player)));

    let err = f.service.find_by_id::<Unscored>(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Participant)));
}

#[tokio::test]
async fn views_carry_display_names() {
    let f = fixture();

    let record = f
        .service
        .create(player_entry::<Unscored>(f.match_id, f.player_id))
        .await
        .unwrap();

    let view = f.service.find_by_id::<Unscored>(record.id).await.unwrap();
    assert_eq!(view.record, record);
    assert_eq!(view.tournament_name, "Spring Cup");
    assert_eq!(view.match_name, "Final");
    assert_eq!(view.player_name.as_deref(), Some("Ada"));
    assert_eq!(view.team_name, None);

    let by_player = f.service.find_by_player::<Unscored>(f.player_id).await.unwrap();
    assert_eq!(by_player, vec![view]);
}

#[tokio::test]
async fn remove_by_match_only_touches_that_match() {
    let f = fixture();

    for match_id in [f.match_id, f.other_match_id] {
        f.service
            .create(team_entry::<Unscored>(match_id, f.team_id))
            .await
            .unwrap();
        f.service
            .create(player_entry::<Unscored>(match_id, f.player_id))
            .await
            .unwrap();
    }

    let removed = f.service.remove_by_match::<Unscored>(f.match_id).await.unwrap();

    assert_eq!(removed, 2);
    assert!(f.service.find_by_match::<Unscored>(f.match_id).await.unwrap().is_empty());
    assert_eq!(
        f.service.find_by_match::<Unscored>(f.other_match_id).await.unwrap().len(),
        2
    );

    let err = f.service.remove_by_match::<Unscored>(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Match)));
}

#[tokio::test]
async fn bulk_create_stores_everything_in_order() {
    let f = fixture();

    let records = f
        .service
        .bulk_create(vec![
            team_entry::<Unscored>(f.match_id, f.team_id),
            team_entry::<Unscored>(f.match_id, f.other_team_id),
            player_entry::<Unscored>(f.match_id, f.player_id),
        ])
        .await
        .expect("Bulk create should succeed");

    let participants: Vec<Participant> = records.iter().map(|r| r.participant).collect();
    assert_eq!(
        participants,
        vec![
            Participant::Team(f.team_id),
            Participant::Team(f.other_team_id),
            Participant::Player(f.player_id),
        ]
    );
}

#[tokio::test]
async fn bulk_create_is_all_or_nothing() {
    let f = fixture();

    let err = f
        .service
        .bulk_create(vec![
            team_entry::<Unscored>(f.match_id, f.team_id),
            player_entry::<Unscored>(f.match_id, Uuid::new_v4()),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Player)));

    // Duplicates inside one batch are caught by the store
    let err = f
        .service
        .bulk_create(vec![
            team_entry::<Unscored>(f.match_id, f.team_id),
            team_entry::<Unscored>(f.match_id, f.team_id),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::AlreadyParticipating(ParticipantType::Team)));

    assert!(f.service.find_by_match::<Unscored>(f.match_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn bulk_create_checks_the_first_match_first() {
    let f = fixture();

    let err = f
        .service
        .bulk_create(vec![
            team_entry::<Unscored>(Uuid::new_v4(), Uuid::new_v4()),
            team_entry::<Unscored>(f.match_id, f.team_id),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Match)));

    let err = f
        .service
        .bulk_create(Vec::<CreateParticipationRequest<Unscored>>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::Validation(ValidationError::EmptyBatch)));
}

#[tokio::test]
async fn update_switches_participant_kind_when_the_old_reference_is_cleared() {
    let f = fixture();
    let record = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap();

    // Keeping the stored team_id while switching to player breaks mutual exclusion
    let request = UpdateParticipationRequest::<Unscored> {
        participant_type: Some("player".to_string()),
        player_id: Some(Some(f.player_id)),
        ..Default::default()
    };
    let err = f.service.update::<Unscored>(record.id, request).await.unwrap_err();
    assert!(matches!(
        err,
        ParticipationError::Validation(ValidationError::UnexpectedReference { field: "team_id", .. })
    ));

    let request = UpdateParticipationRequest::<Unscored> {
        participant_type: Some("player".to_string()),
        team_id: Some(None),
        player_id: Some(Some(f.player_id)),
        ..Default::default()
    };
    let updated = f.service.update::<Unscored>(record.id, request).await.unwrap();
    assert_eq!(updated.id, record.id);
    assert_eq!(updated.participant, Participant::Player(f.player_id));
    assert_eq!(updated.created_at, record.created_at);
}

#[tokio::test]
async fn update_checks_references_and_uniqueness() {
    let f = fixture();
    f.service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap();
    let other = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.other_team_id))
        .await
        .unwrap();

    let err = f
        .service
        .update::<Unscored>(
            other.id,
            UpdateParticipationRequest {
                team_id: Some(Some(Uuid::new_v4())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Team)));

    let err = f
        .service
        .update::<Unscored>(
            other.id,
            UpdateParticipationRequest {
                team_id: Some(Some(f.team_id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::AlreadyParticipating(ParticipantType::Team)));

    // Moving to another match frees the slot
    let moved = f
        .service
        .update::<Unscored>(
            other.id,
            UpdateParticipationRequest {
                match_id: Some(f.other_match_id),
                team_id: Some(Some(f.team_id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.match_id, f.other_match_id);

    let err = f
        .service
        .update::<Unscored>(Uuid::new_v4(), UpdateParticipationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Participant)));
}

#[tokio::test]
async fn score_updates_change_only_supplied_fields() {
    let f = fixture();
    let mut request = player_entry::<ScoreLine>(f.match_id, f.player_id);
    request.payload = ScoreLine {
        score: 12.5,
        details: Some("two tries".to_string()),
    };
    let score = f.service.create(request).await.unwrap();

    let updated = f
        .service
        .update::<ScoreLine>(
            score.id,
            UpdateParticipationRequest {
                changes: ScoreChanges {
                    score: Some(15.0),
                    details: None,
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.payload.score, 15.0);
    assert_eq!(updated.payload.details.as_deref(), Some("two tries"));
    assert_eq!(updated.participant, Participant::Player(f.player_id));

    let err = f
        .service
        .update::<ScoreLine>(
            score.id,
            UpdateParticipationRequest {
                changes: ScoreChanges {
                    score: Some(f64::NAN),
                    details: None,
                },
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ParticipationError::Validation(ValidationError::InvalidScore)));
}

#[tokio::test]
async fn remove_deletes_a_single_record() {
    let f = fixture();
    let record = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap();

    f.service.remove::<Unscored>(record.id).await.unwrap();

    let err = f.service.remove::<Unscored>(record.id).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Participant)));
    let err = f.service.remove::<ScoreLine>(record.id).await.unwrap_err();
    assert!(matches!(err, ParticipationError::NotFound(Entity::Score)));
}

#[tokio::test]
async fn deleting_a_match_cascades_to_its_entries() {
    let f = fixture();
    let participant = f
        .service
        .create(team_entry::<Unscored>(f.match_id, f.team_id))
        .await
        .unwrap();
    let score = f
        .service
        .create(team_entry::<ScoreLine>(f.match_id, f.team_id))
        .await
        .unwrap();

    assert!(f.service.store().delete_match(f.match_id));

    assert!(f.service.find_by_id::<Unscored>(participant.id).await.is_err());
    assert!(f.service.find_by_id::<ScoreLine>(score.id).await.is_err());
    assert!(f.service.find_by_team::<Unscored>(f.team_id).await.unwrap().is_empty());
}

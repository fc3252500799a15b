use std::collections::HashSet;
use uuid::Uuid;

use crate::models::participation::{
    CreateParticipationRequest, Participant, ParticipationFilter, ParticipationRecord,
    ParticipationView, Payload, UpdateParticipationRequest,
};
use crate::participation::error::{Entity, ParticipationError};
use crate::participation::store::{ParticipantDirectory, ParticipationStore};
use crate::participation::validation::{validate_new, validate_participant, ValidationError};

/// Create, read, update and delete participation records while keeping the
/// integrity rules: one kind of participant per record, existing references,
/// no entity twice in the same match.
///
/// Works for any record kind the store supports (`MatchParticipant`,
/// `MatchScore`).
pub struct ParticipationService<S> {
    store: S,
}

impl<S: ParticipantDirectory> ParticipationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn require(&self, entity: Entity, id: Uuid) -> Result<(), ParticipationError> {
        let exists = match entity {
            Entity::Match => self.store.match_exists(id).await?,
            Entity::Team => self.store.team_exists(id).await?,
            Entity::Player => self.store.player_exists(id).await?,
            other => {
                tracing::error!("No existence lookup for {}", other);
                false
            }
        };
        if exists {
            Ok(())
        } else {
            tracing::info!("{} {} not found", entity, id);
            Err(ParticipationError::NotFound(entity))
        }
    }

    async fn require_participant(&self, participant: &Participant) -> Result<(), ParticipationError> {
        self.require(participant.participant_type().entity(), participant.id())
            .await
    }

    #[tracing::instrument(
        name = "Create participation",
        skip(self, request),
        fields(record = %P::RECORD, match_id = ?request.match_id)
    )]
    pub async fn create<P: Payload>(
        &self,
        request: CreateParticipationRequest<P>,
    ) -> Result<ParticipationRecord<P>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        let entry = validate_new(request)?;
        self.require(Entity::Match, entry.match_id).await?;
        self.require_participant(&entry.participant).await?;

        let mut created = self.store.insert_all(vec![entry]).await?;
        let record = created.pop().ok_or_else(|| {
            ParticipationError::Storage(sqlx::Error::Protocol("insert returned no row".into()))
        })?;
        tracing::info!("Created {} {}", P::RECORD, record.id);
        Ok(record)
    }

    /// Create several records at once. Either all of them are stored or,
    /// on the first failed check, none.
    #[tracing::instrument(
        name = "Bulk create participations",
        skip(self, requests),
        fields(record = %P::RECORD, count = requests.len())
    )]
    pub async fn bulk_create<P: Payload>(
        &self,
        requests: Vec<CreateParticipationRequest<P>>,
    ) -> Result<Vec<ParticipationRecord<P>>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        if requests.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let entries = requests
            .into_iter()
            .map(validate_new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut checked_matches = HashSet::new();
        for entry in &entries {
            if checked_matches.insert(entry.match_id) {
                self.require(Entity::Match, entry.match_id).await?;
            }
            self.require_participant(&entry.participant).await?;
        }

        let records = self.store.insert_all(entries).await?;
        tracing::info!("Created {} {} records", records.len(), P::RECORD);
        Ok(records)
    }

    pub async fn find_by_id<P: Payload>(
        &self,
        id: Uuid,
    ) -> Result<ParticipationView<P>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.store
            .find_view(id)
            .await?
            .ok_or(ParticipationError::NotFound(P::RECORD))
    }

    pub async fn find_by_match<P: Payload>(
        &self,
        match_id: Uuid,
    ) -> Result<Vec<ParticipationView<P>>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.find_by(ParticipationFilter::Match(match_id)).await
    }

    pub async fn find_by_team<P: Payload>(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<ParticipationView<P>>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.find_by(ParticipationFilter::Team(team_id)).await
    }

    pub async fn find_by_player<P: Payload>(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<ParticipationView<P>>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.find_by(ParticipationFilter::Player(player_id)).await
    }

    async fn find_by<P: Payload>(
        &self,
        filter: ParticipationFilter,
    ) -> Result<Vec<ParticipationView<P>>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.require(filter.entity(), filter.id()).await?;
        Ok(self.store.list_views(filter).await?)
    }

    /// Apply a partial update. Supplied references are resolved first, then
    /// the merged record is validated exactly like a new one.
    #[tracing::instrument(
        name = "Update participation",
        skip(self, request),
        fields(record = %P::RECORD)
    )]
    pub async fn update<P: Payload>(
        &self,
        id: Uuid,
        request: UpdateParticipationRequest<P::Changes>,
    ) -> Result<ParticipationRecord<P>, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        let mut record = self
            .store
            .find(id)
            .await?
            .ok_or(ParticipationError::NotFound(P::RECORD))?;

        if let Some(match_id) = request.match_id {
            self.require(Entity::Match, match_id).await?;
        }
        if let Some(Some(team_id)) = request.team_id {
            self.require(Entity::Team, team_id).await?;
        }
        if let Some(Some(player_id)) = request.player_id {
            self.require(Entity::Player, player_id).await?;
        }

        let participant_type = request
            .participant_type
            .unwrap_or_else(|| record.participant.participant_type().to_string());
        let team_id = request.team_id.unwrap_or_else(|| record.team_id());
        let player_id = request.player_id.unwrap_or_else(|| record.player_id());
        record.participant = validate_participant(Some(&participant_type), team_id, player_id)?;

        if let Some(match_id) = request.match_id {
            record.match_id = match_id;
        }
        record.payload.apply(request.changes);
        record.payload.validate()?;

        let saved = self
            .store
            .save(record)
            .await?
            .ok_or(ParticipationError::NotFound(P::RECORD))?;
        tracing::info!("Updated {} {}", P::RECORD, saved.id);
        Ok(saved)
    }

    #[tracing::instrument(name = "Remove participation", skip(self), fields(record = %P::RECORD))]
    pub async fn remove<P: Payload>(&self, id: Uuid) -> Result<(), ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ParticipationError::NotFound(P::RECORD))
        }
    }

    /// Delete every record of a match. Returns how many were removed.
    #[tracing::instrument(name = "Remove participations by match", skip(self), fields(record = %P::RECORD))]
    pub async fn remove_by_match<P: Payload>(&self, match_id: Uuid) -> Result<u64, ParticipationError>
    where
        S: ParticipationStore<P>,
    {
        self.require(Entity::Match, match_id).await?;
        let removed = self.store.delete_by_match(match_id).await?;
        tracing::info!("Removed {} {} records from match {}", removed, P::RECORD, match_id);
        Ok(removed)
    }
}

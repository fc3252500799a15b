//! Process-local store with the same constraints as the Postgres schema.
//!
//! Useful wherever a database is not available; every operation runs under a
//! single lock, so bulk inserts are atomic and uniqueness checks cannot race.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::models::catalog::{Match, Player, Team, Tournament};
use crate::models::participation::{
    NewParticipation, Participant, ParticipationFilter, ParticipationRecord, ParticipationView,
    Payload, ScoreLine, Unscored,
};
use crate::participation::store::{
    foreign_key_constraint, unique_constraint, ParticipantDirectory, ParticipationStore,
    StoreError,
};

#[derive(Debug, Default)]
struct Catalog {
    tournaments: HashMap<Uuid, Tournament>,
    matches: HashMap<Uuid, Match>,
    teams: HashMap<Uuid, Team>,
    players: HashMap<Uuid, Player>,
}

impl Catalog {
    fn check_references(
        &self,
        table: &str,
        match_id: Uuid,
        participant: &Participant,
    ) -> Result<(), StoreError> {
        let missing = if !self.matches.contains_key(&match_id) {
            Some("match_id")
        } else {
            match participant {
                Participant::Team(id) if !self.teams.contains_key(id) => Some("team_id"),
                Participant::Player(id) if !self.players.contains_key(id) => Some("player_id"),
                _ => None,
            }
        };
        match missing {
            Some(column) => Err(StoreError::ForeignKeyViolation {
                constraint: foreign_key_constraint(table, column),
            }),
            None => Ok(()),
        }
    }

    fn view<P: Clone>(&self, record: &ParticipationRecord<P>) -> Option<ParticipationView<P>> {
        let fixture = self.matches.get(&record.match_id)?;
        let tournament = self.tournaments.get(&fixture.tournament_id)?;
        Some(ParticipationView {
            record: record.clone(),
            tournament_id: tournament.id,
            tournament_name: tournament.name.clone(),
            match_name: fixture.name.clone(),
            scheduled_at: fixture.scheduled_at,
            team_name: record
                .team_id()
                .and_then(|id| self.teams.get(&id))
                .map(|team| team.name.clone()),
            player_name: record
                .player_id()
                .and_then(|id| self.players.get(&id))
                .map(|player| player.name.clone()),
        })
    }
}

#[derive(Debug)]
struct Ledger<P> {
    rows: Vec<ParticipationRecord<P>>,
}

impl<P> Default for Ledger<P> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<P: Payload> Ledger<P> {
    fn occupied(&self, skip: Option<Uuid>, match_id: Uuid, participant: &Participant) -> bool {
        self.rows.iter().any(|row| {
            Some(row.id) != skip && row.match_id == match_id && row.participant == *participant
        })
    }

    fn insert_all(
        &mut self,
        catalog: &Catalog,
        entries: Vec<NewParticipation<P>>,
    ) -> Result<Vec<ParticipationRecord<P>>, StoreError> {
        let now = Utc::now();
        let mut staged: Vec<ParticipationRecord<P>> = Vec::with_capacity(entries.len());

        for entry in entries {
            catalog.check_references(P::TABLE, entry.match_id, &entry.participant)?;
            let staged_twice = staged
                .iter()
                .any(|row| row.match_id == entry.match_id && row.participant == entry.participant);
            if staged_twice || self.occupied(None, entry.match_id, &entry.participant) {
                return Err(StoreError::UniqueViolation {
                    constraint: unique_constraint(P::TABLE, entry.participant.participant_type()),
                });
            }
            staged.push(ParticipationRecord {
                id: Uuid::new_v4(),
                match_id: entry.match_id,
                participant: entry.participant,
                payload: entry.payload,
                created_at: now,
                updated_at: now,
            });
        }

        self.rows.extend(staged.iter().cloned());
        Ok(staged)
    }

    fn save(
        &mut self,
        catalog: &Catalog,
        record: ParticipationRecord<P>,
    ) -> Result<Option<ParticipationRecord<P>>, StoreError> {
        let Some(index) = self.rows.iter().position(|row| row.id == record.id) else {
            return Ok(None);
        };
        catalog.check_references(P::TABLE, record.match_id, &record.participant)?;
        if self.occupied(Some(record.id), record.match_id, &record.participant) {
            return Err(StoreError::UniqueViolation {
                constraint: unique_constraint(P::TABLE, record.participant.participant_type()),
            });
        }

        let stored = &mut self.rows[index];
        stored.match_id = record.match_id;
        stored.participant = record.participant;
        stored.payload = record.payload;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    fn delete_where(&mut self, keep: impl Fn(&ParticipationRecord<P>) -> bool) -> u64 {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        (before - self.rows.len()) as u64
    }
}

#[derive(Debug, Default)]
struct State {
    catalog: Catalog,
    participants: Ledger<Unscored>,
    scores: Ledger<ScoreLine>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_tournament(&self, name: &str) -> Tournament {
        let now = Utc::now();
        let tournament = Tournament {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.lock()
            .catalog
            .tournaments
            .insert(tournament.id, tournament.clone());
        tournament
    }

    pub fn add_match(&self, tournament_id: Uuid, name: &str) -> Result<Match, StoreError> {
        let mut state = self.lock();
        if !state.catalog.tournaments.contains_key(&tournament_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: foreign_key_constraint("matches", "tournament_id"),
            });
        }
        let now = Utc::now();
        let fixture = Match {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.to_string(),
            scheduled_at: None,
            created_at: now,
            updated_at: now,
        };
        state.catalog.matches.insert(fixture.id, fixture.clone());
        Ok(fixture)
    }

    pub fn add_team(&self, name: &str) -> Team {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.lock().catalog.teams.insert(team.id, team.clone());
        team
    }

    pub fn add_player(&self, name: &str, team_id: Option<Uuid>) -> Result<Player, StoreError> {
        let mut state = self.lock();
        if let Some(team_id) = team_id {
            if !state.catalog.teams.contains_key(&team_id) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: foreign_key_constraint("players", "team_id"),
                });
            }
        }
        let now = Utc::now();
        let player = Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            team_id,
            created_at: now,
            updated_at: now,
        };
        state.catalog.players.insert(player.id, player.clone());
        Ok(player)
    }

    /// Remove a match together with its participants and scores.
    pub fn delete_match(&self, match_id: Uuid) -> bool {
        let mut state = self.lock();
        if state.catalog.matches.remove(&match_id).is_none() {
            return false;
        }
        state.participants.delete_where(|row| row.match_id != match_id);
        state.scores.delete_where(|row| row.match_id != match_id);
        true
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryStore {
    async fn match_exists(&self, match_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().catalog.matches.contains_key(&match_id))
    }

    async fn team_exists(&self, team_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().catalog.teams.contains_key(&team_id))
    }

    async fn player_exists(&self, player_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().catalog.players.contains_key(&player_id))
    }
}

macro_rules! ledger_store {
    ($payload:ty, $ledger:ident) => {
        #[async_trait]
        impl ParticipationStore<$payload> for InMemoryStore {
            async fn insert_all(
                &self,
                entries: Vec<NewParticipation<$payload>>,
            ) -> Result<Vec<ParticipationRecord<$payload>>, StoreError> {
                let mut state = self.lock();
                let State { catalog, $ledger: ledger, .. } = &mut *state;
                ledger.insert_all(catalog, entries)
            }

            async fn find(
                &self,
                id: Uuid,
            ) -> Result<Option<ParticipationRecord<$payload>>, StoreError> {
                let state = self.lock();
                Ok(state.$ledger.rows.iter().find(|row| row.id == id).cloned())
            }

            async fn find_view(
                &self,
                id: Uuid,
            ) -> Result<Option<ParticipationView<$payload>>, StoreError> {
                let state = self.lock();
                Ok(state
                    .$ledger
                    .rows
                    .iter()
                    .find(|row| row.id == id)
                    .and_then(|row| state.catalog.view(row)))
            }

            async fn list_views(
                &self,
                filter: ParticipationFilter,
            ) -> Result<Vec<ParticipationView<$payload>>, StoreError> {
                let state = self.lock();
                Ok(state
                    .$ledger
                    .rows
                    .iter()
                    .filter(|row| filter.matches(row))
                    .filter_map(|row| state.catalog.view(row))
                    .collect())
            }

            async fn save(
                &self,
                record: ParticipationRecord<$payload>,
            ) -> Result<Option<ParticipationRecord<$payload>>, StoreError> {
                let mut state = self.lock();
                let State { catalog, $ledger: ledger, .. } = &mut *state;
                ledger.save(catalog, record)
            }

            async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
                Ok(self.lock().$ledger.delete_where(|row| row.id != id) > 0)
            }

            async fn delete_by_match(&self, match_id: Uuid) -> Result<u64, StoreError> {
                Ok(self
                    .lock()
                    .$ledger
                    .delete_where(|row| row.match_id != match_id))
            }
        }
    };
}

ledger_store!(Unscored, participants);
ledger_store!(ScoreLine, scores);

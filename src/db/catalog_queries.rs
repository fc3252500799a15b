// src/db/catalog_queries.rs
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::catalog::{
    CreateMatchRequest, CreatePlayerRequest, CreateTeamRequest, CreateTournamentRequest, Match,
    Player, Team, Tournament,
};

/// Queries for the entities participation records point at.
#[derive(Debug, Clone)]
pub struct CatalogQueries {
    pool: PgPool,
}

impl CatalogQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_tournament(
        &self,
        request: &CreateTournamentRequest,
    ) -> Result<Tournament, sqlx::Error> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .fetch_one(&self.pool)
        .await?;

        info!("Created tournament {}", tournament.id);
        Ok(tournament)
    }

    pub async fn get_tournament(&self, id: Uuid) -> Result<Option<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(
            "SELECT id, name, created_at, updated_at FROM tournaments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fails with a foreign key violation when the tournament does not exist.
    pub async fn create_match(&self, request: &CreateMatchRequest) -> Result<Match, sqlx::Error> {
        let fixture = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, tournament_id, name, scheduled_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tournament_id, name, scheduled_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.tournament_id)
        .bind(request.name.trim())
        .bind(request.scheduled_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Created match {} in tournament {}", fixture.id, fixture.tournament_id);
        Ok(fixture)
    }

    pub async fn get_match(&self, id: Uuid) -> Result<Option<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(
            r#"
            SELECT id, tournament_id, name, scheduled_at, created_at, updated_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Participants and scores of the match go with it (ON DELETE CASCADE).
    pub async fn delete_match(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_team(&self, request: &CreateTeamRequest) -> Result<Team, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_team(&self, id: Uuid) -> Result<Option<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>("SELECT id, name, created_at, updated_at FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fails with a foreign key violation when `team_id` points nowhere.
    pub async fn create_player(&self, request: &CreatePlayerRequest) -> Result<Player, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (id, name, team_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, team_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(request.team_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_player(&self, id: Uuid) -> Result<Option<Player>, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name, team_id, created_at, updated_at FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

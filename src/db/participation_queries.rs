// src/db/participation_queries.rs
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::models::participation::{
    NewParticipation, Participant, ParticipationFilter, ParticipationRecord, ParticipationView,
    Payload, ScoreLine, Unscored,
};
use crate::participation::store::{ParticipantDirectory, ParticipationStore, StoreError};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

const BASE_COLUMNS: [&str; 5] = ["id", "match_id", "participant_type", "team_id", "player_id"];

/// Payload columns of a participation table and how to move them in and out of Postgres.
pub trait PgPayload: Payload {
    /// Payload columns, in bind order.
    const COLUMNS: &'static [&'static str];

    fn bind_to<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl PgPayload for Unscored {
    const COLUMNS: &'static [&'static str] = &[];

    fn bind_to<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
    }

    fn from_row(_row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Unscored {})
    }
}

impl PgPayload for ScoreLine {
    const COLUMNS: &'static [&'static str] = &["score", "details"];

    fn bind_to<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.score).bind(self.details.clone())
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(ScoreLine {
            score: row.try_get("score")?,
            details: row.try_get("details")?,
        })
    }
}

fn record_columns<P: PgPayload>(alias: Option<&str>) -> String {
    BASE_COLUMNS
        .iter()
        .chain(P::COLUMNS.iter())
        .chain(["created_at", "updated_at"].iter())
        .map(|column| match alias {
            Some(alias) => format!("{}.{}", alias, column),
            None => column.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql<P: PgPayload>() -> String {
    let columns: Vec<&str> = BASE_COLUMNS.iter().chain(P::COLUMNS.iter()).copied().collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        P::TABLE,
        columns.join(", "),
        placeholders.join(", "),
        record_columns::<P>(None)
    )
}

fn update_sql<P: PgPayload>() -> String {
    // $1 is the id, the remaining columns follow in bind order
    let assignments: Vec<String> = BASE_COLUMNS[1..]
        .iter()
        .chain(P::COLUMNS.iter())
        .enumerate()
        .map(|(n, column)| format!("{} = ${}", column, n + 2))
        .collect();
    format!(
        "UPDATE {} SET {}, updated_at = NOW() WHERE id = $1 RETURNING {}",
        P::TABLE,
        assignments.join(", "),
        record_columns::<P>(None)
    )
}

fn view_sql<P: PgPayload>(condition: &str) -> String {
    format!(
        r#"
        SELECT {},
            m.tournament_id,
            t.name AS tournament_name,
            m.name AS match_name,
            m.scheduled_at,
            tm.name AS team_name,
            p.name AS player_name
        FROM {} mp
        JOIN matches m ON m.id = mp.match_id
        JOIN tournaments t ON t.id = m.tournament_id
        LEFT JOIN teams tm ON tm.id = mp.team_id
        LEFT JOIN players p ON p.id = mp.player_id
        WHERE {}
        ORDER BY mp.created_at, mp.id
        "#,
        record_columns::<P>(Some("mp")),
        P::TABLE,
        condition
    )
}

fn bind_participant<'q>(query: PgQuery<'q>, participant: &Participant) -> PgQuery<'q> {
    query
        .bind(participant.participant_type().as_str())
        .bind(participant.team_id())
        .bind(participant.player_id())
}

fn record_from_row<P: PgPayload>(row: &PgRow) -> Result<ParticipationRecord<P>, sqlx::Error> {
    let participant_type: String = row.try_get("participant_type")?;
    let participant = Participant::from_columns(
        &participant_type,
        row.try_get("team_id")?,
        row.try_get("player_id")?,
    )
    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(ParticipationRecord {
        id: row.try_get("id")?,
        match_id: row.try_get("match_id")?,
        participant,
        payload: P::from_row(row)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn view_from_row<P: PgPayload>(row: &PgRow) -> Result<ParticipationView<P>, sqlx::Error> {
    Ok(ParticipationView {
        record: record_from_row(row)?,
        tournament_id: row.try_get("tournament_id")?,
        tournament_name: row.try_get("tournament_name")?,
        match_name: row.try_get("match_name")?,
        scheduled_at: row.try_get("scheduled_at")?,
        team_name: row.try_get("team_name")?,
        player_name: row.try_get("player_name")?,
    })
}

async fn exists(pool: &PgPool, table: &str, id: Uuid) -> Result<bool, StoreError> {
    let found: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        table
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

/// Postgres-backed participation storage. Uniqueness and mutual exclusion
/// are enforced by the schema, see `migrations/`.
#[derive(Debug, Clone)]
pub struct PgParticipationStore {
    pool: PgPool,
}

impl PgParticipationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantDirectory for PgParticipationStore {
    async fn match_exists(&self, match_id: Uuid) -> Result<bool, StoreError> {
        exists(&self.pool, "matches", match_id).await
    }

    async fn team_exists(&self, team_id: Uuid) -> Result<bool, StoreError> {
        exists(&self.pool, "teams", team_id).await
    }

    async fn player_exists(&self, player_id: Uuid) -> Result<bool, StoreError> {
        exists(&self.pool, "players", player_id).await
    }
}

#[async_trait]
impl<P: PgPayload> ParticipationStore<P> for PgParticipationStore {
    async fn insert_all(
        &self,
        entries: Vec<NewParticipation<P>>,
    ) -> Result<Vec<ParticipationRecord<P>>, StoreError> {
        let sql = insert_sql::<P>();
        let mut records = Vec::with_capacity(entries.len());

        // One transaction so a failing entry rolls back the ones before it
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            let query = sqlx::query(&sql).bind(Uuid::new_v4()).bind(entry.match_id);
            let query = entry.payload.bind_to(bind_participant(query, &entry.participant));
            let row = query.fetch_one(&mut *tx).await.map_err(|e| {
                tracing::warn!(
                    "Insert into {} failed for match {}: {}",
                    P::TABLE,
                    entry.match_id,
                    e
                );
                e
            })?;
            records.push(record_from_row::<P>(&row)?);
        }
        tx.commit().await?;

        Ok(records)
    }

    async fn find(&self, id: Uuid) -> Result<Option<ParticipationRecord<P>>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            record_columns::<P>(None),
            P::TABLE
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(record_from_row::<P>).transpose()?)
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<ParticipationView<P>>, StoreError> {
        let sql = view_sql::<P>("mp.id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(view_from_row::<P>).transpose()?)
    }

    async fn list_views(
        &self,
        filter: ParticipationFilter,
    ) -> Result<Vec<ParticipationView<P>>, StoreError> {
        let sql = view_sql::<P>(&format!("mp.{} = $1", filter.column()));
        let rows = sqlx::query(&sql)
            .bind(filter.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(view_from_row::<P>)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn save(
        &self,
        record: ParticipationRecord<P>,
    ) -> Result<Option<ParticipationRecord<P>>, StoreError> {
        let sql = update_sql::<P>();
        let query = sqlx::query(&sql).bind(record.id).bind(record.match_id);
        let query = record.payload.bind_to(bind_participant(query, &record.participant));
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(record_from_row::<P>).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", P::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_match(&self, match_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE match_id = $1", P::TABLE))
            .bind(match_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

//! `PostgreSQL` implementation of the `ProgressRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use novella_core::error::DomainError;
use novella_core::ids::PlayerId;
use novella_core::repository::{ProgressRecord, ProgressRepository};

use crate::schema::CREATE_PLAYER_PROGRESS_TABLE;

/// PostgreSQL-backed progress repository.
#[derive(Debug, Clone)]
pub struct PgProgressRepository {
    pool: PgPool,
}

impl PgProgressRepository {
    /// Creates a new `PgProgressRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `player_progress` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_PLAYER_PROGRESS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;
        Ok(())
    }
}

fn infrastructure(e: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("progress store: {e}"))
}

fn to_column(value: u32, column: &str) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::Validation(format!("{column} out of range: {value}")))
}

fn from_column(value: i32, column: &str) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| DomainError::Infrastructure(format!("negative {column} in store: {value}")))
}

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn load(&self, player_id: PlayerId) -> Result<Option<ProgressRecord>, DomainError> {
        let row: Option<(i32, i32, DateTime<Utc>)> = sqlx::query_as(
            "SELECT chapters_completed, chapters_unlocked, updated_at \
             FROM player_progress WHERE player_id = $1",
        )
        .bind(player_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;

        row.map(|(completed, unlocked, updated_at)| {
            Ok(ProgressRecord {
                chapters_completed: from_column(completed, "chapters_completed")?,
                chapters_unlocked: from_column(unlocked, "chapters_unlocked")?,
                updated_at: Some(updated_at),
            })
        })
        .transpose()
    }

    #[instrument(skip(self, record), fields(player_id = %player_id))]
    async fn save(&self, player_id: PlayerId, record: &ProgressRecord) -> Result<(), DomainError> {
        // GREATEST keeps the watermark monotonic even when writes race.
        sqlx::query(
            "INSERT INTO player_progress (player_id, chapters_completed, chapters_unlocked, updated_at) \
             VALUES ($1, $2, $3, COALESCE($4, NOW())) \
             ON CONFLICT (player_id) DO UPDATE SET \
                 chapters_completed = EXCLUDED.chapters_completed, \
                 chapters_unlocked = GREATEST(player_progress.chapters_unlocked, EXCLUDED.chapters_unlocked), \
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(player_id.0)
        .bind(to_column(record.chapters_completed, "chapters_completed")?)
        .bind(to_column(record.chapters_unlocked, "chapters_unlocked")?)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;

        Ok(())
    }
}

use crate::models::{MatchResult, MatchStrength};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A persisted pairwise match result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: uuid::Uuid,
    pub user1_id: String,
    pub user2_id: String,
    pub score: f64,
    pub strength: MatchStrength,
    pub shared_artists: Vec<String>,
    pub shared_tracks: Vec<String>,
    pub shared_genres: Vec<String>,
    pub compatibility_reasons: Vec<String>,
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

const CREATE_MATCH_HISTORY: &str = r#"
    CREATE TABLE IF NOT EXISTS match_history (
        id UUID PRIMARY KEY,
        user1_id TEXT NOT NULL,
        user2_id TEXT NOT NULL,
        score DOUBLE PRECISION NOT NULL,
        strength TEXT NOT NULL,
        result JSONB NOT NULL,
        matched_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_MATCH_HISTORY_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS match_history_users_idx
    ON match_history (user1_id, user2_id, matched_at DESC)
"#;

/// PostgreSQL client for match history
///
/// Profiles live in the document store; this database only keeps the
/// results computed for ordered user pairs, one row per scoring request.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        let client = Self { pool };
        client.ensure_schema().await?;

        Ok(client)
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Create the history table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), PostgresError> {
        sqlx::query(CREATE_MATCH_HISTORY).execute(&self.pool).await?;
        sqlx::query(CREATE_MATCH_HISTORY_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Persist the result of scoring `user1_id` against `user2_id`
    pub async fn record_match(
        &self,
        user1_id: &str,
        user2_id: &str,
        result: &MatchResult,
    ) -> Result<uuid::Uuid, PostgresError> {
        let id = uuid::Uuid::new_v4();
        let payload = serde_json::to_value(result)?;

        let query = r#"
            INSERT INTO match_history (id, user1_id, user2_id, score, strength, result, matched_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(user1_id)
            .bind(user2_id)
            .bind(result.score)
            .bind(result.strength.as_str())
            .bind(payload)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded match: {} -> {} ({:.1}, {})",
            user1_id,
            user2_id,
            result.score,
            result.strength
        );

        Ok(id)
    }

    /// Match results involving a user on either side, newest first
    pub async fn get_match_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            SELECT id, user1_id, user2_id, result, matched_at
            FROM match_history
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY matched_at DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<MatchRecord, PostgresError> {
                let result: MatchResult = serde_json::from_value(row.get("result"))?;
                Ok(MatchRecord {
                    id: row.get("id"),
                    user1_id: row.get("user1_id"),
                    user2_id: row.get("user2_id"),
                    score: result.score,
                    strength: result.strength,
                    shared_artists: result.shared_artists,
                    shared_tracks: result.shared_tracks,
                    shared_genres: result.shared_genres,
                    compatibility_reasons: result.compatibility_reasons,
                    matched_at: row.get("matched_at"),
                })
            })
            .collect()
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

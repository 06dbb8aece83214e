//! Postgres-backed checkpoint store.
//!
//! Uses runtime-checked `sqlx::query()`/`query_as()` rather than the
//! compile-time `sqlx::query!()` macros, because the `checkpoints` table is
//! created by a migration that may not exist at compile time (same
//! rationale as the teacher's task queue listener).

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use trialkit_types::{Checkpoint, PipelineStep};

use crate::traits::{CheckpointError, CheckpointStore};

/// A single shared pool backs the store; the store is constructed once per
/// process, never per invocation. Pool exhaustion upstream is a fatal
/// configuration error, not something this type papers over.
#[derive(Clone)]
pub struct PostgresCheckpointStore {
    pool: PgPool,
}

impl PostgresCheckpointStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckpointStore for PostgresCheckpointStore {
    async fn write(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        sqlx::query(
            r#"
            INSERT INTO checkpoints (thread_id, step, state, written_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (thread_id, step) DO UPDATE
            SET state = EXCLUDED.state, written_at = EXCLUDED.written_at
            "#,
        )
        .bind(&checkpoint.thread_id)
        .bind(checkpoint.step.as_str())
        .bind(&checkpoint.state)
        .bind(checkpoint.written_at)
        .execute(&self.pool)
        .await
        .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn latest(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let row = sqlx::query(
            r#"
            SELECT thread_id, step, state, written_at
            FROM checkpoints
            WHERE thread_id = $1
            ORDER BY written_at DESC
            LIMIT 1
            "#,
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let step_str: String = row.get("step");
        let step = step_str
            .parse::<PipelineStep>()
            .map_err(CheckpointError::Unavailable)?;

        Ok(Some(Checkpoint {
            thread_id: row.get("thread_id"),
            step,
            state: row.get("state"),
            written_at: row.get("written_at"),
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Real-database coverage lives behind `#[ignore]`; these tests need a
    //! live Postgres instance and `DATABASE_URL` set. Run with
    //! `cargo test -- --ignored`.
    use super::*;
    use serde_json::json;
    use trialkit_types::PipelineStep;

    async fn pool() -> PgPool {
        PgPool::connect(&std::env::var("DATABASE_URL").expect("DATABASE_URL"))
            .await
            .expect("connect")
    }

    #[tokio::test]
    #[ignore]
    async fn write_then_latest_round_trips_against_postgres() {
        let store = PostgresCheckpointStore::new(pool().await);
        let thread_id = format!("test:{}", uuid::Uuid::new_v4());
        store
            .write(Checkpoint::new(thread_id.clone(), PipelineStep::Extract, json!({"k": "v"})))
            .await
            .unwrap();
        let latest = store.latest(&thread_id).await.unwrap().unwrap();
        assert_eq!(latest.step, PipelineStep::Extract);
    }
}

//! One trait, two implementations: a Postgres-backed store for production
//! and an in-memory store that doubles as the no-op fallback when no
//! durable backend is configured.

use async_trait::async_trait;
use trialkit_types::{Checkpoint, PipelineStep};

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("checkpoint store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Append a checkpoint for `thread_id` at `step`. Writes are
    /// transactional with the caller's own per-node progress indicator;
    /// a failed write means the step is not considered committed.
    async fn write(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError>;

    /// The latest complete checkpoint for `thread_id`, or `None` if this
    /// thread has never been checkpointed.
    async fn latest(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// The node to resume from: the step after the latest checkpoint, or
    /// the first step of the pipeline if there is none.
    async fn resume_point(&self, thread_id: &str) -> Result<PipelineStep, CheckpointError> {
        Ok(match self.latest(thread_id).await? {
            Some(checkpoint) => checkpoint.step.next().unwrap_or(checkpoint.step),
            None => PipelineStep::Ingest,
        })
    }
}

//! In-memory checkpoint store. Doubles as the no-op fallback for
//! environments with no durable backend configured (spec §4.4).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use trialkit_types::Checkpoint;

use crate::traits::{CheckpointError, CheckpointStore};

#[derive(Clone, Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Arc<Mutex<HashMap<String, Checkpoint>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn write(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        self.checkpoints
            .lock()
            .await
            .insert(checkpoint.thread_id.clone(), checkpoint);
        Ok(())
    }

    async fn latest(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        Ok(self.checkpoints.lock().await.get(thread_id).cloned())
    }
}

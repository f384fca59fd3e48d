//! Snapshot store port - read/write of the persisted encounter snapshot
//!
//! Storage is best-effort overwrite; there is no history or durability
//! guarantee beyond the last successful save.

use async_trait::async_trait;

use crate::application::dto::EncounterSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStorePort: Send + Sync {
    /// Load the last saved snapshot; `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<EncounterSnapshot>, StoreError>;

    /// Overwrite the stored snapshot
    async fn save(&self, snapshot: &EncounterSnapshot) -> Result<(), StoreError>;
}

//! JSON file adapter for the snapshot store port

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::dto::EncounterSnapshot;
use crate::application::ports::outbound::{SnapshotStorePort, StoreError};

/// Keeps the snapshot as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStorePort for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Option<EncounterSnapshot>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot saved yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), "Loaded snapshot");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &EncounterSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        info!(path = %self.path.display(), "Saved snapshot");
        Ok(())
    }
}

//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::domain::value_objects::EngineSettings;

const DEFAULT_SNAPSHOT_PATH: &str = "combat-tracker.json";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the encounter snapshot is read from and saved to
    pub snapshot_path: PathBuf,

    /// Rules the engine applies to the loaded encounter
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let snapshot_path = env::var("COMBAT_SNAPSHOT_PATH")
            .unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string());
        ensure!(
            !snapshot_path.trim().is_empty(),
            "COMBAT_SNAPSHOT_PATH must not be empty"
        );

        let engine = EngineSettings::from_env();
        ensure!(
            engine.max_log_entries > 0,
            "COMBAT_MAX_LOG_ENTRIES must be at least 1"
        );

        Ok(Self {
            snapshot_path: PathBuf::from(snapshot_path),
            engine,
        })
    }
}

//! Engine settings value object
//!
//! Settings travel with the persisted snapshot tooling and are read from the
//! environment by the binary, so they carry serde derives.

use serde::{Deserialize, Serialize};

/// Hard cap on boss attack charges
pub const MAX_ATTACK_CHARGES: i32 = 5;

/// All configurable engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    // Combat log
    pub max_log_entries: usize,

    // Turn order
    pub collapse_group_collections: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_log_entries: 200,
            collapse_group_collections: true,
        }
    }
}

impl EngineSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_log_entries: env_or("COMBAT_MAX_LOG_ENTRIES", defaults.max_log_entries),
            collapse_group_collections: env_or(
                "COMBAT_COLLAPSE_GROUP_COLLECTIONS",
                defaults.collapse_group_collections,
            ),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

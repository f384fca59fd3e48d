//! Combat Tracker Engine binary
//!
//! Loads the persisted encounter snapshot and logs the current initiative
//! order. All rules live in the library; this is only the wiring.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use combat_tracker_engine::application::dto::ImportOptions;
use combat_tracker_engine::application::ports::outbound::SnapshotStorePort;
use combat_tracker_engine::application::services::{StandardHealthDisplay, TurnOrderService};
use combat_tracker_engine::domain::aggregates::EncounterAggregate;
use combat_tracker_engine::infrastructure::config::AppConfig;
use combat_tracker_engine::infrastructure::export::apply_snapshot;
use combat_tracker_engine::infrastructure::persistence::JsonFileSnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combat_tracker_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Combat Tracker Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Snapshot: {}", config.snapshot_path.display());
    tracing::info!("  Max log entries: {}", config.engine.max_log_entries);

    let store = JsonFileSnapshotStore::new(&config.snapshot_path);
    let snapshot = store
        .load()
        .await
        .with_context(|| format!("failed to load {}", config.snapshot_path.display()))?;

    let mut encounter = EncounterAggregate::new(config.engine.clone());
    match snapshot {
        Some(snapshot) => {
            let summary = apply_snapshot(&mut encounter, snapshot, &ImportOptions::default())
                .context("Saved encounter failed validation")?;
            tracing::info!(
                characters = summary.characters,
                bosses = summary.bosses,
                enemy_groups = summary.enemy_groups,
                "Encounter restored"
            );
        }
        None => tracing::info!("No saved encounter; starting empty"),
    }

    let rows = TurnOrderService::new().display(&encounter, &StandardHealthDisplay);
    if rows.is_empty() {
        tracing::info!("Initiative order is empty");
    }
    for (position, row) in rows.iter().enumerate() {
        tracing::info!(
            position = position + 1,
            initiative = row.initiative,
            hp = %row.hp_text,
            health = %row.health_colour,
            "{}",
            row.name
        );
    }

    Ok(())
}

//! Selective export and import of the encounter snapshot
//!
//! Import is all-or-nothing at the top level: the whole payload is parsed
//! and validated before the live roster is touched, so a malformed file
//! changes nothing. Per-type options only take effect on a valid payload.
//! Within one imported array a repeated id keeps its last occurrence.

use tracing::{debug, info, instrument};

use crate::application::dto::{
    EncounterSnapshot, ExportOptions, ImportMode, ImportOptions, TypeImport, TypeSelection,
};
use crate::domain::aggregates::{validate_name, AggregateError, EncounterAggregate};
use crate::domain::entities::{Boss, Character, EnemyGroup};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Invalid snapshot entity: {0}")]
    Invalid(#[from] AggregateError),
}

/// How many entities of each type an import wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub characters: usize,
    pub bosses: usize,
    pub enemy_groups: usize,
}

/// Snapshot of the whole roster
pub fn snapshot_of(encounter: &EncounterAggregate) -> EncounterSnapshot {
    build_snapshot(encounter, &ExportOptions::default())
}

/// Snapshot of the selected entities; excluded types are omitted entirely
pub fn build_snapshot(encounter: &EncounterAggregate, options: &ExportOptions) -> EncounterSnapshot {
    EncounterSnapshot {
        characters: select(encounter.characters(), &options.characters, |c| c.id.as_str()),
        bosses: select(encounter.bosses(), &options.bosses, |b| b.id.as_str()),
        enemy_groups: select(encounter.enemy_groups(), &options.enemy_groups, |g| g.id.as_str()),
    }
}

fn select<T: Clone>(items: &[T], selection: &TypeSelection, id: impl Fn(&T) -> &str) -> Option<Vec<T>> {
    selection.include.then(|| {
        items
            .iter()
            .filter(|item| selection.selects(id(item)))
            .cloned()
            .collect()
    })
}

/// Serialize the selected entities as pretty JSON
pub fn export_snapshot(encounter: &EncounterAggregate, options: &ExportOptions) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(&build_snapshot(encounter, options)).map_err(SnapshotError::Serialize)
}

pub fn parse_snapshot(json: &str) -> Result<EncounterSnapshot, SnapshotError> {
    serde_json::from_str(json).map_err(SnapshotError::Parse)
}

/// Parse `json` and merge it into the encounter
#[instrument(skip(encounter, json, options), fields(bytes = json.len()))]
pub fn import_snapshot(
    encounter: &mut EncounterAggregate,
    json: &str,
    options: &ImportOptions,
) -> Result<ImportSummary, SnapshotError> {
    let snapshot = parse_snapshot(json)?;
    apply_snapshot(encounter, snapshot, options)
}

/// Reject snapshots carrying entities the add path would refuse
pub fn validate_snapshot(snapshot: &EncounterSnapshot) -> Result<(), SnapshotError> {
    let names = snapshot
        .characters
        .iter()
        .flatten()
        .map(|c| c.name.as_str())
        .chain(snapshot.bosses.iter().flatten().map(|b| b.name.as_str()))
        .chain(snapshot.enemy_groups.iter().flatten().map(|g| g.name.as_str()));
    for name in names {
        validate_name(name)?;
    }
    Ok(())
}

/// Apply an already-parsed snapshot; every imported entity is normalized
pub fn apply_snapshot(
    encounter: &mut EncounterAggregate,
    snapshot: EncounterSnapshot,
    options: &ImportOptions,
) -> Result<ImportSummary, SnapshotError> {
    validate_snapshot(&snapshot)?;
    let mut summary = ImportSummary::default();

    if let Some(characters) = combine(
        encounter.characters(),
        snapshot.characters,
        &options.characters,
        |c: &Character| c.id.clone(),
        &mut summary.characters,
    ) {
        encounter.set_characters(characters);
    }
    if let Some(bosses) = combine(
        encounter.bosses(),
        snapshot.bosses,
        &options.bosses,
        |b: &Boss| b.id.clone(),
        &mut summary.bosses,
    ) {
        encounter.set_bosses(bosses);
    }
    if let Some(groups) = combine(
        encounter.enemy_groups(),
        snapshot.enemy_groups,
        &options.enemy_groups,
        |g: &EnemyGroup| g.id.clone(),
        &mut summary.enemy_groups,
    ) {
        encounter.set_enemy_groups(groups);
    }

    info!(
        characters = summary.characters,
        bosses = summary.bosses,
        enemy_groups = summary.enemy_groups,
        "Imported snapshot"
    );
    Ok(summary)
}

/// The new list for one entity type, or `None` to leave it alone
fn combine<T: Clone, K: PartialEq>(
    live: &[T],
    imported: Option<Vec<T>>,
    option: &TypeImport,
    key: impl Fn(&T) -> K,
    written: &mut usize,
) -> Option<Vec<T>> {
    if !option.include {
        return None;
    }

    let Some(imported) = imported else {
        if option.clear_missing {
            debug!("Type absent from snapshot; clearing live entities");
            return Some(Vec::new());
        }
        return None;
    };

    let imported = dedupe_by_key(imported, &key);
    *written = imported.len();
    match option.mode {
        ImportMode::Replace => Some(imported),
        ImportMode::Merge => {
            let mut merged = live.to_vec();
            for item in imported {
                let id = key(&item);
                match merged.iter_mut().find(|existing| key(existing) == id) {
                    Some(existing) => *existing = item,
                    None => merged.push(item),
                }
            }
            Some(merged)
        }
    }
}

/// Collapse repeated ids, keeping the position of the first and the value of the last
fn dedupe_by_key<T, K: PartialEq>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let id = key(&item);
        match unique.iter_mut().find(|existing| key(existing) == id) {
            Some(existing) => *existing = item,
            None => unique.push(item),
        }
    }
    unique
}

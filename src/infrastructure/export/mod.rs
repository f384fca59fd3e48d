//! Encounter export and import
//!
//! Selective JSON export of the roster and the all-or-nothing import that
//! reads it back.

mod encounter_snapshot;

pub use encounter_snapshot::{
    apply_snapshot, build_snapshot, export_snapshot, import_snapshot, parse_snapshot, snapshot_of,
    validate_snapshot, ImportSummary, SnapshotError,
};

//! Persistence adapters
//!
//! The engine never owns storage; this adapter implements the snapshot store
//! port for the binary.

mod json_snapshot_store;

pub use json_snapshot_store::JsonFileSnapshotStore;

//! Outbound ports - Interfaces the engine requires from its surroundings

mod dice_port;
mod snapshot_store_port;

pub use dice_port::DiceRoller;
pub use snapshot_store_port::{SnapshotStorePort, StoreError};

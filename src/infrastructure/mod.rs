//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Config: Application configuration
//! - Dice: RNG-backed d20 roller
//! - Export: Selective snapshot export/import
//! - Persistence: JSON file snapshot store

pub mod config;
pub mod dice;
pub mod export;
pub mod persistence;

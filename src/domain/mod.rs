//! Domain layer - Core combat rules with no I/O
//!
//! This layer contains:
//! - Entities: Character, Boss, EnemyGroup, combat log entries
//! - Value Objects: ids, defenses, saving throws, damage modifiers, settings
//! - Aggregates: the Encounter aggregate root owning all combat state
//! - Domain Services: pure HP, saving-throw and group arithmetic

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;

//! Combat Tracker Engine - Combat resolution core for TTRPG encounters
//!
//! The engine tracks hit points, temporary hit points, defenses, saving
//! throws and initiative for characters, bosses and groups of identical
//! creatures, and resolves single-target, area and healing actions against
//! them.
//!
//! - `domain`: entities, value objects, the encounter aggregate and the pure
//!   HP/save/group arithmetic
//! - `application`: use-case services, DTOs and the outbound ports
//! - `infrastructure`: configuration, dice, snapshot storage and export

pub mod application;
pub mod domain;
pub mod infrastructure;

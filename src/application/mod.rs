//! Application layer - Use cases over the encounter aggregate
//!
//! - DTOs: damage, roster and snapshot requests
//! - Ports: dice and snapshot storage interfaces
//! - Services: roster editing, AoE, healing, turn order and the combat log

pub mod dto;
pub mod ports;
pub mod services;

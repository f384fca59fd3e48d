//! Data transfer objects for the application services

mod combatant_requests;
mod damage_request;
mod snapshot;

pub use combatant_requests::{CreateCombatantRequest, UpdateCombatantRequest};
pub use damage_request::{
    AoeDamageRequest, ComponentOverride, DamageComponent, SaveCheck, SingleTargetDamage,
    TargetOverride,
};
pub use snapshot::{
    EncounterSnapshot, ExportOptions, ImportMode, ImportOptions, TypeImport, TypeSelection,
};

//! Value objects - Immutable objects defined by their attributes

mod damage;
mod defenses;
mod ids;
mod saving_throws;
mod settings;

pub use damage::DamageModifier;
pub use defenses::{
    normalize_defenses, toggle_exclusive_defense, DefenseCategory, Defenses, PartialDefenses,
};
pub use ids::*;
pub use saving_throws::{normalize_saving_throws, Ability, SavingThrows};
pub use settings::{EngineSettings, MAX_ATTACK_CHARGES};

//! Domain entities - Combatants and the records combat leaves behind

mod boss;
mod character;
mod combat_log;
mod combatant;
mod enemy_group;

pub use boss::{Boss, BossAttack};
pub use character::Character;
pub use combat_log::{CombatLogEntry, HitStatus, LogEffect, LogTarget};
pub use combatant::{Combatant, EntityRef};
pub use enemy_group::{CreatureHp, EnemyGroup, EnemyGroupTemplate};

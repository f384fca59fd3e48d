//! Domain services - Pure combat arithmetic with no I/O and no shared state

pub mod group_hit_points;
pub mod hit_points;
pub mod normalization;
pub mod numeric;
pub mod saving_throw;

pub use group_hit_points::{
    build_creature_hp_details, calculate_collection_totals, calculate_group_totals,
    damage_group_area, damage_group_creature, distribute_healing, heal_group,
    GroupDamageOutcome, GroupTotals,
};
pub use hit_points::{apply_damage_with_temp_hp, apply_healing, set_temp_hp, DamageApplication};
pub use normalization::{
    normalize_boss, normalize_boss_attack, normalize_character, normalize_enemy_group,
};
pub use numeric::{clamp, clamp_charges, clamp_hp, clamp_max_charges, ensure_non_negative, NumericError};
pub use saving_throw::{calculate_save_damage, check_save, roll_save, save_modifier, SaveResult};

//! Saving throw resolution

use crate::domain::value_objects::DamageModifier;

/// A rolled saving throw; pass/fail is decided separately against a DC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveResult {
    pub roll: i32,
    pub modifier: i32,
    pub total: i32,
}

impl SaveResult {
    /// Build a result from a roll entered by hand at the table
    pub fn manual(roll: i32, modifier: i32) -> Self {
        Self {
            roll,
            modifier,
            total: roll + modifier,
        }
    }
}

/// Roll a d20 through `roll_fn` and add `modifier`
pub fn roll_save(modifier: i32, roll_fn: impl FnOnce() -> i32) -> SaveResult {
    SaveResult::manual(roll_fn(), modifier)
}

/// A save passes when the total meets or beats the DC
pub fn check_save(save: &SaveResult, dc: i32) -> bool {
    save.total >= dc
}

/// Damage after the save: full on a fail, half (rounded down) or nothing on a pass
pub fn calculate_save_damage(damage: i32, saved: bool, half_on_save: bool) -> i32 {
    save_modifier(DamageModifier::Full, saved, half_on_save).apply(damage)
}

/// The tier a target takes once its save is known
///
/// A passed half-on-save steps `base` down once; any other pass negates.
pub fn save_modifier(base: DamageModifier, saved: bool, half_on_save: bool) -> DamageModifier {
    match (saved, half_on_save) {
        (false, _) => base,
        (true, true) => base.halved_by_save(),
        (true, false) => DamageModifier::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_save_sums_roll_and_modifier() {
        let result = roll_save(4, || 11);
        assert_eq!(result, SaveResult { roll: 11, modifier: 4, total: 15 });
    }

    #[test]
    fn test_check_save_meets_dc() {
        assert!(check_save(&SaveResult::manual(10, 5), 15));
        assert!(!check_save(&SaveResult::manual(9, 5), 15));
    }

    #[test]
    fn test_calculate_save_damage() {
        assert_eq!(calculate_save_damage(20, true, true), 10);
        assert_eq!(calculate_save_damage(21, true, true), 10);
        assert_eq!(calculate_save_damage(20, true, false), 0);
        assert_eq!(calculate_save_damage(20, false, true), 20);
        assert_eq!(calculate_save_damage(20, false, false), 20);
    }

    #[test]
    fn test_save_modifier_steps_from_defense_tier() {
        assert_eq!(save_modifier(DamageModifier::Half, true, true), DamageModifier::Quarter);
        assert_eq!(save_modifier(DamageModifier::Double, true, true), DamageModifier::Full);
        assert_eq!(save_modifier(DamageModifier::Double, true, false), DamageModifier::None);
        assert_eq!(save_modifier(DamageModifier::Half, false, true), DamageModifier::Half);
    }
}

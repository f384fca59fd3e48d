//! Hit point and temporary hit point arithmetic
//!
//! Temporary HP is a buffer consumed before current HP and is never healed.

use super::numeric::ensure_non_negative;

/// Outcome of running damage through the temp-HP buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageApplication {
    /// Portion of the damage that overflowed temp HP
    pub remaining_damage: i32,
    pub new_current_hp: i32,
    pub new_temp_hp: i32,
}

/// Absorb damage with temp HP first, then reduce current HP (floored at 0)
///
/// Negative damage counts as 0; healing never goes through this path.
pub fn apply_damage_with_temp_hp(damage: i32, current_hp: i32, temp_hp: i32) -> DamageApplication {
    let damage = ensure_non_negative(damage);
    let temp_hp = ensure_non_negative(temp_hp);

    let absorbed = damage.min(temp_hp);
    let remaining_damage = damage - absorbed;

    DamageApplication {
        remaining_damage,
        new_current_hp: ensure_non_negative(current_hp.saturating_sub(remaining_damage)),
        new_temp_hp: temp_hp - absorbed,
    }
}

/// Heal up to `max_hp`; zero or negative amounts leave HP unchanged
pub fn apply_healing(amount: i32, current_hp: i32, max_hp: i32) -> i32 {
    if amount <= 0 {
        return current_hp;
    }
    current_hp.saturating_add(amount).min(max_hp)
}

/// Replace or stack temp HP; a negative amount leaves the existing value
pub fn set_temp_hp(amount: i32, existing_temp_hp: i32, replace: bool) -> i32 {
    if amount < 0 {
        return existing_temp_hp;
    }
    if replace {
        amount
    } else {
        existing_temp_hp.saturating_add(amount)
    }
}

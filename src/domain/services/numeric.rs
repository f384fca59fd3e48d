//! Numeric primitives shared by the combat cores

use crate::domain::value_objects::MAX_ATTACK_CHARGES;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    /// The caller passed `min > max`; this is a bug at the call site, not bad data
    #[error("Invalid clamp range: min {min} is greater than max {max}")]
    InvertedRange { min: i32, max: i32 },
}

/// Clamp `value` into `[min, max]`, rejecting an inverted range
pub fn clamp(value: i32, min: i32, max: i32) -> Result<i32, NumericError> {
    if min > max {
        return Err(NumericError::InvertedRange { min, max });
    }
    Ok(value.max(min).min(max))
}

/// Clamp a hit-point value into `[0, max_hp]`; a negative max is treated as 0
pub fn clamp_hp(value: i32, max_hp: i32) -> i32 {
    value.max(0).min(max_hp.max(0))
}

/// Clamp an attack's maximum charges into `[1, MAX_ATTACK_CHARGES]`
pub fn clamp_max_charges(value: i32) -> i32 {
    value.max(1).min(MAX_ATTACK_CHARGES)
}

/// Clamp remaining charges into `[0, max_charges]`
pub fn clamp_charges(value: i32, max_charges: i32) -> i32 {
    value.max(0).min(max_charges.max(0))
}

pub fn ensure_non_negative(value: i32) -> i32 {
    value.max(0)
}

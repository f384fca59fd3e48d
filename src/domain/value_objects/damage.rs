//! Damage modifier tiers

use serde::{Deserialize, Serialize};

/// Multiplier tier applied to a base damage figure before manual adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageModifier {
    #[default]
    Full,
    Half,
    Quarter,
    Double,
    None,
}

impl DamageModifier {
    /// Apply the tier to a base amount; halves and quarters round down
    pub fn apply(&self, amount: i32) -> i32 {
        match self {
            Self::Full => amount,
            Self::Half => amount.div_euclid(2),
            Self::Quarter => amount.div_euclid(4),
            Self::Double => amount.saturating_mul(2),
            Self::None => 0,
        }
    }

    /// Step the tier down once for a successful half-on-save saving throw
    pub fn halved_by_save(&self) -> Self {
        match self {
            Self::Full => Self::Half,
            Self::Half => Self::Quarter,
            Self::Double => Self::Full,
            Self::Quarter => Self::Quarter,
            Self::None => Self::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Double => "double",
            Self::None => "no",
        }
    }
}

impl std::fmt::Display for DamageModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} damage", self.label())
    }
}

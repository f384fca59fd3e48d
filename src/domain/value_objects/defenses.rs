//! Damage-type defenses: resistances, vulnerabilities and immunities
//!
//! A damage type appears in at most one of the three sets. Toggling a type
//! into one category strips it from the other two.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DamageModifier;

/// The three defense categories an entity can hold a damage type in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefenseCategory {
    Resistances,
    Vulnerabilities,
    Immunities,
}

impl DefenseCategory {
    pub const ALL: [DefenseCategory; 3] = [
        DefenseCategory::Resistances,
        DefenseCategory::Vulnerabilities,
        DefenseCategory::Immunities,
    ];
}

/// Resistance / vulnerability / immunity sets over damage-type tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defenses {
    #[serde(default)]
    pub resistances: BTreeSet<String>,
    #[serde(default)]
    pub vulnerabilities: BTreeSet<String>,
    #[serde(default)]
    pub immunities: BTreeSet<String>,
}

/// Partially-specified defenses, as they arrive from forms or old snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDefenses {
    pub resistances: Option<BTreeSet<String>>,
    pub vulnerabilities: Option<BTreeSet<String>>,
    pub immunities: Option<BTreeSet<String>>,
}

impl Defenses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: DefenseCategory, damage_type: impl Into<String>) -> Self {
        let damage_type = damage_type.into();
        if !self.set(category).contains(&damage_type) {
            self = toggle_exclusive_defense(&self, category, &damage_type);
        }
        self
    }

    pub fn set(&self, category: DefenseCategory) -> &BTreeSet<String> {
        match category {
            DefenseCategory::Resistances => &self.resistances,
            DefenseCategory::Vulnerabilities => &self.vulnerabilities,
            DefenseCategory::Immunities => &self.immunities,
        }
    }

    fn set_mut(&mut self, category: DefenseCategory) -> &mut BTreeSet<String> {
        match category {
            DefenseCategory::Resistances => &mut self.resistances,
            DefenseCategory::Vulnerabilities => &mut self.vulnerabilities,
            DefenseCategory::Immunities => &mut self.immunities,
        }
    }

    /// Which category, if any, holds `damage_type`
    pub fn category_of(&self, damage_type: &str) -> Option<DefenseCategory> {
        DefenseCategory::ALL
            .into_iter()
            .find(|category| self.set(*category).contains(damage_type))
    }

    /// Keep each damage type only in its highest-precedence set
    ///
    /// Immunities outrank vulnerabilities, which outrank resistances, the
    /// same order `default_modifier` reads them in.
    pub fn exclusive(mut self) -> Self {
        let immunities = self.immunities.clone();
        self.vulnerabilities.retain(|t| !immunities.contains(t));
        let vulnerabilities = self.vulnerabilities.clone();
        self.resistances
            .retain(|t| !immunities.contains(t) && !vulnerabilities.contains(t));
        self
    }

    /// Default damage modifier this entity takes from `damage_type`
    pub fn default_modifier(&self, damage_type: Option<&str>) -> DamageModifier {
        let Some(damage_type) = damage_type else {
            return DamageModifier::Full;
        };
        if self.immunities.contains(damage_type) {
            DamageModifier::None
        } else if self.vulnerabilities.contains(damage_type) {
            DamageModifier::Double
        } else if self.resistances.contains(damage_type) {
            DamageModifier::Half
        } else {
            DamageModifier::Full
        }
    }
}

impl From<PartialDefenses> for Defenses {
    fn from(partial: PartialDefenses) -> Self {
        normalize_defenses(&partial)
    }
}

/// Fill any missing set with an empty set and make the sets exclusive
pub fn normalize_defenses(partial: &PartialDefenses) -> Defenses {
    Defenses {
        resistances: partial.resistances.clone().unwrap_or_default(),
        vulnerabilities: partial.vulnerabilities.clone().unwrap_or_default(),
        immunities: partial.immunities.clone().unwrap_or_default(),
    }
    .exclusive()
}

/// Toggle `damage_type` in `category`, removing it from the other two when added
pub fn toggle_exclusive_defense(
    defenses: &Defenses,
    category: DefenseCategory,
    damage_type: &str,
) -> Defenses {
    let mut next = defenses.clone();
    if next.set(category).contains(damage_type) {
        next.set_mut(category).remove(damage_type);
        return next;
    }
    for other in DefenseCategory::ALL.into_iter().filter(|c| *c != category) {
        next.set_mut(other).remove(damage_type);
    }
    next.set_mut(category).insert(damage_type.to_string());
    next
}

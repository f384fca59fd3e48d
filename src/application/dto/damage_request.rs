//! Damage request DTOs - what the caller gathers before an "Apply"

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{EntityRef, HitStatus};
use crate::domain::value_objects::{Ability, DamageModifier};

/// One typed slice of a (possibly multi-element) damage roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageComponent {
    pub amount: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
}

impl DamageComponent {
    pub fn untyped(amount: i32) -> Self {
        Self {
            amount,
            damage_type: None,
        }
    }

    pub fn typed(amount: i32, damage_type: impl Into<String>) -> Self {
        Self {
            amount,
            damage_type: Some(damage_type.into()),
        }
    }
}

/// Saving throw every target makes against the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCheck {
    pub ability: Ability,
    pub dc: i32,
    pub half_on_save: bool,
}

/// Manual tweaks for one component of one target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOverride {
    /// Replaces the defense/save-derived tier
    #[serde(default)]
    pub modifier: Option<DamageModifier>,
    /// Added after the tier is applied; the result is floored at 0
    #[serde(default)]
    pub adjustment: i32,
}

/// Per-target manual input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOverride {
    /// A d20 result entered at the table instead of rolling
    #[serde(default)]
    pub roll: Option<i32>,
    /// Indexed like `AoeDamageRequest::components`; missing entries mean no override
    #[serde(default)]
    pub components: Vec<ComponentOverride>,
}

impl TargetOverride {
    pub fn with_roll(mut self, roll: i32) -> Self {
        self.roll = Some(roll);
        self
    }

    pub fn with_component(mut self, index: usize, component: ComponentOverride) -> Self {
        if self.components.len() <= index {
            self.components.resize(index + 1, ComponentOverride::default());
        }
        self.components[index] = component;
        self
    }

    pub fn component(&self, index: usize) -> ComponentOverride {
        self.components.get(index).copied().unwrap_or_default()
    }
}

/// An area-of-effect damage request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AoeDamageRequest {
    /// Name of the effect, used in the summary log line
    pub label: Option<String>,
    pub components: Vec<DamageComponent>,
    pub save: Option<SaveCheck>,
    /// Target the whole roster instead of the entities flagged in-AoE
    pub apply_to_all: bool,
    pub overrides: HashMap<EntityRef, TargetOverride>,
}

impl AoeDamageRequest {
    pub fn new(components: Vec<DamageComponent>) -> Self {
        Self {
            components,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_save(mut self, ability: Ability, dc: i32, half_on_save: bool) -> Self {
        self.save = Some(SaveCheck {
            ability,
            dc,
            half_on_save,
        });
        self
    }

    pub fn apply_to_all(mut self) -> Self {
        self.apply_to_all = true;
        self
    }

    pub fn with_override(mut self, entity: EntityRef, target_override: TargetOverride) -> Self {
        self.overrides.insert(entity, target_override);
        self
    }
}

/// A single attack against one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleTargetDamage {
    pub target: EntityRef,
    pub amount: i32,
    pub hit_status: HitStatus,
    pub modifier: Option<DamageModifier>,
    /// For groups: which creature takes the hit
    pub creature_index: Option<usize>,
}

impl SingleTargetDamage {
    pub fn hit(target: EntityRef, amount: i32) -> Self {
        Self {
            target,
            amount,
            hit_status: HitStatus::Hit,
            modifier: None,
            creature_index: None,
        }
    }

    pub fn with_status(mut self, hit_status: HitStatus) -> Self {
        self.hit_status = hit_status;
        self
    }

    pub fn with_modifier(mut self, modifier: DamageModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn on_creature(mut self, index: usize) -> Self {
        self.creature_index = Some(index);
        self
    }
}

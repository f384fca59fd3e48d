//! Shared view over the three combatant shapes

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Ability, BossId, CharacterId, Defenses, GroupId};

/// Reference to one combatant on the roster
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum EntityRef {
    Character(CharacterId),
    Boss(BossId),
    Group(GroupId),
}

impl EntityRef {
    pub fn id_str(&self) -> &str {
        match self {
            Self::Character(id) => id.as_str(),
            Self::Boss(id) => id.as_str(),
            Self::Group(id) => id.as_str(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Character(_) => "character",
            Self::Boss(_) => "boss",
            Self::Group(_) => "group",
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_str())
    }
}

/// Accessors every roster entry provides, whatever its cardinality
pub trait Combatant {
    fn entity_ref(&self) -> EntityRef;
    fn name(&self) -> &str;
    fn initiative(&self) -> i32;
    fn in_aoe(&self) -> bool;
    fn set_in_aoe(&mut self, in_aoe: bool);
    fn defenses(&self) -> &Defenses;
    fn defenses_mut(&mut self) -> &mut Defenses;

    /// Bonus added to a d20 for a saving throw of `ability`
    fn save_bonus(&self, ability: Ability) -> i32;
}

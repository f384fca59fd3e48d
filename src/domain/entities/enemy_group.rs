//! Enemy group entity - N nominally identical creatures sharing one card
//!
//! `current_hp` is a representative per-creature value. Once any creature
//! has been damaged or healed individually the `creatures` array is
//! materialised and becomes the authoritative record; `count` and
//! `current_hp` are then re-derived from it.

use serde::{Deserialize, Serialize};

use super::{Combatant, EntityRef};
use crate::domain::services::numeric::{clamp_hp, ensure_non_negative};
use crate::domain::value_objects::{Ability, Defenses, GroupId, SavingThrows, TemplateId};

/// Hit points of one creature inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureHp {
    pub current_hp: i32,
    pub max_hp: i32,
}

impl CreatureHp {
    pub fn new(current_hp: i32, max_hp: i32) -> Self {
        Self {
            current_hp: clamp_hp(current_hp, max_hp),
            max_hp,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_full(&self) -> bool {
        self.current_hp >= self.max_hp
    }
}

/// A group of identical enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyGroup {
    pub id: GroupId,
    pub name: String,
    /// Creatures currently alive
    pub count: i32,
    pub original_count: i32,
    /// Per-creature maximum
    pub max_hp: i32,
    /// Representative per-creature current HP
    pub current_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    #[serde(default)]
    pub ac: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub in_aoe: bool,
    #[serde(default)]
    pub defenses: Defenses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creatures: Option<Vec<CreatureHp>>,
}

impl EnemyGroup {
    pub fn new(name: impl Into<String>, count: i32, max_hp: i32) -> Self {
        let count = ensure_non_negative(count);
        let max_hp = ensure_non_negative(max_hp);
        Self {
            id: GroupId::new(),
            name: name.into(),
            count,
            original_count: count,
            max_hp,
            current_hp: max_hp,
            temp_hp: 0,
            ac: 10,
            initiative: 0,
            in_aoe: false,
            defenses: Defenses::default(),
            saving_throws: Some(SavingThrows::default()),
            creatures: None,
        }
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_saving_throws(mut self, saving_throws: SavingThrows) -> Self {
        self.saving_throws = Some(saving_throws);
        self
    }

    pub fn with_defenses(mut self, defenses: Defenses) -> Self {
        self.defenses = defenses;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.count == 0
    }

    /// Materialise per-creature tracking if it does not exist yet
    ///
    /// Survivors start at the representative `current_hp`, the fallen at 0.
    pub fn ensure_creatures(&mut self) -> &mut Vec<CreatureHp> {
        let max_hp = self.max_hp;
        let alive = self.count.clamp(0, self.original_count.max(0)) as usize;
        let fallen = (self.original_count.max(0) as usize).saturating_sub(alive);
        let representative = self.current_hp;
        self.creatures.get_or_insert_with(|| {
            let mut creatures = vec![CreatureHp::new(representative, max_hp); alive];
            creatures.extend(std::iter::repeat(CreatureHp::new(0, max_hp)).take(fallen));
            creatures
        })
    }

    /// Re-derive `count` and the representative `current_hp` from the detail array
    pub fn refresh_from_creatures(&mut self) {
        let Some(creatures) = self.creatures.as_ref() else {
            return;
        };
        let alive = creatures.iter().filter(|c| c.is_alive()).count() as i32;
        let total: i64 = creatures.iter().map(|c| c.current_hp as i64).sum();
        let mean = if creatures.is_empty() {
            0
        } else {
            total.div_euclid(creatures.len() as i64) as i32
        };
        self.count = alive.min(self.original_count);
        self.current_hp = clamp_hp(mean, self.max_hp);
    }
}

impl Combatant for EnemyGroup {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::Group(self.id.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn initiative(&self) -> i32 {
        self.initiative
    }

    fn in_aoe(&self) -> bool {
        self.in_aoe
    }

    fn set_in_aoe(&mut self, in_aoe: bool) {
        self.in_aoe = in_aoe;
    }

    fn defenses(&self) -> &Defenses {
        &self.defenses
    }

    fn defenses_mut(&mut self) -> &mut Defenses {
        &mut self.defenses
    }

    fn save_bonus(&self, ability: Ability) -> i32 {
        self.saving_throws.map(|s| s.get(ability)).unwrap_or(0)
    }
}

/// Reusable stat block for spawning enemy groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyGroupTemplate {
    pub id: TemplateId,
    pub name: String,
    pub count: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub ac: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub defenses: Defenses,
    #[serde(default)]
    pub saving_throws: SavingThrows,
}

impl EnemyGroupTemplate {
    pub fn new(name: impl Into<String>, count: i32, max_hp: i32) -> Self {
        Self {
            id: TemplateId::new(),
            name: name.into(),
            count,
            max_hp,
            ac: 10,
            initiative: 0,
            defenses: Defenses::default(),
            saving_throws: SavingThrows::default(),
        }
    }

    /// Build the `ordinal`-th group spawned from this template
    pub fn spawn(&self, ordinal: usize) -> EnemyGroup {
        EnemyGroup::new(format!("{} {}", self.name, ordinal), self.count, self.max_hp)
            .with_ac(self.ac)
            .with_initiative(self.initiative)
            .with_defenses(self.defenses.clone())
            .with_saving_throws(self.saving_throws)
    }
}

//! Character entity - player characters and solo allies tracked at the table

use serde::{Deserialize, Serialize};

use super::{Combatant, EntityRef};
use crate::domain::services::numeric::{clamp_hp, ensure_non_negative};
use crate::domain::value_objects::{Ability, CharacterId, Defenses, SavingThrows};

/// A solo character on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub max_hp: i32,
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
    /// Recorded for reference; characters roll AoE saves without a bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
}

impl Character {
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        let max_hp = ensure_non_negative(max_hp);
        Self {
            id: CharacterId::new(),
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            temp_hp: 0,
            ac: 10,
            initiative: 0,
            in_aoe: false,
            defenses: Defenses::default(),
            saving_throws: None,
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

    pub fn with_current_hp(mut self, current_hp: i32) -> Self {
        self.current_hp = clamp_hp(current_hp, self.max_hp);
        self
    }

    pub fn with_temp_hp(mut self, temp_hp: i32) -> Self {
        self.temp_hp = ensure_non_negative(temp_hp);
        self
    }

    pub fn with_defenses(mut self, defenses: Defenses) -> Self {
        self.defenses = defenses;
        self
    }

    pub fn is_down(&self) -> bool {
        self.current_hp == 0
    }
}

impl Combatant for Character {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::Character(self.id.clone())
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

    fn save_bonus(&self, _ability: Ability) -> i32 {
        0
    }
}

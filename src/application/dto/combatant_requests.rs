//! Roster editing DTOs

use crate::domain::value_objects::{Defenses, SavingThrows};

/// Fields shared by every add-combatant request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCombatantRequest {
    pub name: String,
    pub max_hp: i32,
    /// Defaults to `max_hp`
    pub current_hp: Option<i32>,
    pub ac: i32,
    pub initiative: i32,
    pub defenses: Defenses,
    pub saving_throws: Option<SavingThrows>,
}

impl CreateCombatantRequest {
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            ac: 10,
            ..Self::default()
        }
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    pub fn with_saving_throws(mut self, saving_throws: SavingThrows) -> Self {
        self.saving_throws = Some(saving_throws);
        self
    }
}

/// Request to update an existing combatant; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCombatantRequest {
    pub name: Option<String>,
    pub max_hp: Option<i32>,
    pub current_hp: Option<i32>,
    pub ac: Option<i32>,
    pub initiative: Option<i32>,
}

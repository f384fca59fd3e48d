//! Ability saving-throw modifiers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The six abilities a saving throw can be made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Fixed map of ability to saving-throw modifier; missing keys read as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingThrows {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl SavingThrows {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn set(&mut self, ability: Ability, modifier: i32) {
        match ability {
            Ability::Str => self.str = modifier,
            Ability::Dex => self.dex = modifier,
            Ability::Con => self.con = modifier,
            Ability::Int => self.int = modifier,
            Ability::Wis => self.wis = modifier,
            Ability::Cha => self.cha = modifier,
        }
    }

    pub fn with(mut self, ability: Ability, modifier: i32) -> Self {
        self.set(ability, modifier);
        self
    }
}

/// Fill missing ability keys with 0
pub fn normalize_saving_throws(partial: &HashMap<Ability, i32>) -> SavingThrows {
    Ability::ALL
        .into_iter()
        .fold(SavingThrows::default(), |saves, ability| {
            saves.with(ability, partial.get(&ability).copied().unwrap_or(0))
        })
}

impl From<&SavingThrows> for HashMap<Ability, i32> {
    fn from(saves: &SavingThrows) -> Self {
        Ability::ALL
            .into_iter()
            .map(|ability| (ability, saves.get(ability)))
            .collect()
    }
}

//! Boss entity - solo monsters with saving throws and a charge-limited attack list

use serde::{Deserialize, Serialize};

use super::{Combatant, EntityRef};
use crate::domain::services::numeric::{clamp_charges, clamp_hp, clamp_max_charges, ensure_non_negative};
use crate::domain::value_objects::{Ability, AttackId, BossId, Defenses, SavingThrows};

/// A solo boss on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub id: BossId,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
    #[serde(default)]
    pub attacks: Vec<BossAttack>,
}

impl Boss {
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        let max_hp = ensure_non_negative(max_hp);
        Self {
            id: BossId::new(),
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            temp_hp: 0,
            ac: 10,
            initiative: 0,
            in_aoe: false,
            defenses: Defenses::default(),
            saving_throws: Some(SavingThrows::default()),
            attacks: Vec::new(),
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

    pub fn with_saving_throws(mut self, saving_throws: SavingThrows) -> Self {
        self.saving_throws = Some(saving_throws);
        self
    }

    pub fn with_defenses(mut self, defenses: Defenses) -> Self {
        self.defenses = defenses;
        self
    }

    pub fn with_attack(mut self, attack: BossAttack) -> Self {
        self.attacks.push(attack.normalized());
        self
    }

    pub fn find_attack_mut(&mut self, attack_id: &AttackId) -> Option<&mut BossAttack> {
        self.attacks.iter_mut().find(|a| &a.id == attack_id)
    }

    /// Attacks that have not been retired
    pub fn active_attacks(&self) -> impl Iterator<Item = &BossAttack> {
        self.attacks.iter().filter(|a| !a.is_removed)
    }
}

impl Combatant for Boss {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::Boss(self.id.clone())
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

/// A named boss attack, optionally limited by charges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossAttack {
    pub id: AttackId,
    pub name: String,
    #[serde(default)]
    pub uses_charges: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_charges: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges_remaining: Option<i32>,
    /// Retired attacks stay in the list so the log keeps making sense
    #[serde(default)]
    pub is_removed: bool,
}

impl BossAttack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AttackId::new(),
            name: name.into(),
            uses_charges: false,
            max_charges: None,
            charges_remaining: None,
            is_removed: false,
        }
    }

    pub fn with_charges(mut self, max_charges: i32) -> Self {
        self.uses_charges = true;
        self.max_charges = Some(max_charges);
        self.charges_remaining = None;
        self.normalized()
    }

    /// Non-charge attacks drop stray charge fields; charge attacks get
    /// `max_charges` in `[1, 5]` and `charges_remaining` in `[0, max_charges]`
    pub fn normalized(&self) -> Self {
        if !self.uses_charges {
            return Self {
                id: self.id.clone(),
                name: self.name.clone(),
                uses_charges: false,
                max_charges: None,
                charges_remaining: None,
                is_removed: self.is_removed,
            };
        }

        let max_charges = clamp_max_charges(self.max_charges.unwrap_or(1));
        let charges_remaining = clamp_charges(self.charges_remaining.unwrap_or(max_charges), max_charges);
        Self {
            max_charges: Some(max_charges),
            charges_remaining: Some(charges_remaining),
            ..self.clone()
        }
    }

    /// Whether the attack can be used right now
    pub fn is_available(&self) -> bool {
        !self.is_removed && (!self.uses_charges || self.charges_remaining.unwrap_or(0) > 0)
    }

    /// Spend one charge; false when the attack is retired or out of charges
    pub fn use_charge(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        if let Some(remaining) = self.charges_remaining.as_mut() {
            *remaining -= 1;
        }
        true
    }

    pub fn restore_charges(&mut self) {
        if self.uses_charges {
            self.charges_remaining = self.max_charges;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_save_bonus_reads_saving_throws() {
        let boss = Boss::new("Lich", 135)
            .with_saving_throws(SavingThrows::default().with(Ability::Con, 10));
        assert_eq!(boss.save_bonus(Ability::Con), 10);
        assert_eq!(boss.save_bonus(Ability::Str), 0);

        let mut bare = Boss::new("Ogre", 59);
        bare.saving_throws = None;
        assert_eq!(bare.save_bonus(Ability::Dex), 0);
    }

    #[test]
    fn test_charge_attack_usage() {
        let mut attack = BossAttack::new("Breath Weapon").with_charges(2);
        assert_eq!(attack.charges_remaining, Some(2));
        assert!(attack.use_charge());
        assert!(attack.use_charge());
        assert!(!attack.use_charge());
        assert_eq!(attack.charges_remaining, Some(0));

        attack.restore_charges();
        assert_eq!(attack.charges_remaining, Some(2));
    }

    #[test]
    fn test_retired_attack_unavailable() {
        let mut attack = BossAttack::new("Bite");
        assert!(attack.use_charge());
        attack.is_removed = true;
        assert!(!attack.use_charge());
    }

    #[test]
    fn test_active_attacks_skip_retired() {
        let mut boss = Boss::new("Dragon", 200)
            .with_attack(BossAttack::new("Claw"))
            .with_attack(BossAttack::new("Tail"));
        boss.attacks[1].is_removed = true;
        let names: Vec<&str> = boss.active_attacks().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Claw"]);
    }
}

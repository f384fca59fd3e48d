//! Healing Service - single and batched healing
//!
//! Solo combatants heal through the HP core, capped at max HP. Groups spread
//! the pool over their living creatures. Healing a target that has since
//! been removed is a silent no-op.

use tracing::{debug, info, instrument};

use crate::application::services::combat_log_service::{
    create_healing_result, new_healing_transaction_id,
};
use crate::domain::aggregates::EncounterAggregate;
use crate::domain::entities::{CombatLogEntry, EntityRef};
use crate::domain::services::{apply_healing, heal_group};

#[derive(Debug, Clone, Copy, Default)]
pub struct HealingService;

impl HealingService {
    pub fn new() -> Self {
        Self
    }

    /// Heal one combatant and log it
    ///
    /// Returns `None` when the amount is not positive or the target is gone.
    #[instrument(skip(self, encounter))]
    pub fn heal(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        amount: i32,
    ) -> Option<CombatLogEntry> {
        let entry = self.heal_one(encounter, entity, amount, None)?;
        encounter.push_log(entry.clone());
        Some(entry)
    }

    /// Heal several combatants by the same amount as one logged action
    ///
    /// With more than one target the entries share a `healing-<timestamp>`
    /// transaction so the log view can merge them.
    #[instrument(skip(self, encounter, targets), fields(targets = targets.len()))]
    pub fn heal_many(
        &self,
        encounter: &mut EncounterAggregate,
        targets: &[EntityRef],
        amount: i32,
    ) -> Vec<CombatLogEntry> {
        let transaction_id = (targets.len() > 1).then(new_healing_transaction_id);
        let entries: Vec<CombatLogEntry> = targets
            .iter()
            .filter_map(|entity| self.heal_one(encounter, entity, amount, transaction_id.as_deref()))
            .collect();

        encounter.extend_log(entries.iter().cloned());
        info!(
            healed = entries.len(),
            transaction_id = ?transaction_id,
            "Applied batched healing"
        );
        entries
    }

    fn heal_one(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        amount: i32,
        transaction_id: Option<&str>,
    ) -> Option<CombatLogEntry> {
        if amount <= 0 {
            debug!(entity_id = %entity, amount, "Ignoring non-positive healing");
            return None;
        }

        let (name, restored) = match entity {
            EntityRef::Character(id) => {
                let character = encounter.find_character_mut(id)?;
                let before = character.current_hp;
                character.current_hp = apply_healing(amount, character.current_hp, character.max_hp);
                (character.name.clone(), character.current_hp - before)
            }
            EntityRef::Boss(id) => {
                let boss = encounter.find_boss_mut(id)?;
                let before = boss.current_hp;
                boss.current_hp = apply_healing(amount, boss.current_hp, boss.max_hp);
                (boss.name.clone(), boss.current_hp - before)
            }
            EntityRef::Group(id) => {
                let group = encounter.find_group_mut(id)?;
                let restored = heal_group(group, amount);
                (group.name.clone(), restored)
            }
        };

        debug!(entity_id = %entity, amount, restored, "Healed combatant");
        Some(create_healing_result(restored, &name, entity.clone(), transaction_id))
    }
}

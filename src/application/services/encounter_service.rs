//! Encounter Service - roster editing and single-target combat actions
//!
//! Lookups of entities that are no longer on the roster are silent no-ops:
//! the operation returns `None`/`false` and nothing is logged.

use tracing::{debug, info, instrument, warn};

use crate::application::dto::{CreateCombatantRequest, SingleTargetDamage, UpdateCombatantRequest};
use crate::application::services::combat_log_service::create_damage_result;
use crate::domain::aggregates::{AggregateError, EncounterAggregate};
use crate::domain::entities::{
    Boss, BossAttack, Character, CombatLogEntry, Combatant, EnemyGroup, EnemyGroupTemplate,
    EntityRef, HitStatus,
};
use crate::domain::services::{
    apply_damage_with_temp_hp, clamp_hp, damage_group_creature, ensure_non_negative, set_temp_hp,
};
use crate::domain::value_objects::{
    toggle_exclusive_defense, Ability, AttackId, BossId, DamageModifier, DefenseCategory, Defenses,
    TemplateId,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterService;

impl EncounterService {
    pub fn new() -> Self {
        Self
    }

    // ========================================================================
    // Roster
    // ========================================================================

    #[instrument(skip(self, encounter, request), fields(name = %request.name))]
    pub fn add_character(
        &self,
        encounter: &mut EncounterAggregate,
        request: CreateCombatantRequest,
    ) -> Result<EntityRef, AggregateError> {
        let mut character = Character::new(request.name, request.max_hp)
            .with_ac(request.ac)
            .with_initiative(request.initiative)
            .with_defenses(request.defenses);
        if let Some(current_hp) = request.current_hp {
            character = character.with_current_hp(current_hp);
        }
        character.saving_throws = request.saving_throws;

        let entity = encounter.add_character(character)?;
        info!(entity_id = %entity, "Added character");
        Ok(entity)
    }

    #[instrument(skip(self, encounter, request), fields(name = %request.name))]
    pub fn add_boss(
        &self,
        encounter: &mut EncounterAggregate,
        request: CreateCombatantRequest,
    ) -> Result<EntityRef, AggregateError> {
        let mut boss = Boss::new(request.name, request.max_hp)
            .with_ac(request.ac)
            .with_initiative(request.initiative)
            .with_defenses(request.defenses)
            .with_saving_throws(request.saving_throws.unwrap_or_default());
        if let Some(current_hp) = request.current_hp {
            boss = boss.with_current_hp(current_hp);
        }

        let entity = encounter.add_boss(boss)?;
        info!(entity_id = %entity, "Added boss");
        Ok(entity)
    }

    /// Add `count` identical creatures as one group card
    #[instrument(skip(self, encounter, request), fields(name = %request.name))]
    pub fn add_enemy_group(
        &self,
        encounter: &mut EncounterAggregate,
        request: CreateCombatantRequest,
        count: i32,
    ) -> Result<EntityRef, AggregateError> {
        let mut group = EnemyGroup::new(request.name, count, request.max_hp)
            .with_ac(request.ac)
            .with_initiative(request.initiative)
            .with_defenses(request.defenses)
            .with_saving_throws(request.saving_throws.unwrap_or_default());
        if let Some(current_hp) = request.current_hp {
            group.current_hp = current_hp;
        }

        let entity = encounter.add_enemy_group(group)?;
        info!(entity_id = %entity, count, "Added enemy group");
        Ok(entity)
    }

    /// Apply the set fields of `request`; HP is re-clamped against the new maximum
    #[instrument(skip(self, encounter, request))]
    pub fn update(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        request: &UpdateCombatantRequest,
    ) -> bool {
        if request.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            warn!(entity_id = %entity, "Ignoring update with an empty name");
            return false;
        }

        let updated = match entity {
            EntityRef::Character(id) => encounter.find_character_mut(id).map(|c| {
                apply_solo_update(request, &mut c.name, &mut c.max_hp, &mut c.current_hp, &mut c.ac, &mut c.initiative)
            }),
            EntityRef::Boss(id) => encounter.find_boss_mut(id).map(|b| {
                apply_solo_update(request, &mut b.name, &mut b.max_hp, &mut b.current_hp, &mut b.ac, &mut b.initiative)
            }),
            EntityRef::Group(id) => encounter.find_group_mut(id).map(|g| update_group(g, request)),
        };

        match updated {
            Some(()) => {
                debug!(entity_id = %entity, "Updated combatant");
                true
            }
            None => false,
        }
    }

    #[instrument(skip(self, encounter))]
    pub fn remove(&self, encounter: &mut EncounterAggregate, entity: &EntityRef) -> bool {
        let removed = encounter.remove(entity).is_some();
        if removed {
            info!(entity_id = %entity, "Removed combatant");
        }
        removed
    }

    // ========================================================================
    // Targeting, defenses and saves
    // ========================================================================

    /// Flip one combatant's AoE flag; returns the new value
    pub fn toggle_in_aoe(&self, encounter: &mut EncounterAggregate, entity: &EntityRef) -> Option<bool> {
        let combatant = encounter.combatant_mut(entity)?;
        let in_aoe = !combatant.in_aoe();
        combatant.set_in_aoe(in_aoe);
        Some(in_aoe)
    }

    pub fn set_all_in_aoe(&self, encounter: &mut EncounterAggregate, in_aoe: bool) {
        for combatant in encounter.combatants_mut() {
            combatant.set_in_aoe(in_aoe);
        }
        debug!(in_aoe, "Set AoE flag on every combatant");
    }

    /// Toggle a damage type in one defense category, keeping categories exclusive
    pub fn toggle_defense(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        category: DefenseCategory,
        damage_type: &str,
    ) -> Option<Defenses> {
        let combatant = encounter.combatant_mut(entity)?;
        let next = toggle_exclusive_defense(combatant.defenses(), category, damage_type);
        *combatant.defenses_mut() = next.clone();
        debug!(entity_id = %entity, ?category, damage_type, "Toggled defense");
        Some(next)
    }

    /// Set a boss or group saving-throw modifier
    ///
    /// Characters carry no save bonuses, so they are left untouched.
    pub fn set_saving_throw(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        ability: Ability,
        modifier: i32,
    ) -> bool {
        let saving_throws = match entity {
            EntityRef::Character(_) => return false,
            EntityRef::Boss(id) => encounter.find_boss_mut(id).map(|b| &mut b.saving_throws),
            EntityRef::Group(id) => encounter.find_group_mut(id).map(|g| &mut g.saving_throws),
        };
        match saving_throws {
            Some(saving_throws) => {
                saving_throws.get_or_insert_with(Default::default).set(ability, modifier);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Hit points
    // ========================================================================

    /// Replace or stack temp HP; returns the resulting pool
    pub fn set_temp_hp(
        &self,
        encounter: &mut EncounterAggregate,
        entity: &EntityRef,
        amount: i32,
        replace: bool,
    ) -> Option<i32> {
        let temp_hp = match entity {
            EntityRef::Character(id) => &mut encounter.find_character_mut(id)?.temp_hp,
            EntityRef::Boss(id) => &mut encounter.find_boss_mut(id)?.temp_hp,
            EntityRef::Group(id) => &mut encounter.find_group_mut(id)?.temp_hp,
        };
        *temp_hp = set_temp_hp(amount, *temp_hp, replace);
        let result = *temp_hp;
        debug!(entity_id = %entity, temp_hp = result, replace, "Set temp HP");
        Some(result)
    }

    /// Resolve one attack against one target and log it
    ///
    /// A miss logs 0 damage and leaves the target untouched. Against a group
    /// the hit lands on a single creature.
    #[instrument(skip(self, encounter, request), fields(target = %request.target))]
    pub fn apply_damage(
        &self,
        encounter: &mut EncounterAggregate,
        request: &SingleTargetDamage,
    ) -> Option<CombatLogEntry> {
        let modifier = request.modifier.unwrap_or(DamageModifier::Full);
        let damage = modifier.apply(ensure_non_negative(request.amount));
        let hits = request.hit_status != HitStatus::Miss;

        let (name, note) = match &request.target {
            EntityRef::Character(id) => {
                let character = encounter.find_character_mut(id)?;
                if hits {
                    let applied = apply_damage_with_temp_hp(damage, character.current_hp, character.temp_hp);
                    character.current_hp = applied.new_current_hp;
                    character.temp_hp = applied.new_temp_hp;
                }
                (character.name.clone(), String::new())
            }
            EntityRef::Boss(id) => {
                let boss = encounter.find_boss_mut(id)?;
                if hits {
                    let applied = apply_damage_with_temp_hp(damage, boss.current_hp, boss.temp_hp);
                    boss.current_hp = applied.new_current_hp;
                    boss.temp_hp = applied.new_temp_hp;
                }
                (boss.name.clone(), String::new())
            }
            EntityRef::Group(id) => {
                let group = encounter.find_group_mut(id)?;
                let mut note = String::new();
                if hits {
                    let outcome = damage_group_creature(group, damage, request.creature_index);
                    if outcome.creatures_slain > 0 {
                        note = " [creature slain]".to_string();
                    }
                }
                (group.name.clone(), note)
            }
        };

        let modifier_text = match modifier {
            DamageModifier::Full => note,
            other => format!(" ({}){}", other, note),
        };
        let entry = create_damage_result(
            damage,
            &name,
            request.target.clone(),
            request.hit_status,
            Some(&modifier_text),
        );
        encounter.push_log(entry.clone());

        info!(damage = entry.damage().unwrap_or(0), hit_status = ?request.hit_status, "Applied damage");
        Some(entry)
    }

    // ========================================================================
    // Boss attacks
    // ========================================================================

    pub fn add_boss_attack(
        &self,
        encounter: &mut EncounterAggregate,
        boss_id: &BossId,
        attack: BossAttack,
    ) -> Option<AttackId> {
        let boss = encounter.find_boss_mut(boss_id)?;
        let attack = attack.normalized();
        let id = attack.id.clone();
        boss.attacks.push(attack);
        debug!(boss_id = %boss_id, attack_id = %id, "Added boss attack");
        Some(id)
    }

    /// Spend one charge; false when the attack is missing, retired or empty
    pub fn use_attack_charge(
        &self,
        encounter: &mut EncounterAggregate,
        boss_id: &BossId,
        attack_id: &AttackId,
    ) -> bool {
        let Some(attack) = encounter
            .find_boss_mut(boss_id)
            .and_then(|b| b.find_attack_mut(attack_id))
        else {
            return false;
        };
        let used = attack.use_charge();
        if !used {
            debug!(attack_id = %attack_id, "Attack has no charges left");
        }
        used
    }

    pub fn restore_attack_charges(
        &self,
        encounter: &mut EncounterAggregate,
        boss_id: &BossId,
        attack_id: &AttackId,
    ) -> bool {
        match encounter
            .find_boss_mut(boss_id)
            .and_then(|b| b.find_attack_mut(attack_id))
        {
            Some(attack) => {
                attack.restore_charges();
                true
            }
            None => false,
        }
    }

    /// Mark an attack as removed; it stays in the list
    pub fn retire_attack(
        &self,
        encounter: &mut EncounterAggregate,
        boss_id: &BossId,
        attack_id: &AttackId,
    ) -> bool {
        match encounter
            .find_boss_mut(boss_id)
            .and_then(|b| b.find_attack_mut(attack_id))
        {
            Some(attack) => {
                attack.is_removed = true;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    pub fn add_template(
        &self,
        encounter: &mut EncounterAggregate,
        template: EnemyGroupTemplate,
    ) -> Result<TemplateId, AggregateError> {
        encounter.add_template(template)
    }

    /// Spawn `copies` groups named `"<name> N"`, continuing any existing numbering
    #[instrument(skip(self, encounter))]
    pub fn spawn_from_template(
        &self,
        encounter: &mut EncounterAggregate,
        template_id: &TemplateId,
        copies: usize,
    ) -> Result<Vec<EntityRef>, AggregateError> {
        let Some(template) = encounter.find_template(template_id).cloned() else {
            return Ok(Vec::new());
        };

        let prefix = format!("{} ", template.name);
        let existing = encounter
            .enemy_groups()
            .iter()
            .filter_map(|g| g.name.strip_prefix(&prefix)?.parse::<usize>().ok())
            .max()
            .unwrap_or(0);

        let mut spawned = Vec::with_capacity(copies);
        for ordinal in existing + 1..=existing + copies {
            spawned.push(encounter.add_enemy_group(template.spawn(ordinal))?);
        }
        info!(template = %template.name, copies, "Spawned groups from template");
        Ok(spawned)
    }
}

fn apply_solo_update(
    request: &UpdateCombatantRequest,
    name: &mut String,
    max_hp: &mut i32,
    current_hp: &mut i32,
    ac: &mut i32,
    initiative: &mut i32,
) {
    if let Some(new_name) = &request.name {
        *name = new_name.clone();
    }
    if let Some(new_max) = request.max_hp {
        *max_hp = ensure_non_negative(new_max);
    }
    if let Some(new_current) = request.current_hp {
        *current_hp = new_current;
    }
    *current_hp = clamp_hp(*current_hp, *max_hp);
    if let Some(new_ac) = request.ac {
        *ac = new_ac;
    }
    if let Some(new_initiative) = request.initiative {
        *initiative = new_initiative;
    }
}

fn update_group(group: &mut EnemyGroup, request: &UpdateCombatantRequest) {
    if let Some(name) = &request.name {
        group.name = name.clone();
    }
    if let Some(max_hp) = request.max_hp {
        group.max_hp = ensure_non_negative(max_hp);
    }
    if let Some(ac) = request.ac {
        group.ac = ac;
    }
    if let Some(initiative) = request.initiative {
        group.initiative = initiative;
    }

    let max_hp = group.max_hp;
    let current_hp = clamp_hp(request.current_hp.unwrap_or(group.current_hp), max_hp);
    match group.creatures.as_mut() {
        Some(creatures) => {
            for creature in creatures.iter_mut() {
                creature.max_hp = max_hp;
                creature.current_hp = match request.current_hp {
                    Some(_) if creature.is_alive() => current_hp,
                    _ => clamp_hp(creature.current_hp, max_hp),
                };
            }
            group.refresh_from_creatures();
        }
        None => group.current_hp = current_hp,
    }
}

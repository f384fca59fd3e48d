//! AoE Service - resolves an area effect against every affected combatant
//!
//! Resolution is snapshot-consistent: each target's save, modifier tiers and
//! adjustments are computed from the pre-action encounter, and only once
//! every target has been resolved are any hit points written. A request that
//! names an unknown entity is rejected before anything changes.

use tracing::{debug, info, instrument};

use crate::application::dto::{AoeDamageRequest, TargetOverride};
use crate::application::ports::outbound::DiceRoller;
use crate::application::services::combat_log_service::{
    create_aoe_result_with_offset, create_damage_result_with_id,
};
use crate::domain::aggregates::EncounterAggregate;
use crate::domain::entities::{CombatLogEntry, Combatant, EntityRef, HitStatus};
use crate::domain::services::{
    apply_damage_with_temp_hp, check_save, damage_group_area, ensure_non_negative, roll_save,
    save_modifier, SaveResult,
};
use crate::domain::value_objects::{generate_id_with_offset, DamageModifier};

/// How one damage component landed on one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentResolution {
    pub base_amount: i32,
    pub damage_type: Option<String>,
    pub modifier: DamageModifier,
    pub adjustment: i32,
    pub final_amount: i32,
}

/// Everything decided about one target before HP is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResolution {
    pub entity: EntityRef,
    pub name: String,
    pub save: Option<SaveResult>,
    pub saved: bool,
    pub components: Vec<ComponentResolution>,
    pub total_damage: i32,
}

impl TargetResolution {
    /// Parenthesised detail appended to the per-target log message
    pub fn modifier_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(save) = &self.save {
            parts.push(format!(
                "save {} {}",
                save.total,
                if self.saved { "succeeded" } else { "failed" }
            ));
        }
        for component in &self.components {
            if component.modifier != DamageModifier::Full {
                match &component.damage_type {
                    Some(damage_type) => parts.push(format!("{}: {}", damage_type, component.modifier)),
                    None => parts.push(component.modifier.to_string()),
                }
            }
            if component.adjustment != 0 {
                parts.push(format!("{:+} adjustment", component.adjustment));
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

/// Result of committing an area effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AoeOutcome {
    pub resolutions: Vec<TargetResolution>,
    /// Per-target entries followed by the summary entry; already in the encounter log
    pub entries: Vec<CombatLogEntry>,
}

impl AoeOutcome {
    pub fn total_damage(&self) -> i32 {
        self.resolutions.iter().map(|r| r.total_damage).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AoeError {
    #[error("Target not found: {0}")]
    UnknownTarget(EntityRef),
}

/// Service for area-of-effect damage
#[derive(Debug, Clone, Copy, Default)]
pub struct AoeService;

impl AoeService {
    pub fn new() -> Self {
        Self
    }

    /// Entities the request would hit, in roster order
    pub fn affected_targets(&self, encounter: &EncounterAggregate, apply_to_all: bool) -> Vec<EntityRef> {
        encounter
            .combatants()
            .filter(|c| apply_to_all || c.in_aoe())
            .map(|c| c.entity_ref())
            .collect()
    }

    /// Resolve every target without touching the encounter
    ///
    /// Rolls taken here can be fed back through `TargetOverride::roll` so the
    /// committed result matches what was previewed.
    pub fn resolve(
        &self,
        encounter: &EncounterAggregate,
        request: &AoeDamageRequest,
        roller: &mut dyn DiceRoller,
    ) -> Result<Vec<TargetResolution>, AoeError> {
        if let Some(unknown) = request.overrides.keys().find(|e| !encounter.contains(e)) {
            return Err(AoeError::UnknownTarget(unknown.clone()));
        }

        let default_override = TargetOverride::default();
        self.affected_targets(encounter, request.apply_to_all)
            .iter()
            .map(|entity| {
                let combatant = encounter
                    .combatant(entity)
                    .ok_or_else(|| AoeError::UnknownTarget(entity.clone()))?;
                let target_override = request.overrides.get(entity).unwrap_or(&default_override);
                Ok(resolve_target(combatant, request, target_override, roller))
            })
            .collect()
    }

    /// Resolve and commit an area effect, appending its log entries
    #[instrument(skip(self, encounter, request, roller), fields(label = ?request.label))]
    pub fn apply(
        &self,
        encounter: &mut EncounterAggregate,
        request: &AoeDamageRequest,
        roller: &mut dyn DiceRoller,
    ) -> Result<AoeOutcome, AoeError> {
        let resolutions = self.resolve(encounter, request, roller)?;
        if resolutions.is_empty() {
            debug!("No targets flagged for area damage");
            return Ok(AoeOutcome {
                resolutions,
                entries: Vec::new(),
            });
        }

        let mut entries = Vec::with_capacity(resolutions.len() + 1);
        for (index, resolution) in resolutions.iter().enumerate() {
            let group_note = commit_damage(encounter, resolution);
            let modifier_text = format!("{}{}", resolution.modifier_text(), group_note);
            entries.push(create_damage_result_with_id(
                generate_id_with_offset(index as i64),
                resolution.total_damage,
                &resolution.name,
                resolution.entity.clone(),
                HitStatus::Hit,
                Some(&modifier_text),
            ));
        }

        let total_damage: i32 = resolutions.iter().map(|r| r.total_damage).sum();
        entries.push(create_aoe_result_with_offset(
            resolutions.len() as i64,
            total_damage,
            summary_message(request.label.as_deref(), &resolutions),
        ));
        encounter.extend_log(entries.iter().cloned());

        info!(
            targets = resolutions.len(),
            total_damage, "Applied area damage"
        );
        Ok(AoeOutcome {
            resolutions,
            entries,
        })
    }
}

fn resolve_target(
    combatant: &dyn Combatant,
    request: &AoeDamageRequest,
    target_override: &TargetOverride,
    roller: &mut dyn DiceRoller,
) -> TargetResolution {
    let save = request.save.map(|check| {
        let result = roll_save(combatant.save_bonus(check.ability), || {
            target_override.roll.unwrap_or_else(|| roller.roll_d20())
        });
        (result, check)
    });
    let saved = save.is_some_and(|(result, check)| check_save(&result, check.dc));
    let half_on_save = request.save.is_some_and(|check| check.half_on_save);

    let components: Vec<ComponentResolution> = request
        .components
        .iter()
        .enumerate()
        .map(|(index, component)| {
            let manual = target_override.component(index);
            let default_modifier = combatant
                .defenses()
                .default_modifier(component.damage_type.as_deref());
            let modifier = manual
                .modifier
                .unwrap_or_else(|| save_modifier(default_modifier, saved, half_on_save));
            let base_amount = ensure_non_negative(component.amount);
            ComponentResolution {
                base_amount,
                damage_type: component.damage_type.clone(),
                modifier,
                adjustment: manual.adjustment,
                final_amount: ensure_non_negative(modifier.apply(base_amount) + manual.adjustment),
            }
        })
        .collect();

    let total_damage = components.iter().map(|c| c.final_amount).sum();
    debug!(
        entity = %combatant.entity_ref(),
        saved,
        total_damage,
        "Resolved area damage target"
    );

    TargetResolution {
        entity: combatant.entity_ref(),
        name: combatant.name().to_string(),
        save: save.map(|(result, _)| result),
        saved,
        components,
        total_damage,
    }
}

/// Write one resolved target's damage; returns a note for group casualties
fn commit_damage(encounter: &mut EncounterAggregate, resolution: &TargetResolution) -> String {
    match &resolution.entity {
        EntityRef::Character(id) => {
            if let Some(character) = encounter.find_character_mut(id) {
                let applied = apply_damage_with_temp_hp(resolution.total_damage, character.current_hp, character.temp_hp);
                character.current_hp = applied.new_current_hp;
                character.temp_hp = applied.new_temp_hp;
            }
            String::new()
        }
        EntityRef::Boss(id) => {
            if let Some(boss) = encounter.find_boss_mut(id) {
                let applied = apply_damage_with_temp_hp(resolution.total_damage, boss.current_hp, boss.temp_hp);
                boss.current_hp = applied.new_current_hp;
                boss.temp_hp = applied.new_temp_hp;
            }
            String::new()
        }
        EntityRef::Group(id) => match encounter.find_group_mut(id) {
            Some(group) => {
                let outcome = damage_group_area(group, resolution.total_damage);
                if outcome.creatures_slain > 0 {
                    format!(
                        " [{} of {} creatures slain]",
                        outcome.creatures_slain, outcome.creatures_hit
                    )
                } else {
                    String::new()
                }
            }
            None => String::new(),
        },
    }
}

fn summary_message(label: Option<&str>, resolutions: &[TargetResolution]) -> String {
    let total: i32 = resolutions.iter().map(|r| r.total_damage).sum();
    let mut sections = vec![format!(
        "AoE {}! Total Damage: {}",
        label.unwrap_or("Attack"),
        total
    )];

    for (category, kind) in [("characters", "character"), ("bosses", "boss"), ("groups", "group")] {
        let items: Vec<String> = resolutions
            .iter()
            .filter(|r| r.entity.kind() == kind)
            .map(|r| {
                let saved = if r.saved { " (saved)" } else { "" };
                format!("{} Damage: {}{}", r.name, r.total_damage, saved)
            })
            .collect();
        if !items.is_empty() {
            sections.push(format!("to {} - {}", category, items.join("; ")));
        }
    }
    sections.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{ComponentOverride, DamageComponent};
    use crate::domain::entities::{Boss, Character, EnemyGroup, LogTarget};
    use crate::domain::services::{calculate_group_totals, calculate_save_damage};
    use crate::domain::value_objects::{Ability, DefenseCategory, Defenses, SavingThrows};

    struct FixedRoller(Vec<i32>);

    impl DiceRoller for FixedRoller {
        fn roll_d20(&mut self) -> i32 {
            if self.0.is_empty() {
                10
            } else {
                self.0.remove(0)
            }
        }
    }

    struct Setup {
        encounter: EncounterAggregate,
        aria: EntityRef,
        lich: EntityRef,
        goblins: EntityRef,
    }

    fn setup() -> Setup {
        let mut encounter = EncounterAggregate::default();
        let mut aria = Character::new("Aria", 40).with_temp_hp(5);
        aria.in_aoe = true;
        let mut lich = Boss::new("Lich", 100)
            .with_saving_throws(SavingThrows::default().with(Ability::Dex, 5))
            .with_defenses(Defenses::new().with(DefenseCategory::Resistances, "fire"));
        lich.in_aoe = true;
        let mut goblins = EnemyGroup::new("Goblin", 3, 12);
        goblins.in_aoe = true;

        let aria = encounter.add_character(aria).unwrap();
        let lich = encounter.add_boss(lich).unwrap();
        let goblins = encounter.add_enemy_group(goblins).unwrap();
        encounter.add_character(Character::new("Bystander", 20)).unwrap();

        Setup { encounter, aria, lich, goblins }
    }

    #[test]
    fn test_fireball_resolves_each_target_independently() {
        let Setup { mut encounter, aria, lich, goblins } = setup();
        let request = AoeDamageRequest::new(vec![DamageComponent::typed(24, "fire")])
            .with_label("Fireball")
            .with_save(Ability::Dex, 15, true);
        // Aria fails (8 + 0), the lich saves (11 + 5), goblins fail (3 + 0)
        let mut roller = FixedRoller(vec![8, 11, 3]);

        let outcome = AoeService::new().apply(&mut encounter, &request, &mut roller).unwrap();

        assert_eq!(outcome.resolutions.len(), 3);
        let by_entity = |e: &EntityRef| outcome.resolutions.iter().find(|r| &r.entity == e).unwrap();
        assert_eq!(by_entity(&aria).total_damage, 24);
        assert!(!by_entity(&aria).saved);
        // resistant + saved: half of half
        assert!(by_entity(&lich).saved);
        assert_eq!(by_entity(&lich).components[0].modifier, DamageModifier::Quarter);
        assert_eq!(by_entity(&lich).total_damage, 6);
        assert_eq!(by_entity(&goblins).total_damage, 24);

        let EntityRef::Character(aria_id) = &aria else { unreachable!() };
        let aria_after = encounter.find_character(aria_id).unwrap();
        assert_eq!(aria_after.temp_hp, 0);
        assert_eq!(aria_after.current_hp, 21);

        let EntityRef::Group(group_id) = &goblins else { unreachable!() };
        let group = encounter.find_group(group_id).unwrap();
        assert_eq!(group.count, 0);
        assert_eq!(calculate_group_totals(group).total_current_hp, 0);

        assert_eq!(outcome.entries.len(), 4);
        assert!(outcome.entries[3].is_aoe());
        assert_eq!(outcome.entries[3].damage(), Some(54));
        assert!(outcome.entries[3].message.starts_with("AoE Fireball! Total Damage: 54"));
        assert!(outcome.entries[2].message.contains("3 of 3 creatures slain"));
        assert_eq!(encounter.combat_log().len(), 4);
    }

    #[test]
    fn test_entry_ids_are_distinct_within_batch() {
        let Setup { mut encounter, .. } = setup();
        let request = AoeDamageRequest::new(vec![DamageComponent::untyped(5)]);
        let outcome = AoeService::new()
            .apply(&mut encounter, &request, &mut FixedRoller(vec![]))
            .unwrap();
        let mut ids: Vec<&str> = outcome.entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), outcome.entries.len());
    }

    #[test]
    fn test_save_without_half_negates_damage() {
        let Setup { mut encounter, aria, .. } = setup();
        let request = AoeDamageRequest::new(vec![DamageComponent::untyped(20)])
            .with_save(Ability::Wis, 10, false);
        let resolutions = AoeService::new()
            .resolve(&encounter, &request, &mut FixedRoller(vec![15, 15, 15]))
            .unwrap();
        let aria_resolution = resolutions.iter().find(|r| r.entity == aria).unwrap();
        assert_eq!(aria_resolution.total_damage, calculate_save_damage(20, true, false));

        // resolve is a preview: nothing written
        let EntityRef::Character(aria_id) = &aria else { unreachable!() };
        assert_eq!(encounter.find_character(aria_id).unwrap().current_hp, 40);
        assert!(encounter.combat_log().is_empty());

        AoeService::new()
            .apply(&mut encounter, &request, &mut FixedRoller(vec![1, 1, 1]))
            .unwrap();
        assert_eq!(encounter.find_character(aria_id).unwrap().current_hp, 25);
    }

    #[test]
    fn test_multi_component_with_overrides() {
        let Setup { mut encounter, lich, .. } = setup();
        let request = AoeDamageRequest::new(vec![
            DamageComponent::typed(10, "fire"),
            DamageComponent::typed(7, "cold"),
        ])
        .with_override(
            lich.clone(),
            TargetOverride::default()
                .with_component(0, ComponentOverride { modifier: Some(DamageModifier::Double), adjustment: -3 })
                .with_component(1, ComponentOverride { modifier: None, adjustment: -20 }),
        );

        let outcome = AoeService::new()
            .apply(&mut encounter, &request, &mut FixedRoller(vec![]))
            .unwrap();
        let lich_resolution = outcome.resolutions.iter().find(|r| r.entity == lich).unwrap();
        assert_eq!(lich_resolution.components[0].final_amount, 17);
        assert_eq!(lich_resolution.components[1].final_amount, 0);
        assert_eq!(lich_resolution.total_damage, 17);
    }

    #[test]
    fn test_manual_roll_override_decides_save() {
        let Setup { encounter, lich, .. } = setup();
        let request = AoeDamageRequest::new(vec![DamageComponent::untyped(30)])
            .with_save(Ability::Dex, 20, true)
            .with_override(lich.clone(), TargetOverride::default().with_roll(15));
        let resolutions = AoeService::new()
            .resolve(&encounter, &request, &mut FixedRoller(vec![1, 1]))
            .unwrap();
        let lich_resolution = resolutions.iter().find(|r| r.entity == lich).unwrap();
        assert_eq!(lich_resolution.save, Some(SaveResult::manual(15, 5)));
        assert!(lich_resolution.saved);
        assert_eq!(lich_resolution.total_damage, 15);
    }

    #[test]
    fn test_apply_to_all_includes_unflagged() {
        let Setup { encounter, .. } = setup();
        let service = AoeService::new();
        assert_eq!(service.affected_targets(&encounter, false).len(), 3);
        assert_eq!(service.affected_targets(&encounter, true).len(), 4);
    }

    #[test]
    fn test_unknown_override_rejects_whole_batch() {
        let Setup { mut encounter, aria, .. } = setup();
        let ghost = EntityRef::Boss("missing".into());
        let request = AoeDamageRequest::new(vec![DamageComponent::untyped(10)])
            .with_override(ghost.clone(), TargetOverride::default());

        let result = AoeService::new().apply(&mut encounter, &request, &mut FixedRoller(vec![]));

        assert_eq!(result, Err(AoeError::UnknownTarget(ghost)));
        let EntityRef::Character(aria_id) = &aria else { unreachable!() };
        assert_eq!(encounter.find_character(aria_id).unwrap().current_hp, 40);
        assert!(encounter.combat_log().is_empty());
    }

    #[test]
    fn test_no_targets_is_empty_outcome() {
        let mut encounter = EncounterAggregate::default();
        encounter.add_character(Character::new("Aria", 10)).unwrap();
        let outcome = AoeService::new()
            .apply(&mut encounter, &AoeDamageRequest::new(vec![DamageComponent::untyped(5)]), &mut FixedRoller(vec![]))
            .unwrap();
        assert!(outcome.entries.is_empty());
        assert!(encounter.combat_log().is_empty());
    }

    #[test]
    fn test_immune_target_takes_nothing() {
        let mut encounter = EncounterAggregate::default();
        let mut golem = Boss::new("Golem", 80)
            .with_defenses(Defenses::new().with(DefenseCategory::Immunities, "poison"));
        golem.in_aoe = true;
        let golem = encounter.add_boss(golem).unwrap();

        let outcome = AoeService::new()
            .apply(
                &mut encounter,
                &AoeDamageRequest::new(vec![DamageComponent::typed(40, "poison")]),
                &mut FixedRoller(vec![]),
            )
            .unwrap();
        assert_eq!(outcome.total_damage(), 0);
        assert_eq!(outcome.entries[0].target, LogTarget::Entity(golem));
        assert!(outcome.entries[0].message.contains("poison: no damage"));
    }
}

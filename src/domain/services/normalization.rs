//! Entity normalization
//!
//! Applied to every entity entering the roster (add operations and snapshot
//! import) so the HP, count and charge invariants hold from then on.

use super::numeric::{clamp_hp, ensure_non_negative};
use crate::domain::entities::{Boss, BossAttack, Character, EnemyGroup};

/// Normalize charge bookkeeping on an attack
pub fn normalize_boss_attack(attack: &BossAttack) -> BossAttack {
    attack.normalized()
}

pub fn normalize_character(mut character: Character) -> Character {
    character.max_hp = ensure_non_negative(character.max_hp);
    character.current_hp = clamp_hp(character.current_hp, character.max_hp);
    character.temp_hp = ensure_non_negative(character.temp_hp);
    character.defenses = character.defenses.exclusive();
    character
}

pub fn normalize_boss(mut boss: Boss) -> Boss {
    boss.max_hp = ensure_non_negative(boss.max_hp);
    boss.current_hp = clamp_hp(boss.current_hp, boss.max_hp);
    boss.temp_hp = ensure_non_negative(boss.temp_hp);
    boss.defenses = boss.defenses.exclusive();
    boss.saving_throws = Some(boss.saving_throws.unwrap_or_default());
    boss.attacks = boss.attacks.iter().map(normalize_boss_attack).collect();
    boss
}

pub fn normalize_enemy_group(mut group: EnemyGroup) -> EnemyGroup {
    group.max_hp = ensure_non_negative(group.max_hp);
    group.original_count = ensure_non_negative(group.original_count);
    group.count = group.count.clamp(0, group.original_count);
    group.current_hp = clamp_hp(group.current_hp, group.max_hp);
    group.temp_hp = ensure_non_negative(group.temp_hp);
    group.defenses = group.defenses.exclusive();
    group.saving_throws = Some(group.saving_throws.unwrap_or_default());
    if let Some(creatures) = group.creatures.as_mut() {
        for creature in creatures.iter_mut() {
            creature.max_hp = ensure_non_negative(creature.max_hp);
            creature.current_hp = clamp_hp(creature.current_hp, creature.max_hp);
        }
        creatures.truncate(group.original_count as usize);
    }
    group.refresh_from_creatures();
    group
}

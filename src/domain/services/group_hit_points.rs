//! Group aggregation and per-creature damage/healing
//!
//! Two views of a group must agree: the aggregate totals that summaries and
//! the initiative list read, and the per-creature detail. When the detail
//! array exists it is summed; otherwise the representative HP is multiplied
//! out across the survivors.

use super::hit_points::apply_damage_with_temp_hp;
use super::numeric::ensure_non_negative;
use crate::domain::entities::{CreatureHp, EnemyGroup};

/// Summed HP of a group (or several groups)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupTotals {
    pub total_current_hp: i32,
    /// Potential of the group at its original size
    pub total_max_hp: i32,
}

impl std::ops::Add for GroupTotals {
    type Output = GroupTotals;

    fn add(self, rhs: GroupTotals) -> GroupTotals {
        GroupTotals {
            total_current_hp: self.total_current_hp + rhs.total_current_hp,
            total_max_hp: self.total_max_hp + rhs.total_max_hp,
        }
    }
}

pub fn calculate_group_totals(group: &EnemyGroup) -> GroupTotals {
    let total_current_hp = match &group.creatures {
        Some(creatures) => creatures.iter().map(|c| c.current_hp).sum(),
        None => group.current_hp * group.count,
    };
    GroupTotals {
        total_current_hp,
        total_max_hp: group.max_hp * group.original_count,
    }
}

/// Sum the totals of every group sharing one turn-order row
pub fn calculate_collection_totals<'a>(groups: impl IntoIterator<Item = &'a EnemyGroup>) -> GroupTotals {
    groups
        .into_iter()
        .map(calculate_group_totals)
        .fold(GroupTotals::default(), |acc, totals| acc + totals)
}

/// Per-creature HP; synthesised from the representative value when untracked
pub fn build_creature_hp_details(group: &EnemyGroup) -> Vec<CreatureHp> {
    match &group.creatures {
        Some(creatures) => creatures.clone(),
        None => vec![CreatureHp::new(group.current_hp, group.max_hp); ensure_non_negative(group.count) as usize],
    }
}

/// Spread a healing pool over living creatures, healthiest-but-not-full first
///
/// Returns the amount actually used. Dead creatures are never healed.
pub fn distribute_healing(creatures: &mut [CreatureHp], pool: i32) -> i32 {
    let mut remaining = ensure_non_negative(pool);
    let mut order: Vec<usize> = (0..creatures.len())
        .filter(|&i| creatures[i].is_alive())
        .collect();
    order.sort_by(|&a, &b| creatures[b].current_hp.cmp(&creatures[a].current_hp));

    for index in order {
        if remaining == 0 {
            break;
        }
        let creature = &mut creatures[index];
        if creature.is_full() {
            continue;
        }
        let healed = (creature.max_hp - creature.current_hp).min(remaining);
        creature.current_hp += healed;
        remaining -= healed;
    }

    ensure_non_negative(pool) - remaining
}

/// Result of damaging a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDamageOutcome {
    /// Damage that got past temp HP, per creature hit
    pub remaining_damage: i32,
    pub creatures_hit: i32,
    pub creatures_slain: i32,
}

/// Area damage: temp HP absorbs once, the overflow lands on every living creature
pub fn damage_group_area(group: &mut EnemyGroup, damage: i32) -> GroupDamageOutcome {
    if group.count == 0 {
        return GroupDamageOutcome {
            remaining_damage: 0,
            creatures_hit: 0,
            creatures_slain: 0,
        };
    }
    let applied = apply_damage_with_temp_hp(damage, group.current_hp, group.temp_hp);
    group.temp_hp = applied.new_temp_hp;

    let creatures = group.ensure_creatures();
    let mut creatures_hit = 0;
    let mut creatures_slain = 0;
    for creature in creatures.iter_mut().filter(|c| c.is_alive()) {
        creatures_hit += 1;
        creature.current_hp = ensure_non_negative(creature.current_hp - applied.remaining_damage);
        if !creature.is_alive() {
            creatures_slain += 1;
        }
    }
    group.refresh_from_creatures();

    GroupDamageOutcome {
        remaining_damage: applied.remaining_damage,
        creatures_hit,
        creatures_slain,
    }
}

/// Single-target damage against one creature of the group
///
/// With no index (or a dead/out-of-range one) the first living creature is hit.
pub fn damage_group_creature(group: &mut EnemyGroup, damage: i32, index: Option<usize>) -> GroupDamageOutcome {
    let creatures = group.ensure_creatures();
    let target = index
        .filter(|&i| creatures.get(i).is_some_and(|c| c.is_alive()))
        .or_else(|| creatures.iter().position(|c| c.is_alive()));

    let Some(target) = target else {
        return GroupDamageOutcome {
            remaining_damage: 0,
            creatures_hit: 0,
            creatures_slain: 0,
        };
    };

    let creature = creatures[target];
    let applied = apply_damage_with_temp_hp(damage, creature.current_hp, group.temp_hp);
    let creatures = group.ensure_creatures();
    creatures[target].current_hp = applied.new_current_hp;
    let slain = i32::from(!creatures[target].is_alive());
    group.temp_hp = applied.new_temp_hp;
    group.refresh_from_creatures();

    GroupDamageOutcome {
        remaining_damage: applied.remaining_damage,
        creatures_hit: 1,
        creatures_slain: slain,
    }
}

/// Heal a group through the creature-distribution rule; returns HP restored
pub fn heal_group(group: &mut EnemyGroup, amount: i32) -> i32 {
    if amount <= 0 {
        return 0;
    }
    let healed = distribute_healing(group.ensure_creatures(), amount);
    group.refresh_from_creatures();
    healed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblins(count: i32, original_count: i32, current_hp: i32, max_hp: i32) -> EnemyGroup {
        let mut group = EnemyGroup::new("Goblins", original_count, max_hp);
        group.count = count;
        group.current_hp = current_hp;
        group
    }

    #[test]
    fn test_group_totals_use_representative_hp() {
        let group = goblins(3, 5, 7, 10);
        assert_eq!(
            calculate_group_totals(&group),
            GroupTotals { total_current_hp: 21, total_max_hp: 50 }
        );
    }

    #[test]
    fn test_group_totals_sum_detail_when_tracked() {
        let mut group = goblins(2, 3, 6, 10);
        group.creatures = Some(vec![
            CreatureHp::new(10, 10),
            CreatureHp::new(3, 10),
            CreatureHp::new(0, 10),
        ]);
        assert_eq!(calculate_group_totals(&group).total_current_hp, 13);
    }

    #[test]
    fn test_collection_totals_sum_groups() {
        let a = goblins(3, 5, 7, 10);
        let b = goblins(4, 4, 10, 10);
        let totals = calculate_collection_totals([&a, &b]);
        assert_eq!(totals, GroupTotals { total_current_hp: 61, total_max_hp: 90 });
    }

    #[test]
    fn test_creature_details_fallback() {
        let group = goblins(3, 5, 7, 10);
        let details = build_creature_hp_details(&group);
        assert_eq!(details, vec![CreatureHp::new(7, 10); 3]);
    }

    #[test]
    fn test_distribute_healing_prefers_healthiest_unfull() {
        let mut creatures = vec![
            CreatureHp::new(2, 10),
            CreatureHp::new(0, 10),
            CreatureHp::new(10, 10),
            CreatureHp::new(8, 10),
        ];
        let used = distribute_healing(&mut creatures, 5);
        assert_eq!(used, 5);
        assert_eq!(creatures[3].current_hp, 10);
        assert_eq!(creatures[0].current_hp, 5);
        assert_eq!(creatures[1].current_hp, 0);
        assert_eq!(creatures[2].current_hp, 10);
    }

    #[test]
    fn test_distribute_healing_reports_unused_pool() {
        let mut creatures = vec![CreatureHp::new(9, 10), CreatureHp::new(0, 10)];
        assert_eq!(distribute_healing(&mut creatures, 20), 1);
    }

    #[test]
    fn test_area_damage_hits_every_living_creature() {
        let mut group = goblins(3, 4, 7, 10);
        group.temp_hp = 2;
        let outcome = damage_group_area(&mut group, 6);

        assert_eq!(outcome.remaining_damage, 4);
        assert_eq!(outcome.creatures_hit, 3);
        assert_eq!(outcome.creatures_slain, 0);
        assert_eq!(group.temp_hp, 0);
        assert_eq!(calculate_group_totals(&group).total_current_hp, 9);
        assert_eq!(group.count, 3);
    }

    #[test]
    fn test_area_damage_kills_and_keeps_count_bounds() {
        let mut group = goblins(3, 5, 7, 10);
        let outcome = damage_group_area(&mut group, 50);
        assert_eq!(outcome.creatures_slain, 3);
        assert_eq!(group.count, 0);
        assert_eq!(group.current_hp, 0);
        assert!(group.count <= group.original_count);
    }

    #[test]
    fn test_area_damage_spares_temp_hp_of_wiped_group() {
        let mut group = goblins(0, 3, 7, 10);
        group.temp_hp = 5;
        let outcome = damage_group_area(&mut group, 8);
        assert_eq!(outcome.creatures_hit, 0);
        assert_eq!(group.temp_hp, 5);
        assert_eq!(group.count, 0);
    }

    #[test]
    fn test_single_creature_damage_targets_first_living() {
        let mut group = goblins(2, 3, 10, 10);
        let outcome = damage_group_creature(&mut group, 10, Some(2));
        assert_eq!(outcome.creatures_slain, 1);
        assert_eq!(group.count, 1);
        let creatures = group.creatures.clone().unwrap();
        assert_eq!(creatures[0].current_hp, 0);
        assert_eq!(creatures[1].current_hp, 10);
    }

    #[test]
    fn test_heal_group_leaves_dead_alone() {
        let mut group = goblins(2, 3, 4, 10);
        let healed = heal_group(&mut group, 8);
        assert_eq!(healed, 8);
        assert_eq!(group.count, 2);
        let creatures = group.creatures.clone().unwrap();
        assert_eq!(creatures[0].current_hp, 10);
        assert_eq!(creatures[1].current_hp, 6);
        assert_eq!(creatures[2].current_hp, 0);
        assert_eq!(group.current_hp, 5);
    }
}

//! Turn Order Service - initiative projection and turn tracking
//!
//! Rows are derived from the roster on every call and never stored. Groups
//! whose names share a base (for example `Goblin 1`, `Goblin 2`) collapse
//! into a single collection row for display, but every member keeps its own
//! HP and is still targeted individually.
//!
//! The only persisted state is `TurnState`: the manual row order used to
//! break initiative ties, the round counter and the active row key.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::aggregates::EncounterAggregate;
use crate::domain::entities::{Combatant, EntityRef};
use crate::domain::services::{calculate_collection_totals, calculate_group_totals};
use crate::domain::value_objects::GroupId;

fn base_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*?)\s*(?:#?\d+|\(\d+\))$").expect("valid base name pattern"))
}

/// Strip a trailing ordinal (`Goblin 2`, `Goblin #2`, `Goblin (2)`)
pub fn base_group_name(name: &str) -> &str {
    base_name_pattern()
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|base| base.as_str())
        .filter(|base| !base.is_empty())
        .unwrap_or(name)
}

/// One row of the initiative list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOrderEntry {
    Combatant {
        entity: EntityRef,
        initiative: i32,
    },
    GroupCollection {
        base_name: String,
        ids: Vec<GroupId>,
        /// Highest initiative among the members
        initiative: i32,
    },
}

impl TurnOrderEntry {
    /// Stable key used for manual ordering and the active-row pointer
    pub fn key(&self) -> String {
        match self {
            Self::Combatant { entity, .. } => entity.to_string(),
            Self::GroupCollection { base_name, .. } => format!("collection:{}", base_name),
        }
    }

    pub fn initiative(&self) -> i32 {
        match self {
            Self::Combatant { initiative, .. } | Self::GroupCollection { initiative, .. } => *initiative,
        }
    }

    /// Every entity this row stands for
    pub fn entities(&self) -> Vec<EntityRef> {
        match self {
            Self::Combatant { entity, .. } => vec![entity.clone()],
            Self::GroupCollection { ids, .. } => ids.iter().cloned().map(EntityRef::Group).collect(),
        }
    }
}

/// Health bar rules supplied by the presentation layer
pub trait HealthDisplay {
    fn health_percentage(&self, current: i32, max: i32) -> i32;
    fn health_colour(&self, percentage: i32) -> String;
}

/// Rounded percentage with a four-step colour scale
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHealthDisplay;

impl HealthDisplay for StandardHealthDisplay {
    fn health_percentage(&self, current: i32, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        let percentage = (f64::from(current) * 100.0 / f64::from(max)).round() as i32;
        percentage.clamp(0, 100)
    }

    fn health_colour(&self, percentage: i32) -> String {
        match percentage {
            p if p > 50 => "green",
            p if p > 25 => "yellow",
            p if p > 0 => "red",
            _ => "grey",
        }
        .to_string()
    }
}

/// Per-member summary shown on a collection row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBadge {
    pub id: GroupId,
    pub name: String,
    pub count: i32,
    pub original_count: i32,
    pub hp_text: String,
    pub health_colour: String,
}

/// A row ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrderDisplay {
    pub key: String,
    pub name: String,
    pub initiative: i32,
    pub hp_text: String,
    pub health_percentage: i32,
    pub health_colour: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_badges: Option<Vec<GroupBadge>>,
    pub is_active: bool,
}

/// Project one row against the current roster
///
/// Returns `None` when the row no longer refers to anything on the roster.
pub fn format_turn_order_entry(
    entry: &TurnOrderEntry,
    encounter: &EncounterAggregate,
    display: &dyn HealthDisplay,
) -> Option<TurnOrderDisplay> {
    let key = entry.key();
    let is_active = encounter.turn_state().active_row.as_deref() == Some(key.as_str());

    let (name, current, max, hp_text, group_badges) = match entry {
        TurnOrderEntry::Combatant { entity, .. } => match entity {
            EntityRef::Character(id) => {
                let c = encounter.find_character(id)?;
                (c.name.clone(), c.current_hp, c.max_hp, solo_hp_text(c.current_hp, c.max_hp, c.temp_hp), None)
            }
            EntityRef::Boss(id) => {
                let b = encounter.find_boss(id)?;
                (b.name.clone(), b.current_hp, b.max_hp, solo_hp_text(b.current_hp, b.max_hp, b.temp_hp), None)
            }
            EntityRef::Group(id) => {
                let g = encounter.find_group(id)?;
                let totals = calculate_group_totals(g);
                let hp_text = format!(
                    "{}/{} ({}/{} alive)",
                    totals.total_current_hp, totals.total_max_hp, g.count, g.original_count
                );
                (g.name.clone(), totals.total_current_hp, totals.total_max_hp, hp_text, None)
            }
        },
        TurnOrderEntry::GroupCollection { base_name, ids, .. } => {
            let members: Vec<_> = ids.iter().filter_map(|id| encounter.find_group(id)).collect();
            if members.is_empty() {
                return None;
            }
            let totals = calculate_collection_totals(members.iter().copied());
            let badges: Vec<GroupBadge> = members
                .iter()
                .map(|g| {
                    let group_totals = calculate_group_totals(g);
                    let percentage =
                        display.health_percentage(group_totals.total_current_hp, group_totals.total_max_hp);
                    GroupBadge {
                        id: g.id.clone(),
                        name: g.name.clone(),
                        count: g.count,
                        original_count: g.original_count,
                        hp_text: format!("{}/{}", group_totals.total_current_hp, group_totals.total_max_hp),
                        health_colour: display.health_colour(percentage),
                    }
                })
                .collect();
            let hp_text = format!("{}/{}", totals.total_current_hp, totals.total_max_hp);
            (base_name.clone(), totals.total_current_hp, totals.total_max_hp, hp_text, Some(badges))
        }
    };

    let health_percentage = display.health_percentage(current, max);
    Some(TurnOrderDisplay {
        key,
        name,
        initiative: entry.initiative(),
        hp_text,
        health_percentage,
        health_colour: display.health_colour(health_percentage),
        group_badges,
        is_active,
    })
}

fn solo_hp_text(current: i32, max: i32, temp: i32) -> String {
    if temp > 0 {
        format!("{}/{} (+{})", current, max, temp)
    } else {
        format!("{}/{}", current, max)
    }
}

/// Service for the initiative list
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOrderService;

impl TurnOrderService {
    pub fn new() -> Self {
        Self
    }

    /// Rows sorted by initiative, highest first; ties keep the manual order
    pub fn project(&self, encounter: &EncounterAggregate) -> Vec<TurnOrderEntry> {
        let mut rows: Vec<TurnOrderEntry> = encounter
            .characters()
            .iter()
            .map(|c| c as &dyn Combatant)
            .chain(encounter.bosses().iter().map(|b| b as &dyn Combatant))
            .map(|c| TurnOrderEntry::Combatant {
                entity: c.entity_ref(),
                initiative: c.initiative(),
            })
            .collect();
        rows.extend(self.group_rows(encounter));

        let sequence = &encounter.turn_state().sequence;
        let position: HashMap<&str, usize> = sequence
            .iter()
            .enumerate()
            .map(|(index, key)| (key.as_str(), index))
            .collect();
        let mut keyed: Vec<(usize, usize, TurnOrderEntry)> = rows
            .into_iter()
            .enumerate()
            .map(|(roster_index, row)| {
                let manual = position.get(row.key().as_str()).copied().unwrap_or(usize::MAX);
                (manual, roster_index, row)
            })
            .collect();
        keyed.sort_by_key(|(manual, roster_index, _)| (*manual, *roster_index));
        keyed.sort_by_key(|(_, _, row)| std::cmp::Reverse(row.initiative()));
        keyed.into_iter().map(|(_, _, row)| row).collect()
    }

    fn group_rows(&self, encounter: &EncounterAggregate) -> Vec<TurnOrderEntry> {
        let groups = encounter.enemy_groups();
        if !encounter.settings().collapse_group_collections {
            return groups
                .iter()
                .map(|g| TurnOrderEntry::Combatant {
                    entity: g.entity_ref(),
                    initiative: g.initiative,
                })
                .collect();
        }

        let mut buckets: Vec<(&str, Vec<usize>)> = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            let base = base_group_name(&group.name);
            match buckets.iter_mut().find(|(name, _)| *name == base) {
                Some((_, members)) => members.push(index),
                None => buckets.push((base, vec![index])),
            }
        }

        buckets
            .into_iter()
            .map(|(base, members)| {
                if let [only] = members.as_slice() {
                    let group = &groups[*only];
                    return TurnOrderEntry::Combatant {
                        entity: group.entity_ref(),
                        initiative: group.initiative,
                    };
                }
                TurnOrderEntry::GroupCollection {
                    base_name: base.to_string(),
                    ids: members.iter().map(|&i| groups[i].id.clone()).collect(),
                    initiative: members.iter().map(|&i| groups[i].initiative).max().unwrap_or(0),
                }
            })
            .collect()
    }

    /// Project and format every row
    pub fn display(
        &self,
        encounter: &EncounterAggregate,
        display: &dyn HealthDisplay,
    ) -> Vec<TurnOrderDisplay> {
        self.project(encounter)
            .iter()
            .filter_map(|entry| format_turn_order_entry(entry, encounter, display))
            .collect()
    }

    /// Swap a row with the one above it when their initiative ties
    pub fn move_up(&self, encounter: &mut EncounterAggregate, key: &str) -> bool {
        self.swap_with_neighbour(encounter, key, true)
    }

    /// Swap a row with the one below it when their initiative ties
    pub fn move_down(&self, encounter: &mut EncounterAggregate, key: &str) -> bool {
        self.swap_with_neighbour(encounter, key, false)
    }

    fn swap_with_neighbour(&self, encounter: &mut EncounterAggregate, key: &str, up: bool) -> bool {
        let rows = self.project(encounter);
        let Some(index) = rows.iter().position(|row| row.key() == key) else {
            return false;
        };
        let neighbour = if up {
            index.checked_sub(1)
        } else {
            Some(index + 1).filter(|&i| i < rows.len())
        };
        let Some(neighbour) = neighbour else {
            return false;
        };
        if rows[index].initiative() != rows[neighbour].initiative() {
            debug!(key, "Rows only reorder within an initiative tie");
            return false;
        }

        let mut keys: Vec<String> = rows.iter().map(TurnOrderEntry::key).collect();
        keys.swap(index, neighbour);
        encounter.turn_state_mut().sequence = keys;
        debug!(key, up, "Moved row");
        true
    }

    /// Hand the turn to the next row; wrapping past the last row starts a new round
    pub fn advance_turn(&self, encounter: &mut EncounterAggregate) -> Option<TurnOrderEntry> {
        let rows = self.project(encounter);
        if rows.is_empty() {
            return None;
        }

        let state = encounter.turn_state_mut();
        let current = state
            .active_row
            .as_deref()
            .and_then(|active| rows.iter().position(|row| row.key() == active));
        // A removed active row leaves its successor at the same position
        let successor = match (current, state.active_row.as_ref(), state.active_position) {
            (Some(index), _, _) => Some(index + 1),
            (None, Some(_), Some(position)) => Some(position),
            _ => None,
        };
        let next = match successor {
            Some(index) if index < rows.len() => index,
            Some(_) => {
                state.round += 1;
                info!(round = state.round, "Starting new round");
                0
            }
            None => {
                state.round = state.round.max(1);
                0
            }
        };

        let entry = rows[next].clone();
        state.active_row = Some(entry.key());
        state.active_position = Some(next);
        debug!(active = %entry.key(), round = state.round, "Advanced turn");
        Some(entry)
    }

    /// Clear the active row and round counter, keeping the manual order
    pub fn reset_turns(&self, encounter: &mut EncounterAggregate) {
        let state = encounter.turn_state_mut();
        state.round = 0;
        state.active_row = None;
        state.active_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Boss, Character, EnemyGroup, EnemyGroupTemplate};
    use crate::domain::value_objects::EngineSettings;

    fn roster(settings: EngineSettings) -> EncounterAggregate {
        let mut encounter = EncounterAggregate::new(settings);
        encounter.add_character(Character::new("Aria", 30).with_initiative(15)).unwrap();
        encounter.add_character(Character::new("Borin", 40).with_initiative(12)).unwrap();
        encounter.add_boss(Boss::new("Lich", 135).with_initiative(18)).unwrap();
        let template = EnemyGroupTemplate {
            initiative: 12,
            ..EnemyGroupTemplate::new("Goblin", 3, 7)
        };
        encounter.add_enemy_group(template.spawn(1)).unwrap();
        let mut second = template.spawn(2);
        second.initiative = 14;
        encounter.add_enemy_group(second).unwrap();
        encounter
    }

    #[test]
    fn test_base_group_name() {
        assert_eq!(base_group_name("Goblin 2"), "Goblin");
        assert_eq!(base_group_name("Goblin #12"), "Goblin");
        assert_eq!(base_group_name("Goblin (3)"), "Goblin");
        assert_eq!(base_group_name("Goblin"), "Goblin");
        assert_eq!(base_group_name("42"), "42");
    }

    #[test]
    fn test_projection_sorts_and_collapses() {
        let encounter = roster(EngineSettings::default());
        let rows = TurnOrderService::new().project(&encounter);

        let keys: Vec<String> = rows.iter().map(TurnOrderEntry::key).collect();
        assert_eq!(keys.len(), 4);
        assert!(keys[0].starts_with("boss:"));
        assert!(keys[1].starts_with("character:"));
        assert_eq!(keys[2], "collection:Goblin");
        assert_eq!(rows[2].initiative(), 14);
        assert_eq!(rows[2].entities().len(), 2);
        assert!(keys[3].starts_with("character:"));
    }

    #[test]
    fn test_collapse_can_be_disabled() {
        let encounter = roster(EngineSettings {
            collapse_group_collections: false,
            ..EngineSettings::default()
        });
        let rows = TurnOrderService::new().project(&encounter);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| matches!(r, TurnOrderEntry::Combatant { .. })));
    }

    #[test]
    fn test_single_group_is_not_collapsed() {
        let mut encounter = EncounterAggregate::default();
        encounter.add_enemy_group(EnemyGroup::new("Orc 1", 2, 15)).unwrap();
        let rows = TurnOrderService::new().project(&encounter);
        assert!(matches!(rows[0], TurnOrderEntry::Combatant { entity: EntityRef::Group(_), .. }));
    }

    #[test]
    fn test_collection_display_sums_members() {
        let mut encounter = roster(EngineSettings::default());
        let first_goblins = encounter.enemy_groups()[0].id.clone();
        encounter.find_group_mut(&first_goblins).unwrap().current_hp = 0;
        encounter.find_group_mut(&first_goblins).unwrap().count = 0;

        let service = TurnOrderService::new();
        let rows = service.project(&encounter);
        let collection = rows.iter().find(|r| r.key() == "collection:Goblin").unwrap();
        let display = format_turn_order_entry(collection, &encounter, &StandardHealthDisplay).unwrap();

        assert_eq!(display.name, "Goblin");
        assert_eq!(display.hp_text, "21/42");
        assert_eq!(display.health_percentage, 50);
        assert_eq!(display.health_colour, "yellow");
        let badges = display.group_badges.unwrap();
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].health_colour, "grey");
        assert_eq!(badges[1].hp_text, "21/21");
    }

    #[test]
    fn test_format_removed_entity_is_none() {
        let mut encounter = EncounterAggregate::default();
        let aria = encounter.add_character(Character::new("Aria", 30)).unwrap();
        let entry = TurnOrderEntry::Combatant { entity: aria.clone(), initiative: 0 };
        assert!(format_turn_order_entry(&entry, &encounter, &StandardHealthDisplay).is_some());
        encounter.remove(&aria);
        assert!(format_turn_order_entry(&entry, &encounter, &StandardHealthDisplay).is_none());
    }

    #[test]
    fn test_solo_hp_text_shows_temp() {
        let mut encounter = EncounterAggregate::default();
        encounter
            .add_character(Character::new("Aria", 30).with_current_hp(12).with_temp_hp(4))
            .unwrap();
        let rows = TurnOrderService::new().display(&encounter, &StandardHealthDisplay);
        assert_eq!(rows[0].hp_text, "12/30 (+4)");
        assert_eq!(rows[0].health_percentage, 40);
    }

    #[test]
    fn test_move_only_within_tie() {
        let mut encounter = roster(EngineSettings {
            collapse_group_collections: false,
            ..EngineSettings::default()
        });
        let service = TurnOrderService::new();
        let before: Vec<String> = service.project(&encounter).iter().map(TurnOrderEntry::key).collect();
        // Lich 18, Aria 15, Goblin 2 14, Borin 12, Goblin 1 12
        assert!(!service.move_up(&mut encounter, &before[1]));
        assert!(!service.move_up(&mut encounter, &before[0]));

        assert!(service.move_up(&mut encounter, &before[4]));
        let after: Vec<String> = service.project(&encounter).iter().map(TurnOrderEntry::key).collect();
        assert_eq!(after[3], before[4]);
        assert_eq!(after[4], before[3]);

        assert!(service.move_down(&mut encounter, &before[4]));
        let restored: Vec<String> = service.project(&encounter).iter().map(TurnOrderEntry::key).collect();
        assert_eq!(restored, before);
        assert!(!service.move_down(&mut encounter, &before[4]));
    }

    #[test]
    fn test_initiative_change_overrides_manual_order() {
        let mut encounter = roster(EngineSettings::default());
        let service = TurnOrderService::new();
        let rows = service.project(&encounter);
        let last = rows.last().unwrap().key();

        let borin = encounter.characters()[1].id.clone();
        encounter.find_character_mut(&borin).unwrap().initiative = 30;

        let rows = service.project(&encounter);
        assert_eq!(rows[0].key(), last);
    }

    #[test]
    fn test_advance_turn_wraps_rounds() {
        let mut encounter = roster(EngineSettings::default());
        let service = TurnOrderService::new();

        let first = service.advance_turn(&mut encounter).unwrap();
        assert_eq!(encounter.turn_state().round, 1);
        assert_eq!(encounter.turn_state().active_row.as_deref(), Some(first.key().as_str()));

        for _ in 0..3 {
            service.advance_turn(&mut encounter);
        }
        assert_eq!(encounter.turn_state().round, 1);

        let wrapped = service.advance_turn(&mut encounter).unwrap();
        assert_eq!(wrapped, first);
        assert_eq!(encounter.turn_state().round, 2);

        let active = service.display(&encounter, &StandardHealthDisplay);
        assert!(active[0].is_active);
        assert!(!active[1].is_active);

        service.reset_turns(&mut encounter);
        assert_eq!(encounter.turn_state().round, 0);
        assert!(encounter.turn_state().active_row.is_none());
    }

    #[test]
    fn test_advance_after_active_row_removed() {
        let mut encounter = roster(EngineSettings::default());
        let service = TurnOrderService::new();

        service.advance_turn(&mut encounter);
        let aria = service.advance_turn(&mut encounter).unwrap();
        assert_eq!(aria.initiative(), 15);
        encounter.remove(&aria.entities()[0]);

        let next = service.advance_turn(&mut encounter).unwrap();
        assert_eq!(next.key(), "collection:Goblin");
        assert_eq!(encounter.turn_state().round, 1);

        let borin = service.advance_turn(&mut encounter).unwrap();
        encounter.remove(&borin.entities()[0]);
        let wrapped = service.advance_turn(&mut encounter).unwrap();
        assert_eq!(wrapped.initiative(), 18);
        assert_eq!(encounter.turn_state().round, 2);
    }

    #[test]
    fn test_advance_empty_roster() {
        let mut encounter = EncounterAggregate::default();
        assert!(TurnOrderService::new().advance_turn(&mut encounter).is_none());
    }
}

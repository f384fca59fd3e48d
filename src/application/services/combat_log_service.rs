//! Combat log service - builds log entries, merges batched healing and
//! renders messages for display
//!
//! Highlighting is a presentation concern with fixed rules:
//! - `Damage: N` and `Total Damage: N` are wrapped in a damage highlight
//! - messages containing `Healing!` highlight `N healing` instead
//! - AoE summaries (messages starting with `AoE`) break lines after each
//!   `; ` and after each `to <category> - ` prefix

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

use crate::domain::entities::{CombatLogEntry, EntityRef, HitStatus, LogEffect, LogTarget};
use crate::domain::value_objects::{generate_id, generate_id_with_offset};

const HEALING_PREFIX: &str = "Healing! ";
const AOE_PREFIX: &str = "AoE";

fn transaction_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(healing-\d+)-.+$").expect("valid transaction pattern"))
}

fn damage_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"((?:Total )?Damage): (\d+)").expect("valid damage pattern"))
}

fn healing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+) healing").expect("valid healing pattern"))
}

fn category_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(to (?:characters|bosses|groups) - )").expect("valid category pattern")
    })
}

/// Transaction id shared by every entry of one multi-target healing action
pub fn new_healing_transaction_id() -> String {
    format!("healing-{}", generate_id())
}

/// Log entry for damage dealt to one entity
///
/// A miss always records 0 damage whatever amount was passed.
pub fn create_damage_result(
    damage: i32,
    name: &str,
    entity: EntityRef,
    hit_status: HitStatus,
    modifier_text: Option<&str>,
) -> CombatLogEntry {
    create_damage_result_with_id(generate_id(), damage, name, entity, hit_status, modifier_text)
}

pub(crate) fn create_damage_result_with_id(
    id: String,
    damage: i32,
    name: &str,
    entity: EntityRef,
    hit_status: HitStatus,
    modifier_text: Option<&str>,
) -> CombatLogEntry {
    let damage = match hit_status {
        HitStatus::Miss => 0,
        HitStatus::Hit | HitStatus::CriticalHit => damage,
    };
    CombatLogEntry {
        id,
        target: LogTarget::Entity(entity),
        effect: LogEffect::Damage { amount: damage, hit_status },
        message: format!(
            "{}! {} damage to {}{}",
            hit_status.label(),
            damage,
            name,
            modifier_text.unwrap_or_default()
        ),
        timestamp: Utc::now(),
    }
}

/// Log entry for healing one entity, optionally as part of a batch
pub fn create_healing_result(
    healing: i32,
    name: &str,
    entity: EntityRef,
    transaction_id: Option<&str>,
) -> CombatLogEntry {
    let id = match transaction_id {
        Some(transaction_id) => format!("{}-{}", transaction_id, entity.id_str()),
        None => generate_id(),
    };
    CombatLogEntry {
        id,
        target: LogTarget::Entity(entity),
        effect: LogEffect::Healing { amount: healing },
        message: format!("{}{} healing to {}", HEALING_PREFIX, healing, name),
        timestamp: Utc::now(),
    }
}

/// Summary entry for an area effect; not tied to any single entity
pub fn create_aoe_result(damage: i32, message: impl Into<String>) -> CombatLogEntry {
    create_aoe_result_with_offset(0, damage, message)
}

pub(crate) fn create_aoe_result_with_offset(
    offset_ms: i64,
    damage: i32,
    message: impl Into<String>,
) -> CombatLogEntry {
    CombatLogEntry {
        id: generate_id_with_offset(offset_ms),
        target: LogTarget::Area,
        effect: LogEffect::Damage {
            amount: damage,
            hit_status: HitStatus::Hit,
        },
        message: message.into(),
        timestamp: Utc::now(),
    }
}

/// Merge healing entries that share a `healing-<timestamp>` transaction
///
/// Groups with a single member and entries without a transaction id pass
/// through unchanged; a merged entry takes the position of its first member.
pub fn group_combat_results_by_transaction(entries: &[CombatLogEntry]) -> Vec<CombatLogEntry> {
    let prefix_of = |entry: &CombatLogEntry| -> Option<String> {
        transaction_pattern()
            .captures(&entry.id)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    };

    let mut members: HashMap<String, Vec<&CombatLogEntry>> = HashMap::new();
    for entry in entries {
        if let Some(prefix) = prefix_of(entry) {
            members.entry(prefix).or_default().push(entry);
        }
    }

    let mut emitted: Vec<String> = Vec::new();
    let mut grouped = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(prefix) = prefix_of(entry) else {
            grouped.push(entry.clone());
            continue;
        };
        let group = &members[&prefix];
        if group.len() < 2 {
            grouped.push(entry.clone());
            continue;
        }
        if emitted.contains(&prefix) {
            continue;
        }
        grouped.push(merge_transaction(&prefix, group));
        emitted.push(prefix);
    }
    grouped
}

fn merge_transaction(prefix: &str, group: &[&CombatLogEntry]) -> CombatLogEntry {
    let targets: Vec<EntityRef> = group.iter().filter_map(|e| e.entity().cloned()).collect();
    let healing: i32 = group.iter().filter_map(|e| e.healing()).sum();
    let fragments: Vec<&str> = group
        .iter()
        .map(|e| e.message.strip_prefix(HEALING_PREFIX).unwrap_or(&e.message))
        .collect();

    CombatLogEntry {
        id: prefix.to_string(),
        target: LogTarget::Batch(targets),
        effect: LogEffect::Healing { amount: healing },
        message: format!("{}{}", HEALING_PREFIX, fragments.join(", ")),
        timestamp: group[0].timestamp,
    }
}

/// Render a log message as HTML-safe markup with highlight spans
pub fn format_combat_log_message(message: &str) -> String {
    let is_aoe = message.starts_with(AOE_PREFIX);
    let escaped = if is_aoe {
        message
            .split("; ")
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(";<br/>")
    } else {
        escape_html(message)
    };

    let highlighted = if message.contains(HEALING_PREFIX.trim_end()) {
        healing_pattern()
            .replace_all(&escaped, r#"<span class="healing-highlight">$1 healing</span>"#)
            .into_owned()
    } else {
        damage_pattern()
            .replace_all(&escaped, r#"<span class="damage-highlight">$1: $2</span>"#)
            .into_owned()
    };

    if is_aoe {
        category_pattern()
            .replace_all(&highlighted, "${1}<br/>")
            .into_owned()
    } else {
        highlighted
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{BossId, CharacterId, GroupId};

    fn aria() -> EntityRef {
        EntityRef::Character(CharacterId::from("c1"))
    }

    fn borin() -> EntityRef {
        EntityRef::Character(CharacterId::from("c2"))
    }

    #[test]
    fn test_damage_result_message_and_target() {
        let entry = create_damage_result(12, "Lich", EntityRef::Boss(BossId::from("b1")), HitStatus::CriticalHit, Some(" (half damage)"));
        assert_eq!(entry.message, "Critical hit! 12 damage to Lich (half damage)");
        assert_eq!(entry.damage(), Some(12));
        assert_eq!(entry.entity(), Some(&EntityRef::Boss(BossId::from("b1"))));
        assert!(entry.id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_miss_forces_zero_damage() {
        let entry = create_damage_result(30, "Goblin 1", EntityRef::Group(GroupId::from("g1")), HitStatus::Miss, None);
        assert_eq!(entry.damage(), Some(0));
        assert_eq!(entry.message, "Miss! 0 damage to Goblin 1");
    }

    #[test]
    fn test_healing_result_ids() {
        let solo = create_healing_result(5, "Aria", aria(), None);
        assert!(solo.id.parse::<i64>().is_ok());
        assert_eq!(solo.message, "Healing! 5 healing to Aria");

        let batched = create_healing_result(5, "Aria", aria(), Some("healing-123"));
        assert_eq!(batched.id, "healing-123-c1");
    }

    #[test]
    fn test_aoe_result_has_no_entity() {
        let entry = create_aoe_result(40, "AoE Fireball! Total Damage: 40");
        assert!(entry.is_aoe());
        assert!(entry.entity().is_none());
        assert_eq!(entry.damage(), Some(40));
    }

    #[test]
    fn test_grouping_merges_shared_transaction() {
        let entries = vec![
            create_healing_result(5, "Aria", aria(), Some("healing-123")),
            create_healing_result(7, "Borin", borin(), Some("healing-123")),
        ];
        let grouped = group_combat_results_by_transaction(&entries);

        assert_eq!(grouped.len(), 1);
        let merged = &grouped[0];
        assert_eq!(merged.id, "healing-123");
        assert!(merged.message.contains("Aria"));
        assert!(merged.message.contains("Borin"));
        assert_eq!(merged.healing(), Some(12));
        assert_eq!(merged.timestamp, entries[0].timestamp);
        assert_eq!(merged.target, LogTarget::Batch(vec![aria(), borin()]));
    }

    #[test]
    fn test_grouping_passes_unrelated_entries_through() {
        let entries = vec![
            create_damage_result(4, "Aria", aria(), HitStatus::Hit, None),
            create_healing_result(7, "Borin", borin(), Some("healing-555")),
            create_healing_result(3, "Aria", aria(), None),
        ];
        assert_eq!(group_combat_results_by_transaction(&entries), entries);
    }

    #[test]
    fn test_grouping_keeps_position_of_first_member() {
        let before = create_damage_result(4, "Aria", aria(), HitStatus::Hit, None);
        let after = create_damage_result(9, "Borin", borin(), HitStatus::Hit, None);
        let entries = vec![
            before.clone(),
            create_healing_result(5, "Aria", aria(), Some("healing-9")),
            after.clone(),
            create_healing_result(7, "Borin", borin(), Some("healing-9")),
        ];
        let grouped = group_combat_results_by_transaction(&entries);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0], before);
        assert_eq!(grouped[1].id, "healing-9");
        assert_eq!(grouped[2], after);
    }

    #[test]
    fn test_format_highlights_damage() {
        let html = format_combat_log_message("Hit! 12 damage to Lich. Damage: 12");
        assert_eq!(
            html,
            r#"Hit! 12 damage to Lich. <span class="damage-highlight">Damage: 12</span>"#
        );
    }

    #[test]
    fn test_format_highlights_healing() {
        let html = format_combat_log_message("Healing! 5 healing to Aria, 7 healing to Borin");
        assert!(html.contains(r#"<span class="healing-highlight">5 healing</span>"#));
        assert!(html.contains(r#"<span class="healing-highlight">7 healing</span>"#));
    }

    #[test]
    fn test_format_breaks_aoe_lines() {
        let html = format_combat_log_message(
            "AoE Fireball! Total Damage: 18 to characters - Aria Damage: 12; Borin Damage: 6",
        );
        assert!(html.contains(r#"<span class="damage-highlight">Total Damage: 18</span>"#));
        assert!(html.contains("to characters - <br/>Aria"));
        assert!(html.contains(";<br/>Borin"));
    }

    #[test]
    fn test_format_escapes_html() {
        let html = format_combat_log_message("Hit! 3 damage to <Bob & 'Co'>");
        assert_eq!(html, "Hit! 3 damage to &lt;Bob &amp; &#39;Co&#39;&gt;");
    }
}

//! Combat log entries
//!
//! Entries are immutable once created. The target is a variant rather than
//! a set of optional foreign keys, so an entry can only ever point at one
//! kind of thing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityRef;

/// How an attack landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitStatus {
    #[default]
    Hit,
    CriticalHit,
    Miss,
}

impl HitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hit => "Hit",
            Self::CriticalHit => "Critical hit",
            Self::Miss => "Miss",
        }
    }
}

/// What a log entry is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "targets", rename_all = "camelCase")]
pub enum LogTarget {
    Entity(EntityRef),
    /// An area effect summary covering the whole batch
    Area,
    /// Several entities merged into one displayed entry
    Batch(Vec<EntityRef>),
}

/// The HP change an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogEffect {
    Damage { amount: i32, hit_status: HitStatus },
    Healing { amount: i32 },
}

/// One line of the combat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatLogEntry {
    pub id: String,
    pub target: LogTarget,
    pub effect: LogEffect,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl CombatLogEntry {
    pub fn is_aoe(&self) -> bool {
        matches!(self.target, LogTarget::Area)
    }

    pub fn damage(&self) -> Option<i32> {
        match self.effect {
            LogEffect::Damage { amount, .. } => Some(amount),
            LogEffect::Healing { .. } => None,
        }
    }

    pub fn healing(&self) -> Option<i32> {
        match self.effect {
            LogEffect::Healing { amount } => Some(amount),
            LogEffect::Damage { .. } => None,
        }
    }

    /// The single entity this entry targets, if it targets exactly one
    pub fn entity(&self) -> Option<&EntityRef> {
        match &self.target {
            LogTarget::Entity(entity) => Some(entity),
            LogTarget::Area | LogTarget::Batch(_) => None,
        }
    }
}

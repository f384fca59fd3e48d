//! Persisted encounter snapshot DTOs
//!
//! The JSON layout is the contract with the storage wrapper and with files
//! exported from earlier sessions: top-level `characters`, `bosses` and
//! `enemyGroups` arrays. A missing array means "this file says nothing
//! about that entity type", which import treats differently from an empty one.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Boss, Character, EnemyGroup};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<Character>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bosses: Option<Vec<Boss>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_groups: Option<Vec<EnemyGroup>>,
}

/// Which entities of one type to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSelection {
    pub include: bool,
    /// Allow-list of ids; empty means every entity of the type
    #[serde(default)]
    pub ids: Vec<String>,
}

impl TypeSelection {
    pub fn all() -> Self {
        Self {
            include: true,
            ids: Vec::new(),
        }
    }

    pub fn none() -> Self {
        Self {
            include: false,
            ids: Vec::new(),
        }
    }

    pub fn only(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            include: true,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn selects(&self, id: &str) -> bool {
        self.include && (self.ids.is_empty() || self.ids.iter().any(|allowed| allowed == id))
    }
}

impl Default for TypeSelection {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub characters: TypeSelection,
    #[serde(default)]
    pub bosses: TypeSelection,
    #[serde(default)]
    pub enemy_groups: TypeSelection,
}

/// How imported entities of one type combine with the live roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Upsert by id, keeping live entities the file does not mention
    #[default]
    Merge,
    /// The file's list becomes the roster for this type
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeImport {
    pub include: bool,
    #[serde(default)]
    pub mode: ImportMode,
    /// When the file has no array for this type: wipe the live entities (true) or keep them
    #[serde(default)]
    pub clear_missing: bool,
}

impl Default for TypeImport {
    fn default() -> Self {
        Self {
            include: true,
            mode: ImportMode::Merge,
            clear_missing: false,
        }
    }
}

impl TypeImport {
    pub fn replace() -> Self {
        Self {
            mode: ImportMode::Replace,
            ..Self::default()
        }
    }

    pub fn skip() -> Self {
        Self {
            include: false,
            ..Self::default()
        }
    }

    pub fn clearing_missing(mut self) -> Self {
        self.clear_missing = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    #[serde(default)]
    pub characters: TypeImport,
    #[serde(default)]
    pub bosses: TypeImport,
    #[serde(default)]
    pub enemy_groups: TypeImport,
}

//! Encounter Aggregate - The root aggregate for one tracked combat
//!
//! The aggregate is the single owner of encounter state: the roster, the
//! combat log and the turn-order bookkeeping. Callers own it and hand it to
//! the application services by reference; nothing reads ambient state.

use crate::domain::entities::{
    Boss, Character, CombatLogEntry, Combatant, EnemyGroup, EnemyGroupTemplate, EntityRef,
};
use crate::domain::services::{normalize_boss, normalize_character, normalize_enemy_group};
use crate::domain::value_objects::{BossId, CharacterId, EngineSettings, GroupId, TemplateId};

/// Manual ordering and progress through the initiative list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    /// Row keys in manual order; used to break initiative ties
    pub sequence: Vec<String>,
    pub round: u32,
    /// Key of the row whose turn it is
    pub active_row: Option<String>,
    /// Where the active row sat when its turn began
    pub active_position: Option<usize>,
}

/// The Encounter Aggregate Root
#[derive(Debug, Clone, Default)]
pub struct EncounterAggregate {
    settings: EngineSettings,
    characters: Vec<Character>,
    bosses: Vec<Boss>,
    enemy_groups: Vec<EnemyGroup>,
    templates: Vec<EnemyGroupTemplate>,
    combat_log: Vec<CombatLogEntry>,
    turn_state: TurnState,
}

impl EncounterAggregate {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn bosses(&self) -> &[Boss] {
        &self.bosses
    }

    pub fn enemy_groups(&self) -> &[EnemyGroup] {
        &self.enemy_groups
    }

    pub fn templates(&self) -> &[EnemyGroupTemplate] {
        &self.templates
    }

    /// Log entries, oldest first
    pub fn combat_log(&self) -> &[CombatLogEntry] {
        &self.combat_log
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn_state
    }

    pub fn turn_state_mut(&mut self) -> &mut TurnState {
        &mut self.turn_state
    }

    /// Every combatant in roster order: characters, bosses, then groups
    pub fn combatants(&self) -> impl Iterator<Item = &dyn Combatant> {
        self.characters
            .iter()
            .map(|c| c as &dyn Combatant)
            .chain(self.bosses.iter().map(|b| b as &dyn Combatant))
            .chain(self.enemy_groups.iter().map(|g| g as &dyn Combatant))
    }

    pub fn combatants_mut(&mut self) -> impl Iterator<Item = &mut dyn Combatant> {
        self.characters
            .iter_mut()
            .map(|c| c as &mut dyn Combatant)
            .chain(self.bosses.iter_mut().map(|b| b as &mut dyn Combatant))
            .chain(self.enemy_groups.iter_mut().map(|g| g as &mut dyn Combatant))
    }

    // ========================================================================
    // Finders
    // ========================================================================

    pub fn find_character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    pub fn find_character_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| &c.id == id)
    }

    pub fn find_boss(&self, id: &BossId) -> Option<&Boss> {
        self.bosses.iter().find(|b| &b.id == id)
    }

    pub fn find_boss_mut(&mut self, id: &BossId) -> Option<&mut Boss> {
        self.bosses.iter_mut().find(|b| &b.id == id)
    }

    pub fn find_group(&self, id: &GroupId) -> Option<&EnemyGroup> {
        self.enemy_groups.iter().find(|g| &g.id == id)
    }

    pub fn find_group_mut(&mut self, id: &GroupId) -> Option<&mut EnemyGroup> {
        self.enemy_groups.iter_mut().find(|g| &g.id == id)
    }

    pub fn find_template(&self, id: &TemplateId) -> Option<&EnemyGroupTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    pub fn combatant(&self, entity: &EntityRef) -> Option<&dyn Combatant> {
        match entity {
            EntityRef::Character(id) => self.find_character(id).map(|c| c as &dyn Combatant),
            EntityRef::Boss(id) => self.find_boss(id).map(|b| b as &dyn Combatant),
            EntityRef::Group(id) => self.find_group(id).map(|g| g as &dyn Combatant),
        }
    }

    pub fn combatant_mut(&mut self, entity: &EntityRef) -> Option<&mut dyn Combatant> {
        match entity {
            EntityRef::Character(id) => self.find_character_mut(id).map(|c| c as &mut dyn Combatant),
            EntityRef::Boss(id) => self.find_boss_mut(id).map(|b| b as &mut dyn Combatant),
            EntityRef::Group(id) => self.find_group_mut(id).map(|g| g as &mut dyn Combatant),
        }
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.combatant(entity).is_some()
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Add a character to the roster
    ///
    /// # Invariants
    /// - Character name must not be empty
    /// - HP is clamped into `[0, max_hp]`
    pub fn add_character(&mut self, character: Character) -> Result<EntityRef, AggregateError> {
        validate_name(&character.name)?;
        let character = normalize_character(character);
        let entity = character.entity_ref();
        self.characters.push(character);
        Ok(entity)
    }

    /// Add a boss to the roster; attacks are normalized on the way in
    pub fn add_boss(&mut self, boss: Boss) -> Result<EntityRef, AggregateError> {
        validate_name(&boss.name)?;
        let boss = normalize_boss(boss);
        let entity = boss.entity_ref();
        self.bosses.push(boss);
        Ok(entity)
    }

    /// Add an enemy group to the roster
    ///
    /// # Invariants
    /// - `0 <= count <= original_count`
    pub fn add_enemy_group(&mut self, group: EnemyGroup) -> Result<EntityRef, AggregateError> {
        validate_name(&group.name)?;
        let group = normalize_enemy_group(group);
        let entity = group.entity_ref();
        self.enemy_groups.push(group);
        Ok(entity)
    }

    pub fn add_template(&mut self, template: EnemyGroupTemplate) -> Result<TemplateId, AggregateError> {
        validate_name(&template.name)?;
        let id = template.id.clone();
        self.templates.push(template);
        Ok(id)
    }

    /// Remove any combatant; `None` when it was already gone
    pub fn remove(&mut self, entity: &EntityRef) -> Option<EntityRef> {
        let removed = match entity {
            EntityRef::Character(id) => remove_where(&mut self.characters, |c| &c.id == id),
            EntityRef::Boss(id) => remove_where(&mut self.bosses, |b| &b.id == id),
            EntityRef::Group(id) => remove_where(&mut self.enemy_groups, |g| &g.id == id),
        };
        removed.then(|| entity.clone())
    }

    pub fn remove_template(&mut self, id: &TemplateId) -> bool {
        remove_where(&mut self.templates, |t| &t.id == id)
    }

    /// Append a log entry, dropping the oldest beyond the configured cap
    pub fn push_log(&mut self, entry: CombatLogEntry) {
        self.combat_log.push(entry);
        let cap = self.settings.max_log_entries.max(1);
        if self.combat_log.len() > cap {
            let excess = self.combat_log.len() - cap;
            self.combat_log.drain(..excess);
        }
    }

    pub fn extend_log(&mut self, entries: impl IntoIterator<Item = CombatLogEntry>) {
        for entry in entries {
            self.push_log(entry);
        }
    }

    pub fn clear_log(&mut self) {
        self.combat_log.clear();
    }

    // ========================================================================
    // Bulk Loading
    // ========================================================================

    /// Replace the characters (snapshot hydration); entries are normalized
    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.set_characters(characters);
        self
    }

    pub fn with_bosses(mut self, bosses: Vec<Boss>) -> Self {
        self.set_bosses(bosses);
        self
    }

    pub fn with_enemy_groups(mut self, groups: Vec<EnemyGroup>) -> Self {
        self.set_enemy_groups(groups);
        self
    }

    pub fn set_characters(&mut self, characters: Vec<Character>) {
        self.characters = characters.into_iter().map(normalize_character).collect();
    }

    pub fn set_bosses(&mut self, bosses: Vec<Boss>) {
        self.bosses = bosses.into_iter().map(normalize_boss).collect();
    }

    pub fn set_enemy_groups(&mut self, groups: Vec<EnemyGroup>) {
        self.enemy_groups = groups.into_iter().map(normalize_enemy_group).collect();
    }
}

/// Names must contain something other than whitespace
pub fn validate_name(name: &str) -> Result<(), AggregateError> {
    if name.trim().is_empty() {
        return Err(AggregateError::ValidationError(
            "Combatant name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn remove_where<T>(items: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> bool {
    if let Some(pos) = items.iter().position(predicate) {
        items.remove(pos);
        true
    } else {
        false
    }
}

/// Errors that can occur when modifying the aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// A validation rule was violated
    #[error("Validation error: {0}")]
    ValidationError(String),
}

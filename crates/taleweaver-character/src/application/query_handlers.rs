//! Query handlers for the Character Management context.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs.

use std::collections::BTreeMap;

use serde::Serialize;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::leveling::{LevelReward, LevelingConfig};

/// Read-only view of a character aggregate.
#[derive(Debug, Serialize)]
pub struct CharacterView {
    /// The character identifier.
    pub character_id: Uuid,
    /// The character name.
    pub name: String,
    /// Stat name to value.
    pub stats: BTreeMap<String, u32>,
    /// Current level.
    pub level: u32,
    /// Accumulated experience.
    pub xp: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Maximum magic.
    pub max_magic: u32,
    /// Levels at which an ability was picked.
    pub ability_picks: Vec<u32>,
    /// Whether a level-up is waiting.
    pub can_level_up: bool,
    /// The reward the next level-up grants, so the caller knows whether to
    /// ask for a choice.
    pub next_reward: Option<LevelReward>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a character by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no character was created
/// under the ID. Returns `DomainError::Infrastructure` if event
/// deserialization fails.
pub async fn get_character_by_id(
    character_id: Uuid,
    leveling: &LevelingConfig,
    repo: &dyn EventRepository,
) -> Result<CharacterView, DomainError> {
    let stored_events = repo.load_events(character_id).await?;
    let character = command_handlers::reconstitute(character_id, &stored_events)?;
    let sheet = character
        .sheet()
        .ok_or(DomainError::AggregateNotFound(character_id))?;

    let can_level_up = leveling.can_level_up(sheet);
    Ok(CharacterView {
        character_id,
        name: character.name.clone().unwrap_or_default(),
        stats: sheet.stats.clone(),
        level: sheet.level,
        xp: sheet.xp,
        max_health: sheet.max_health,
        max_magic: sheet.max_magic,
        ability_picks: sheet.ability_picks.clone(),
        can_level_up,
        next_reward: leveling
            .next_reward(sheet)
            .filter(|_| can_level_up)
            .cloned(),
        version: character.version,
    })
}

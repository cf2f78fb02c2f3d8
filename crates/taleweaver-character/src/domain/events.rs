//! Domain events for the Character Management context.

use serde::{Deserialize, Serialize};
use taleweaver_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

use super::leveling::AppliedReward;
use super::sheet::CharacterSheet;

/// Event type identifier for [`CharacterCreated`].
pub const CHARACTER_CREATED_EVENT_TYPE: &str = "character.character_created";
/// Event type identifier for [`ExperienceAwarded`].
pub const EXPERIENCE_AWARDED_EVENT_TYPE: &str = "character.experience_awarded";
/// Event type identifier for [`LevelGained`].
pub const LEVEL_GAINED_EVENT_TYPE: &str = "character.level_gained";

/// Emitted when a new character is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCreated {
    /// The character identifier.
    pub character_id: Uuid,
    /// The character name.
    pub name: String,
    /// The level-1 sheet.
    pub sheet: CharacterSheet,
}

/// Emitted when experience is awarded to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceAwarded {
    /// The character identifier.
    pub character_id: Uuid,
    /// The amount of experience awarded.
    pub amount: u32,
    /// Accumulated experience after the award.
    pub total_xp: u32,
}

/// Emitted when a character advances one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGained {
    /// The character identifier.
    pub character_id: Uuid,
    /// The level reached.
    pub level: u32,
    /// The reward applied, if the level has one.
    pub reward: Option<AppliedReward>,
}

/// Event payload variants for the Character Management context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterEventKind {
    /// A character was created.
    CharacterCreated(CharacterCreated),
    /// Experience was awarded.
    ExperienceAwarded(ExperienceAwarded),
    /// A level was gained.
    LevelGained(LevelGained),
}

/// Domain event envelope for the Character Management context.
#[derive(Debug, Clone)]
pub struct CharacterEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CharacterEventKind,
}

impl DomainEvent for CharacterEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            CharacterEventKind::CharacterCreated(_) => CHARACTER_CREATED_EVENT_TYPE,
            CharacterEventKind::ExperienceAwarded(_) => EXPERIENCE_AWARDED_EVENT_TYPE,
            CharacterEventKind::LevelGained(_) => LEVEL_GAINED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("CharacterEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

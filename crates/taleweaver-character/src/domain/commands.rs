//! Commands for the Character Management context.

use std::collections::BTreeMap;

use taleweaver_core::command::Command;
use uuid::Uuid;

/// Command to create a new character.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character identifier.
    pub character_id: Uuid,
    /// The character name.
    pub name: String,
    /// Starting stat allocation.
    pub stats: BTreeMap<String, u32>,
}

impl Command for CreateCharacter {
    fn command_type(&self) -> &'static str {
        "character.create_character"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to award experience to a character.
#[derive(Debug, Clone)]
pub struct AwardExperience {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character identifier.
    pub character_id: Uuid,
    /// The amount of experience to award.
    pub amount: u32,
}

impl Command for AwardExperience {
    fn command_type(&self) -> &'static str {
        "character.award_experience"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to advance a character one level.
#[derive(Debug, Clone)]
pub struct LevelUp {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character identifier.
    pub character_id: Uuid,
    /// Stat name, or `magic`/`ability`, when the reward needs a choice.
    pub choice: Option<String>,
}

impl Command for LevelUp {
    fn command_type(&self) -> &'static str {
        "character.level_up"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

//! Aggregate roots for the Character Management context.

use std::collections::BTreeMap;

use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::event::EventMetadata;
use tracing::warn;
use uuid::Uuid;

use super::events::{
    CHARACTER_CREATED_EVENT_TYPE, CharacterCreated, CharacterEvent, CharacterEventKind,
    EXPERIENCE_AWARDED_EVENT_TYPE, ExperienceAwarded, LEVEL_GAINED_EVENT_TYPE, LevelGained,
};
use super::leveling::resolve_level_up;
use super::rules::CharacterRules;
use super::sheet::CharacterSheet;

/// The aggregate root for a player character.
#[derive(Debug)]
pub struct Character {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Character name.
    pub name: Option<String>,
    sheet: Option<CharacterSheet>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<CharacterEvent>,
}

impl Character {
    /// Creates a new, empty character aggregate.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            name: None,
            sheet: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// The sheet, once created.
    #[must_use]
    pub fn sheet(&self) -> Option<&CharacterSheet> {
        self.sheet.as_ref()
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(
        &mut self,
        event_type: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
        kind: CharacterEventKind,
    ) {
        let event = CharacterEvent {
            metadata: EventMetadata::new(
                event_type,
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn created_sheet(&self) -> Result<&CharacterSheet, DomainError> {
        self.sheet.as_ref().ok_or_else(|| {
            DomainError::State(format!("character {} has not been created", self.id))
        })
    }

    /// Creates the character from a starting allocation, producing a
    /// `CharacterCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the character already exists, or
    /// `DomainError::Validation` if the allocation breaks the stat rules.
    pub fn create(
        &mut self,
        name: String,
        stats: BTreeMap<String, u32>,
        rules: &CharacterRules,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.sheet.is_some() {
            return Err(DomainError::State(format!(
                "character {} already exists",
                self.id
            )));
        }
        rules.stats.validate_allocation(&stats)?;

        let sheet = CharacterSheet::new(stats, rules.health.starting, rules.magic.starting);
        let kind = CharacterEventKind::CharacterCreated(CharacterCreated {
            character_id: self.id,
            name,
            sheet,
        });
        self.record(CHARACTER_CREATED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }

    /// Awards experience, producing an `ExperienceAwarded` event. Levels are
    /// not gained automatically; see [`Self::level_up`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the character does not exist, or
    /// `DomainError::Validation` if the total would overflow.
    pub fn award_experience(
        &mut self,
        amount: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let total_xp = self
            .created_sheet()?
            .xp
            .checked_add(amount)
            .ok_or_else(|| DomainError::Validation("experience total overflows".to_owned()))?;

        let kind = CharacterEventKind::ExperienceAwarded(ExperienceAwarded {
            character_id: self.id,
            amount,
            total_xp,
        });
        self.record(EXPERIENCE_AWARDED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }

    /// Advances one level and applies its reward, producing a `LevelGained`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the character does not exist or the
    /// level-up is refused, or `DomainError::Config` if the leveling table is
    /// invalid.
    pub fn level_up(
        &mut self,
        choice: Option<&str>,
        rules: &CharacterRules,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let sheet = self.created_sheet()?;
        let level_up = resolve_level_up(sheet, rules, choice).map_err(|err| {
            warn!(character_id = %self.id, %err, "level-up rejected");
            err
        })?;

        let kind = CharacterEventKind::LevelGained(LevelGained {
            character_id: self.id,
            level: level_up.sheet.level,
            reward: level_up.reward,
        });
        self.record(LEVEL_GAINED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }
}

impl AggregateRoot for Character {
    type Event = CharacterEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            CharacterEventKind::CharacterCreated(payload) => {
                self.name = Some(payload.name.clone());
                self.sheet = Some(payload.sheet.clone());
            }
            CharacterEventKind::ExperienceAwarded(payload) => {
                if let Some(sheet) = &mut self.sheet {
                    sheet.xp = payload.total_xp;
                }
            }
            CharacterEventKind::LevelGained(payload) => {
                if let Some(sheet) = &mut self.sheet {
                    sheet.level = payload.level;
                    if let Some(reward) = &payload.reward {
                        reward.apply_to(sheet, payload.level);
                    }
                }
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

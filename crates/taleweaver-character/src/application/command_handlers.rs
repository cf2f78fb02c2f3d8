//! Command handlers for the Character Management context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Character;
use crate::domain::commands::{AwardExperience, CreateCharacter, LevelUp};
use crate::domain::events::{CharacterEvent, CharacterEventKind};
use crate::domain::rules::CharacterRules;

/// Reconstitutes a `Character` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    character_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Character, DomainError> {
    let mut character = Character::new(character_id);
    for stored in existing_events {
        let kind: CharacterEventKind = stored.decode_payload()?;
        character.apply(&CharacterEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(character)
}

async fn load(character_id: Uuid, repo: &dyn EventRepository) -> Result<Character, DomainError> {
    let existing_events = repo.load_events(character_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(character_id));
    }
    reconstitute(character_id, &existing_events)
}

async fn persist(
    character: &Character,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = character
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    repo.append_events(character.id, character.version, &stored_events)
        .await?;

    Ok(stored_events)
}

/// Handles the `CreateCharacter` command: checks the allocation against the
/// campaign's rules, creates the aggregate, and persists the resulting
/// events.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank or the allocation
/// is illegal, `DomainError::State` if the character already exists, or any
/// error from event loading or appending.
#[instrument(skip_all, fields(character_id = %command.character_id))]
pub async fn handle_create_character(
    command: &CreateCharacter,
    rules: &CharacterRules,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let name = command.name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation(
            "character name must not be empty".into(),
        ));
    }

    let existing_events = repo.load_events(command.character_id).await?;
    let mut character = reconstitute(command.character_id, &existing_events)?;

    character.create(
        name.to_owned(),
        command.stats.clone(),
        rules,
        command.correlation_id,
        clock,
    )?;

    let stored_events = persist(&character, repo).await?;
    info!(correlation_id = %command.correlation_id, "character created");
    Ok(stored_events)
}

/// Handles the `AwardExperience` command: reconstitutes the aggregate, awards
/// experience, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the amount is zero,
/// `DomainError::AggregateNotFound` if the character does not exist, or any
/// error from event loading or appending.
#[instrument(skip_all, fields(character_id = %command.character_id))]
pub async fn handle_award_experience(
    command: &AwardExperience,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    if command.amount == 0 {
        return Err(DomainError::Validation(
            "experience amount must be greater than zero".into(),
        ));
    }

    let mut character = load(command.character_id, repo).await?;

    character.award_experience(command.amount, command.correlation_id, clock)?;

    let stored_events = persist(&character, repo).await?;
    info!(
        correlation_id = %command.correlation_id,
        amount = command.amount,
        "experience awarded"
    );
    Ok(stored_events)
}

/// Handles the `LevelUp` command: reconstitutes the aggregate, resolves one
/// level against the rules, and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the character does not exist,
/// `DomainError::State` if the level-up is refused (nothing is written),
/// `DomainError::Config` if the leveling table is invalid, or any error from
/// event loading or appending.
#[instrument(skip_all, fields(character_id = %command.character_id))]
pub async fn handle_level_up(
    command: &LevelUp,
    rules: &CharacterRules,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut character = load(command.character_id, repo).await?;

    character.level_up(
        command.choice.as_deref(),
        rules,
        command.correlation_id,
        clock,
    )?;

    let stored_events = persist(&character, repo).await?;
    info!(correlation_id = %command.correlation_id, "level gained");
    Ok(stored_events)
}

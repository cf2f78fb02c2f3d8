//! Command handlers for the Session & Progress context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.
//! Runs read the published campaign they play from the same repository.

use taleweaver_content::application::query_handlers::get_published_content;
use taleweaver_content::domain::campaign::CampaignContent;
use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::CampaignRun;
use crate::domain::commands::{CompleteEpisode, StartCampaignRun, StartEpisode};
use crate::domain::events::{SessionEvent, SessionEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a `CampaignRun` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    run_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<CampaignRun, DomainError> {
    let mut run = CampaignRun::new(run_id);
    for stored in existing_events {
        let kind: SessionEventKind = stored.decode_payload()?;
        run.apply(&SessionEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(run)
}

/// Loads an existing run and the published content it plays.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the run does not exist, or
/// any error from loading the campaign.
pub(crate) async fn load_run(
    run_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<(CampaignRun, CampaignContent), DomainError> {
    let existing_events = repo.load_events(run_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(run_id));
    }
    let run = reconstitute(run_id, &existing_events)?;
    let campaign_id = run.campaign_id().ok_or_else(|| {
        DomainError::Infrastructure(format!("campaign run {run_id} has no start event"))
    })?;
    let content = get_published_content(campaign_id, repo).await?;
    Ok((run, content))
}

async fn persist(
    run: &CampaignRun,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = run
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    repo.append_events(run.id, run.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: run.id,
        stored_events,
    })
}

/// Handles the `StartCampaignRun` command: creates a new run of a published
/// campaign and persists the resulting event.
///
/// This is a creation command; the handler generates the `run_id`.
///
/// # Errors
///
/// Returns `DomainError::State` if the campaign is not published,
/// `DomainError::AggregateNotFound` if it does not exist, or any error from
/// event appending.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_start_campaign_run(
    command: &StartCampaignRun,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let content = get_published_content(command.campaign_id, repo).await?;
    let mut run = CampaignRun::new(Uuid::new_v4());

    run.start(command.campaign_id, &content, command.correlation_id, clock)?;

    let result = persist(&run, repo).await?;
    info!(correlation_id = %command.correlation_id, run_id = %run.id, "campaign run started");
    Ok(result)
}

/// Handles the `StartEpisode` command: loads the run, begins the selected
/// episode, and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError::State` if the selection cannot be played now or an
/// episode is already in progress, or any error from loading or appending.
#[instrument(skip_all, fields(run_id = %command.run_id))]
pub async fn handle_start_episode(
    command: &StartEpisode,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let (mut run, content) = load_run(command.run_id, repo).await?;

    run.start_episode(
        command.selection.clone(),
        &content,
        command.correlation_id,
        clock,
    )?;

    let result = persist(&run, repo).await?;
    info!(correlation_id = %command.correlation_id, selection = ?command.selection, "episode started");
    Ok(result)
}

/// Handles the `CompleteEpisode` command: loads the run, resolves the whole
/// progression update, and persists it as a single event in a single append.
///
/// # Errors
///
/// Returns `DomainError::State` if no episode is in progress or the hit beat
/// cannot be completed, `DomainError::Config` for malformed content,
/// `DomainError::ConcurrencyConflict` if another update won the race, or
/// any error from loading or appending.
#[instrument(skip_all, fields(run_id = %command.run_id))]
pub async fn handle_complete_episode(
    command: &CompleteEpisode,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let (mut run, content) = load_run(command.run_id, repo).await?;

    run.complete_episode(
        command.result,
        command.beat_hit.clone(),
        command.facts_learned.clone(),
        &content,
        command.correlation_id,
        clock,
    )?;

    let result = persist(&run, repo).await?;
    info!(
        correlation_id = %command.correlation_id,
        result = ?command.result,
        beat_hit = ?command.beat_hit,
        "episode completed"
    );
    Ok(result)
}

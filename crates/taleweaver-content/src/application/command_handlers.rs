//! Command handlers for the Content Authoring context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Campaign;
use crate::domain::commands::{PublishCampaign, SaveDraft};
use crate::domain::events::{ContentEvent, ContentEventKind};
use crate::domain::limits::AuthoringLimits;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct ContentCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a `Campaign` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    campaign_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Campaign, DomainError> {
    let mut campaign = Campaign::new(campaign_id);
    for stored in existing_events {
        let kind: ContentEventKind = stored.decode_payload()?;
        campaign.apply(&ContentEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(campaign)
}

async fn persist(
    campaign: &Campaign,
    repo: &dyn EventRepository,
) -> Result<ContentCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = campaign
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    repo.append_events(campaign.id, campaign.version(), &stored_events)
        .await?;

    Ok(ContentCommandResult {
        aggregate_id: campaign.id,
        stored_events,
    })
}

/// Handles the `SaveDraft` command: loads the campaign (starting a new one
/// if the stream is empty), saves the draft, and persists the event.
///
/// # Errors
///
/// Returns `DomainError::ValidationFailed` if the beat graph is broken,
/// `DomainError::State` if the campaign is published, or any error from
/// event loading or appending.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_save_draft(
    command: &SaveDraft,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<ContentCommandResult, DomainError> {
    let existing_events = repo.load_events(command.campaign_id).await?;
    let mut campaign = reconstitute(command.campaign_id, &existing_events)?;

    campaign.save_draft(command.content.clone(), command.correlation_id, clock)?;

    let result = persist(&campaign, repo).await?;
    info!(correlation_id = %command.correlation_id, "draft saved");
    Ok(result)
}

/// Handles the `PublishCampaign` command: loads the campaign, validates and
/// publishes its latest draft, and persists the event.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the campaign does not exist,
/// `DomainError::ValidationFailed` listing every violation, or
/// `DomainError::State` if it is already published.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_publish_campaign(
    command: &PublishCampaign,
    limits: &AuthoringLimits,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<ContentCommandResult, DomainError> {
    let existing_events = repo.load_events(command.campaign_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.campaign_id));
    }
    let mut campaign = reconstitute(command.campaign_id, &existing_events)?;

    campaign.publish(limits, command.correlation_id, clock)?;

    let result = persist(&campaign, repo).await?;
    info!(correlation_id = %command.correlation_id, "campaign published");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use taleweaver_core::error::DomainError;
    use taleweaver_core::repository::StoredEvent;
    use taleweaver_test_support::{FailingEventRepository, InMemoryEventRepository, fixed_clock};
    use uuid::Uuid;

    use super::{handle_publish_campaign, handle_save_draft};
    use crate::domain::beat::Beat;
    use crate::domain::campaign::CampaignContent;
    use crate::domain::commands::{PublishCampaign, SaveDraft};
    use crate::domain::events::{
        CAMPAIGN_PUBLISHED_EVENT_TYPE, ContentEventKind, DRAFT_SAVED_EVENT_TYPE,
    };
    use crate::domain::limits::AuthoringLimits;
    use crate::domain::threat::{AdvancePolicy, Threat};

    fn content() -> CampaignContent {
        let beat = |id: &str| Beat::new(id).with_text("what happens", "what is learned");
        CampaignContent {
            name: "The Rotwood Blight".to_owned(),
            premise: "A sickness spreads through the Brambles.".to_owned(),
            beats: vec![
                beat("first_signs"),
                beat("the_lost_patrol").with_prerequisites(["first_signs"]),
                beat("heart_of_the_rot")
                    .with_prerequisites(["the_lost_patrol"])
                    .as_finale(),
            ],
            threat: Threat::new(
                "The Blight",
                ["The woods are calm", "The rot spreads", "The forest falls"],
                AdvancePolicy::Manual,
            ),
            filler_seeds: (1..=3).map(|n| format!("Wandering encounter {n}")).collect(),
            character_arcs: Vec::new(),
        }
    }

    fn save(campaign_id: Uuid, content: CampaignContent) -> SaveDraft {
        SaveDraft {
            correlation_id: Uuid::new_v4(),
            campaign_id,
            content,
        }
    }

    #[tokio::test]
    async fn test_handle_save_draft_starts_a_new_stream() {
        // Arrange
        let campaign_id = Uuid::new_v4();
        let repo = InMemoryEventRepository::new();
        let command = save(campaign_id, content());

        // Act
        let result = handle_save_draft(&command, &fixed_clock(), &repo).await.unwrap();

        // Assert
        assert_eq!(result.aggregate_id, campaign_id);
        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        let (agg_id, expected_version, events) = &appended[0];
        assert_eq!(*agg_id, campaign_id);
        assert_eq!(*expected_version, 0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, DRAFT_SAVED_EVENT_TYPE);
        assert_eq!(events[0].correlation_id, command.correlation_id);
    }

    #[tokio::test]
    async fn test_handle_publish_campaign_after_two_drafts() {
        // Arrange
        let campaign_id = Uuid::new_v4();
        let clock = fixed_clock();
        let repo = InMemoryEventRepository::new();
        let mut first = content();
        first.beats.truncate(1);
        handle_save_draft(&save(campaign_id, first), &clock, &repo)
            .await
            .unwrap();
        handle_save_draft(&save(campaign_id, content()), &clock, &repo)
            .await
            .unwrap();
        let limits =
            AuthoringLimits::from_yaml_str("filler_seeds: { min: 3, max: 15 }").unwrap();
        let command = PublishCampaign {
            correlation_id: Uuid::new_v4(),
            campaign_id,
        };

        // Act
        let result = handle_publish_campaign(&command, &limits, &clock, &repo)
            .await
            .unwrap();

        // Assert
        let stored: &StoredEvent = &result.stored_events[0];
        assert_eq!(stored.event_type, CAMPAIGN_PUBLISHED_EVENT_TYPE);
        assert_eq!(stored.sequence_number, 3);
        match stored.decode_payload::<ContentEventKind>().unwrap() {
            ContentEventKind::CampaignPublished(payload) => {
                assert_eq!(payload.content_hash, content().content_hash().unwrap());
                assert!(payload.warnings.is_empty());
            }
            other @ ContentEventKind::DraftSaved(_) => {
                panic!("expected CampaignPublished, got {other:?}")
            }
        }
        assert_eq!(repo.appended_events()[2].1, 2);
    }

    #[tokio::test]
    async fn test_handle_publish_campaign_rejects_under_default_limits() {
        // Arrange
        let campaign_id = Uuid::new_v4();
        let clock = fixed_clock();
        let repo = InMemoryEventRepository::new();
        handle_save_draft(&save(campaign_id, content()), &clock, &repo)
            .await
            .unwrap();
        let command = PublishCampaign {
            correlation_id: Uuid::new_v4(),
            campaign_id,
        };

        // Act
        let result =
            handle_publish_campaign(&command, &AuthoringLimits::default(), &clock, &repo).await;

        // Assert
        match result.unwrap_err() {
            DomainError::ValidationFailed(messages) => {
                assert_eq!(
                    messages,
                    vec!["campaign has 3 filler seeds, expected 5 to 15".to_owned()]
                );
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
        assert_eq!(repo.stream(campaign_id).len(), 1);
    }

    #[tokio::test]
    async fn test_handle_publish_campaign_returns_not_found_for_empty_stream() {
        // Arrange
        let campaign_id = Uuid::new_v4();
        let command = PublishCampaign {
            correlation_id: Uuid::new_v4(),
            campaign_id,
        };

        // Act
        let result = handle_publish_campaign(
            &command,
            &AuthoringLimits::default(),
            &fixed_clock(),
            &InMemoryEventRepository::new(),
        )
        .await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, campaign_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_save_draft_propagates_repository_failure() {
        let command = save(Uuid::new_v4(), content());

        let result = handle_save_draft(&command, &fixed_clock(), &FailingEventRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}

//! Query handlers for the Session & Progress context.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs.

use serde::Serialize;
use taleweaver_content::domain::beat::BeatId;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::availability::{
    AvailableContent, available_content, expired_beats, is_campaign_complete,
};
use crate::domain::episode::EpisodeSelection;
use crate::domain::progress::CampaignProgress;

/// Read-only view of a campaign run.
#[derive(Debug, Serialize)]
pub struct CampaignRunView {
    /// The run identifier.
    pub run_id: Uuid,
    /// The campaign being played.
    pub campaign_id: Option<Uuid>,
    /// Hash of the content the run plays.
    pub content_hash: Option<String>,
    /// Current progress.
    pub progress: CampaignProgress,
    /// The episode in progress, if any.
    pub current_episode: Option<EpisodeSelection>,
    /// Current version (event count).
    pub version: i64,
}

/// What the party can do next, plus end-of-campaign signals.
#[derive(Debug, Serialize)]
pub struct AvailableContentView {
    /// Available beats and filler fallback.
    #[serde(flatten)]
    pub available: AvailableContent,
    /// Beats that expired before being played.
    pub expired: Vec<BeatId>,
    /// Whether the campaign has reached an ending.
    pub campaign_complete: bool,
}

/// Retrieves a campaign run by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_run_by_id(
    run_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<CampaignRunView, DomainError> {
    let stored_events = repo.load_events(run_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(run_id));
    }
    let run = command_handlers::reconstitute(run_id, &stored_events)?;
    Ok(CampaignRunView {
        run_id,
        campaign_id: run.campaign_id(),
        content_hash: run.content_hash().map(str::to_owned),
        progress: run.progress().clone(),
        current_episode: run.current_episode().cloned(),
        version: run.version,
    })
}

/// Computes what can be played next in a run.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the run does not exist,
/// `DomainError::Config` if the campaign content is malformed, or any error
/// from loading events.
pub async fn get_available_content(
    run_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<AvailableContentView, DomainError> {
    let (run, content) = command_handlers::load_run(run_id, repo).await?;
    let progress = run.progress();
    Ok(AvailableContentView {
        available: available_content(&content, progress)?,
        expired: expired_beats(&content, progress)
            .into_iter()
            .map(|beat| beat.id.clone())
            .collect(),
        campaign_complete: is_campaign_complete(&content, progress),
    })
}

#[cfg(test)]
mod tests {
    use taleweaver_content::domain::beat::{Beat, BeatId};
    use taleweaver_content::domain::campaign::CampaignContent;
    use taleweaver_content::domain::events::{
        CAMPAIGN_PUBLISHED_EVENT_TYPE, CampaignPublished, ContentEventKind, DRAFT_SAVED_EVENT_TYPE,
        DraftSaved,
    };
    use taleweaver_content::domain::threat::{AdvancePolicy, Threat};
    use taleweaver_core::error::DomainError;
    use taleweaver_core::repository::{EventRepository, StoredEvent};
    use taleweaver_test_support::{InMemoryEventRepository, fixed_clock};
    use uuid::Uuid;

    use super::{get_available_content, get_run_by_id};
    use crate::domain::episode::EpisodeResult;
    use crate::domain::events::{
        CAMPAIGN_RUN_STARTED_EVENT_TYPE, CampaignRunStarted, EPISODE_COMPLETED_EVENT_TYPE,
        EpisodeCompleted, SessionEventKind,
    };

    fn content() -> CampaignContent {
        CampaignContent {
            name: "The Rotwood Blight".to_owned(),
            premise: String::new(),
            beats: vec![
                Beat::new("first_signs").expiring_after(1),
                Beat::new("find_the_scholar").with_prerequisites(["first_signs"]),
                Beat::new("rumours"),
            ],
            threat: Threat::new("The Blight", ["a", "b", "c"], AdvancePolicy::Manual),
            filler_seeds: vec!["escort refugees".to_owned()],
            character_arcs: Vec::new(),
        }
    }

    fn stored<K: serde::Serialize>(
        aggregate_id: Uuid,
        sequence_number: i64,
        event_type: &str,
        kind: &K,
    ) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id,
            event_type: event_type.to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_clock().0,
        }
    }

    async fn seeded(run_id: Uuid, episodes: Vec<EpisodeCompleted>) -> InMemoryEventRepository {
        let repo = InMemoryEventRepository::new();
        let campaign_id = Uuid::new_v4();
        let draft = ContentEventKind::DraftSaved(DraftSaved {
            campaign_id,
            content: content(),
        });
        let published = ContentEventKind::CampaignPublished(CampaignPublished {
            campaign_id,
            content_hash: "abc123".to_owned(),
            warnings: Vec::new(),
        });
        repo.append_events(
            campaign_id,
            0,
            &[
                stored(campaign_id, 1, DRAFT_SAVED_EVENT_TYPE, &draft),
                stored(campaign_id, 2, CAMPAIGN_PUBLISHED_EVENT_TYPE, &published),
            ],
        )
        .await
        .unwrap();

        let mut run_events = vec![stored(
            run_id,
            1,
            CAMPAIGN_RUN_STARTED_EVENT_TYPE,
            &SessionEventKind::CampaignRunStarted(CampaignRunStarted {
                run_id,
                campaign_id,
                content_hash: "abc123".to_owned(),
            }),
        )];
        for (sequence_number, episode) in (2..).zip(episodes) {
            run_events.push(stored(
                run_id,
                sequence_number,
                EPISODE_COMPLETED_EVENT_TYPE,
                &SessionEventKind::EpisodeCompleted(episode),
            ));
        }
        repo.append_events(run_id, 0, &run_events).await.unwrap();
        repo
    }

    fn episode(run_id: Uuid, number: u32, beat_hit: Option<&str>) -> EpisodeCompleted {
        EpisodeCompleted {
            run_id,
            episode_number: number,
            result: EpisodeResult::Victory,
            beat_hit: beat_hit.map(BeatId::new),
            filler_seed: None,
            new_facts: Vec::new(),
            threat_stage: 0,
        }
    }

    #[tokio::test]
    async fn test_get_run_by_id_replays_progress() {
        // Arrange
        let run_id = Uuid::new_v4();
        let first = EpisodeCompleted {
            new_facts: vec!["The Brambles are sick".to_owned()],
            ..episode(run_id, 1, Some("first_signs"))
        };
        let repo = seeded(run_id, vec![first]).await;

        // Act
        let view = get_run_by_id(run_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.run_id, run_id);
        assert_eq!(view.content_hash, Some("abc123".to_owned()));
        assert_eq!(view.progress.episode_count, 1);
        assert_eq!(
            view.progress.completed_beat_ids,
            vec![BeatId::new("first_signs")]
        );
        assert_eq!(
            view.progress.facts_known,
            vec!["The Brambles are sick".to_owned()]
        );
        assert!(view.current_episode.is_none());
        assert_eq!(view.version, 2);
    }

    #[tokio::test]
    async fn test_get_available_content_reports_expired_beats() {
        // Arrange
        let run_id = Uuid::new_v4();
        let repo = seeded(
            run_id,
            vec![
                episode(run_id, 1, Some("rumours")),
                episode(run_id, 2, None),
            ],
        )
        .await;

        // Act
        let view = get_available_content(run_id, &repo).await.unwrap();

        // Assert
        assert!(!view.available.has_content);
        assert_eq!(view.expired, vec![BeatId::new("first_signs")]);
        assert_eq!(view.available.filler.map(|seed| seed.index), Some(0));
        assert!(!view.campaign_complete);
    }

    #[tokio::test]
    async fn test_get_run_by_id_returns_not_found_when_no_events() {
        let run_id = Uuid::new_v4();

        let result = get_run_by_id(run_id, &InMemoryEventRepository::new()).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, run_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}

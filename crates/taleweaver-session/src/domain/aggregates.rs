//! Aggregate roots for the Session & Progress context.

use taleweaver_content::domain::beat::BeatId;
use taleweaver_content::domain::campaign::CampaignContent;
use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::event::EventMetadata;
use tracing::warn;
use uuid::Uuid;

use super::availability::{available_content, is_beat_available};
use super::episode::{
    EpisodeOutcome, EpisodeResult, EpisodeSelection, check_filler_seed, complete_episode,
};
use super::error::ProgressError;
use super::events::{
    CAMPAIGN_RUN_STARTED_EVENT_TYPE, CampaignRunStarted, EPISODE_COMPLETED_EVENT_TYPE,
    EPISODE_STARTED_EVENT_TYPE, EpisodeCompleted, EpisodeStarted, SessionEvent, SessionEventKind,
};
use super::progress::CampaignProgress;

/// The aggregate root for one play-through of a published campaign.
#[derive(Debug)]
pub struct CampaignRun {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    campaign_id: Option<Uuid>,
    content_hash: Option<String>,
    progress: CampaignProgress,
    current_episode: Option<EpisodeSelection>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SessionEvent>,
}

impl CampaignRun {
    /// Creates a run that has not been started.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            campaign_id: None,
            content_hash: None,
            progress: CampaignProgress::new(),
            current_episode: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// The campaign being played, once started.
    #[must_use]
    pub fn campaign_id(&self) -> Option<Uuid> {
        self.campaign_id
    }

    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> &CampaignProgress {
        &self.progress
    }

    /// The episode in progress, if any.
    #[must_use]
    pub fn current_episode(&self) -> Option<&EpisodeSelection> {
        self.current_episode.as_ref()
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
        kind: SessionEventKind,
    ) {
        let event = SessionEvent {
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

    fn ensure_started(&self) -> Result<(), DomainError> {
        if self.campaign_id.is_none() {
            return Err(DomainError::State(format!(
                "campaign run {} has not been started",
                self.id
            )));
        }
        Ok(())
    }

    /// Starts the run against published `content`, producing a
    /// `CampaignRunStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the run was already started, or
    /// `DomainError::Config` if the content cannot be played.
    pub fn start(
        &mut self,
        campaign_id: Uuid,
        content: &CampaignContent,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.campaign_id.is_some() {
            return Err(DomainError::State(format!(
                "campaign run {} has already been started",
                self.id
            )));
        }
        available_content(content, &self.progress)?;

        let kind = SessionEventKind::CampaignRunStarted(CampaignRunStarted {
            run_id: self.id,
            campaign_id,
            content_hash: content.content_hash()?,
        });
        self.record(CAMPAIGN_RUN_STARTED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }

    /// Begins the next episode from an available beat or an unused filler
    /// seed, producing an `EpisodeStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the run is not started, an episode is
    /// already in progress, or the selection cannot be played now.
    /// Returns `DomainError::Config` if the content is malformed.
    pub fn start_episode(
        &mut self,
        selection: EpisodeSelection,
        content: &CampaignContent,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_started()?;
        let episode_number = self.progress.episode_count.saturating_add(1);
        if self.current_episode.is_some() {
            return Err(ProgressError::EpisodeAlreadyInProgress(episode_number).into());
        }
        available_content(content, &self.progress)?;
        match &selection {
            EpisodeSelection::Beat(id) => self.check_beat_playable(id, content)?,
            EpisodeSelection::Filler(index) => {
                check_filler_seed(content, &self.progress, *index)?;
            }
        }

        let kind = SessionEventKind::EpisodeStarted(EpisodeStarted {
            run_id: self.id,
            episode_number,
            selection,
        });
        self.record(EPISODE_STARTED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }

    fn check_beat_playable(
        &self,
        id: &BeatId,
        content: &CampaignContent,
    ) -> Result<(), ProgressError> {
        let beat = content
            .beat(id)
            .ok_or_else(|| ProgressError::UnknownBeat(id.clone()))?;
        if self.progress.has_completed(id) {
            return Err(ProgressError::BeatAlreadyCompleted(id.clone()));
        }
        if !is_beat_available(beat, &self.progress) {
            return Err(ProgressError::BeatUnavailable(id.clone()));
        }
        Ok(())
    }

    /// Ends the episode in progress, producing one `EpisodeCompleted` event
    /// that carries the whole progression update. A filler seed the episode
    /// was started from is spent. An episode started from a beat either hits
    /// that beat or none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if no episode is in progress, the hit
    /// beat is not the one the episode was started for, or it cannot be
    /// completed now. Returns `DomainError::Config` if the content is
    /// malformed.
    pub fn complete_episode(
        &mut self,
        result: EpisodeResult,
        beat_hit: Option<BeatId>,
        facts_learned: Vec<String>,
        content: &CampaignContent,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_started()?;
        let selection = self
            .current_episode
            .as_ref()
            .ok_or(ProgressError::NoEpisodeInProgress)?;
        let filler_seed = match selection {
            EpisodeSelection::Filler(index) => Some(*index),
            EpisodeSelection::Beat(started) => {
                if let Some(hit) = beat_hit.as_ref().filter(|hit| *hit != started) {
                    warn!(run_id = %self.id, %started, %hit, "beat hit does not match episode");
                    return Err(ProgressError::BeatHitMismatch {
                        started: started.clone(),
                        hit: hit.clone(),
                    }
                    .into());
                }
                None
            }
        };
        if let Some(id) = &beat_hit {
            self.check_beat_playable(id, content)?;
        }

        let outcome = EpisodeOutcome {
            result,
            beat_hit,
            filler_seed,
            facts_learned,
        };
        let next = complete_episode(content, &self.progress, &outcome).inspect_err(|err| {
            warn!(run_id = %self.id, error = %err, "episode completion rejected");
        })?;

        let kind = SessionEventKind::EpisodeCompleted(EpisodeCompleted {
            run_id: self.id,
            episode_number: next.episode_count,
            result: outcome.result,
            beat_hit: outcome.beat_hit,
            filler_seed: outcome.filler_seed,
            new_facts: next.facts_known[self.progress.facts_known.len()..].to_vec(),
            threat_stage: next.threat_stage,
        });
        self.record(EPISODE_COMPLETED_EVENT_TYPE, correlation_id, clock, kind);
        Ok(())
    }
}

impl AggregateRoot for CampaignRun {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::CampaignRunStarted(payload) => {
                self.campaign_id = Some(payload.campaign_id);
                self.content_hash = Some(payload.content_hash.clone());
            }
            SessionEventKind::EpisodeStarted(payload) => {
                self.current_episode = Some(payload.selection.clone());
            }
            SessionEventKind::EpisodeCompleted(payload) => {
                let progress = &mut self.progress;
                progress.episode_count = payload.episode_number;
                if let Some(beat) = &payload.beat_hit {
                    progress.complete_beat(beat.clone());
                }
                for fact in &payload.new_facts {
                    progress.learn(fact);
                }
                if let Some(index) = payload.filler_seed {
                    progress.used_filler_indices.insert(index);
                }
                progress.threat_stage = payload.threat_stage;
                self.current_episode = None;
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

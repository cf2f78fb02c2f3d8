//! Domain events for the Session & Progress context.

use serde::{Deserialize, Serialize};
use taleweaver_content::domain::beat::BeatId;
use taleweaver_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

use super::episode::{EpisodeResult, EpisodeSelection};

/// Event type identifier for [`CampaignRunStarted`].
pub const CAMPAIGN_RUN_STARTED_EVENT_TYPE: &str = "session.campaign_run_started";
/// Event type identifier for [`EpisodeStarted`].
pub const EPISODE_STARTED_EVENT_TYPE: &str = "session.episode_started";
/// Event type identifier for [`EpisodeCompleted`].
pub const EPISODE_COMPLETED_EVENT_TYPE: &str = "session.episode_completed";

/// Emitted when a party starts playing a published campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRunStarted {
    /// The run identifier.
    pub run_id: Uuid,
    /// The published campaign being played.
    pub campaign_id: Uuid,
    /// Hash of the content the run was started against.
    pub content_hash: String,
}

/// Emitted when an episode begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStarted {
    /// The run identifier.
    pub run_id: Uuid,
    /// One-based number of the episode.
    pub episode_number: u32,
    /// The beat or filler seed being played.
    pub selection: EpisodeSelection,
}

/// Emitted when an episode ends. Carries the complete progression update
/// so a single append commits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeCompleted {
    /// The run identifier.
    pub run_id: Uuid,
    /// One-based number of the episode; also the new episode count.
    pub episode_number: u32,
    /// How the episode ended.
    pub result: EpisodeResult,
    /// The beat completed, if any.
    pub beat_hit: Option<BeatId>,
    /// The filler seed spent, if any.
    pub filler_seed: Option<usize>,
    /// Facts learned that were not already known.
    pub new_facts: Vec<String>,
    /// Threat stage after the episode.
    pub threat_stage: usize,
}

/// Event payload variants for the Session & Progress context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A campaign run has been started.
    CampaignRunStarted(CampaignRunStarted),
    /// An episode has begun.
    EpisodeStarted(EpisodeStarted),
    /// An episode has ended.
    EpisodeCompleted(EpisodeCompleted),
}

/// Domain event envelope for the Session & Progress context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            SessionEventKind::CampaignRunStarted(_) => CAMPAIGN_RUN_STARTED_EVENT_TYPE,
            SessionEventKind::EpisodeStarted(_) => EPISODE_STARTED_EVENT_TYPE,
            SessionEventKind::EpisodeCompleted(_) => EPISODE_COMPLETED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

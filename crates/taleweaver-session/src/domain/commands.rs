//! Commands for the Session & Progress context.

use taleweaver_content::domain::beat::BeatId;
use taleweaver_core::command::Command;
use uuid::Uuid;

use super::episode::{EpisodeResult, EpisodeSelection};

/// Command to start a new run of a published campaign.
#[derive(Debug, Clone)]
pub struct StartCampaignRun {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The published campaign to play.
    pub campaign_id: Uuid,
}

impl Command for StartCampaignRun {
    fn command_type(&self) -> &'static str {
        "session.start_campaign_run"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to begin the next episode.
#[derive(Debug, Clone)]
pub struct StartEpisode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign run identifier.
    pub run_id: Uuid,
    /// An available beat or an unused filler seed.
    pub selection: EpisodeSelection,
}

impl Command for StartEpisode {
    fn command_type(&self) -> &'static str {
        "session.start_episode"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to finish the episode in progress.
#[derive(Debug, Clone)]
pub struct CompleteEpisode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign run identifier.
    pub run_id: Uuid,
    /// How the episode ended.
    pub result: EpisodeResult,
    /// The beat the party completed, if any.
    pub beat_hit: Option<BeatId>,
    /// Extra facts the party learned.
    pub facts_learned: Vec<String>,
}

impl Command for CompleteEpisode {
    fn command_type(&self) -> &'static str {
        "session.complete_episode"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

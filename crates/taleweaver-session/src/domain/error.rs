//! Errors raised while resolving play-time progression.

use taleweaver_content::domain::beat::BeatId;
use taleweaver_core::error::DomainError;
use thiserror::Error;

/// Why a progression step could not be computed.
///
/// Config-class variants mean the content should never have been
/// published. State-class variants reject one request and leave progress
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("beat {beat} requires unknown beat {prerequisite}")]
    UnknownPrerequisite { beat: BeatId, prerequisite: BeatId },

    #[error("threat has no stages")]
    EmptyThreat,

    #[error("threat advances every 0 episodes")]
    ZeroEpisodeInterval,

    #[error("threat stage {stage} is beyond the last stage {last}")]
    ThreatStageOutOfRange { stage: usize, last: usize },

    #[error("unknown beat {0}")]
    UnknownBeat(BeatId),

    #[error("beat {0} is already completed")]
    BeatAlreadyCompleted(BeatId),

    #[error("beat {0} is not available")]
    BeatUnavailable(BeatId),

    #[error("filler seed {index} does not exist; campaign has {count}")]
    UnknownFillerSeed { index: usize, count: usize },

    #[error("filler seed {0} has already been used")]
    FillerSeedAlreadyUsed(usize),

    #[error("no episode is in progress")]
    NoEpisodeInProgress,

    #[error("episode {0} is already in progress")]
    EpisodeAlreadyInProgress(u32),

    #[error("episode was started for beat {started} but beat {hit} was reported hit")]
    BeatHitMismatch { started: BeatId, hit: BeatId },
}

impl ProgressError {
    /// Whether the error points at broken content rather than a bad request.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownPrerequisite { .. }
                | Self::EmptyThreat
                | Self::ZeroEpisodeInterval
                | Self::ThreatStageOutOfRange { .. }
        )
    }
}

impl From<ProgressError> for DomainError {
    fn from(err: ProgressError) -> Self {
        if err.is_config() {
            Self::Config(err.to_string())
        } else {
            Self::State(err.to_string())
        }
    }
}

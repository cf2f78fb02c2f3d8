//! Threat escalation.
//!
//! The threat is a stage index that only ever moves forward, one step per
//! completed episode at most, and stops at the final stage.

use taleweaver_content::domain::threat::{AdvancePolicy, Threat};
use tracing::debug;

use super::episode::{EpisodeOutcome, EpisodeResult};
use super::error::ProgressError;
use super::progress::CampaignProgress;

/// Whether `policy` calls for escalation after an episode.
///
/// `episode_count` must already include the episode being evaluated.
///
/// # Errors
///
/// Returns `ProgressError::ZeroEpisodeInterval` for `EveryNEpisodes(0)`.
pub fn should_advance(
    policy: AdvancePolicy,
    episode_count: u32,
    outcome: &EpisodeOutcome,
) -> Result<bool, ProgressError> {
    Ok(match policy {
        AdvancePolicy::EachEpisodeUnlessBeatHit => outcome.beat_hit.is_none(),
        AdvancePolicy::OnEpisodeFailure => outcome.result == EpisodeResult::Failure,
        AdvancePolicy::EveryNEpisodes(0) => return Err(ProgressError::ZeroEpisodeInterval),
        AdvancePolicy::EveryNEpisodes(n) => episode_count.is_multiple_of(n),
        AdvancePolicy::Manual => false,
    })
}

/// Applies the threat's policy to one completed episode and returns the
/// updated progress. Advancing at the final stage is a no-op.
///
/// `progress.episode_count` must already include the completed episode.
///
/// # Errors
///
/// Returns a config-class `ProgressError` if the threat has no stages, its
/// interval is zero, or `progress.threat_stage` is already past the end.
pub fn advance_threat(
    progress: &CampaignProgress,
    threat: &Threat,
    outcome: &EpisodeOutcome,
) -> Result<CampaignProgress, ProgressError> {
    let last = threat.last_stage().ok_or(ProgressError::EmptyThreat)?;
    if progress.threat_stage > last {
        return Err(ProgressError::ThreatStageOutOfRange {
            stage: progress.threat_stage,
            last,
        });
    }

    let mut next = progress.clone();
    if should_advance(threat.advance_policy, progress.episode_count, outcome)?
        && next.threat_stage < last
    {
        next.threat_stage += 1;
        debug!(threat = %threat.name, stage = next.threat_stage, "threat advanced");
    }
    Ok(next)
}

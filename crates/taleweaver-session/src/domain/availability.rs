//! Which content a party may play next.

use serde::Serialize;
use taleweaver_content::domain::beat::{Beat, BeatId, UnlockTrigger};
use taleweaver_content::domain::campaign::CampaignContent;
use tracing::debug;

use super::error::ProgressError;
use super::progress::CampaignProgress;

/// A beat the party can start now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableBeat {
    /// Beat identifier.
    pub id: BeatId,
    /// What the episode is about.
    pub description: String,
    /// Whether completing it ends the campaign.
    pub is_finale: bool,
}

/// An unused improvisation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillerSeed {
    /// Position in the authored list. Spending a seed records this index.
    pub index: usize,
    /// The prompt.
    pub text: String,
}

/// What can be played next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableContent {
    /// Whether any beat is available.
    pub has_content: bool,
    /// Available beats in authoring order.
    pub entries: Vec<AvailableBeat>,
    /// Episodes completed so far.
    pub episodes_completed: u32,
    /// Current threat stage.
    pub threat_stage: usize,
    /// Fallback prompt when no beat is available.
    pub filler: Option<FillerSeed>,
}

/// Whether `beat` may be started given `progress`. Assumes the graph itself
/// has already been checked.
#[must_use]
pub fn is_beat_available(beat: &Beat, progress: &CampaignProgress) -> bool {
    if progress.has_completed(&beat.id) || is_expired(beat, progress) {
        return false;
    }
    if !beat.required_beats().all(|required| progress.has_completed(required)) {
        return false;
    }
    match beat.unlock_trigger {
        UnlockTrigger::Start | UnlockTrigger::AfterBeat(_) => true,
        UnlockTrigger::AfterEpisodeCount(count) => progress.episode_count >= count,
        UnlockTrigger::ThreatStage(stage) => progress.threat_stage >= stage,
    }
}

fn is_expired(beat: &Beat, progress: &CampaignProgress) -> bool {
    beat.expires_after_episode
        .is_some_and(|last| progress.episode_count > last)
}

/// Computes every beat that can be started now, plus a filler fallback when
/// there are none.
///
/// # Errors
///
/// Returns a config-class `ProgressError` if a prerequisite does not resolve,
/// the threat has no stages, or `progress.threat_stage` is past the last
/// stage.
pub fn available_content(
    content: &CampaignContent,
    progress: &CampaignProgress,
) -> Result<AvailableContent, ProgressError> {
    check_preconditions(content, progress)?;

    let entries: Vec<AvailableBeat> = content
        .beats
        .iter()
        .filter(|beat| is_beat_available(beat, progress))
        .map(|beat| AvailableBeat {
            id: beat.id.clone(),
            description: beat.description.clone(),
            is_finale: beat.is_finale,
        })
        .collect();
    let has_content = !entries.is_empty();
    let filler = if has_content {
        None
    } else {
        next_filler_seed(content, progress)
    };

    debug!(
        available = entries.len(),
        episode_count = progress.episode_count,
        threat_stage = progress.threat_stage,
        "resolved available content"
    );
    Ok(AvailableContent {
        has_content,
        entries,
        episodes_completed: progress.episode_count,
        threat_stage: progress.threat_stage,
        filler,
    })
}

pub(crate) fn check_preconditions(
    content: &CampaignContent,
    progress: &CampaignProgress,
) -> Result<(), ProgressError> {
    for beat in &content.beats {
        if let Some(missing) = beat
            .required_beats()
            .find(|required| content.beat(required).is_none())
        {
            return Err(ProgressError::UnknownPrerequisite {
                beat: beat.id.clone(),
                prerequisite: missing.clone(),
            });
        }
    }
    let last = content.threat.last_stage().ok_or(ProgressError::EmptyThreat)?;
    if progress.threat_stage > last {
        return Err(ProgressError::ThreatStageOutOfRange {
            stage: progress.threat_stage,
            last,
        });
    }
    Ok(())
}

/// The lowest-indexed filler seed not yet used, or `None` when every seed is
/// spent.
#[must_use]
pub fn next_filler_seed(
    content: &CampaignContent,
    progress: &CampaignProgress,
) -> Option<FillerSeed> {
    content
        .filler_seeds
        .iter()
        .enumerate()
        .find(|(index, _)| !progress.used_filler_indices.contains(index))
        .map(|(index, text)| FillerSeed {
            index,
            text: text.clone(),
        })
}

/// Beats that were never completed and can no longer be offered.
#[must_use]
pub fn expired_beats<'a>(
    content: &'a CampaignContent,
    progress: &CampaignProgress,
) -> Vec<&'a Beat> {
    content
        .beats
        .iter()
        .filter(|beat| !progress.has_completed(&beat.id) && is_expired(beat, progress))
        .collect()
}

/// Whether the run is over: a finale was completed, every beat was
/// completed, or the threat reached its final stage.
#[must_use]
pub fn is_campaign_complete(content: &CampaignContent, progress: &CampaignProgress) -> bool {
    let finale_hit = content
        .beats
        .iter()
        .any(|beat| beat.is_finale && progress.has_completed(&beat.id));
    let all_beats_done = content
        .beats
        .iter()
        .all(|beat| progress.has_completed(&beat.id));
    let threat_maxed = content
        .threat
        .last_stage()
        .is_some_and(|last| progress.threat_stage >= last);

    finale_hit || all_beats_done || threat_maxed
}

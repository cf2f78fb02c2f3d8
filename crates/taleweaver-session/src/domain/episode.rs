//! Completing an episode.
//!
//! One completed episode touches every part of [`CampaignProgress`]: the
//! count, the beat record, the learned facts, the spent filler seeds and
//! the threat. [`complete_episode`] computes all of it as one value so the
//! caller can persist it in one step.

use serde::{Deserialize, Serialize};
use taleweaver_content::domain::beat::BeatId;
use taleweaver_content::domain::campaign::CampaignContent;

use super::error::ProgressError;
use super::progress::CampaignProgress;
use super::threat_machine::advance_threat;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeResult {
    Victory,
    Retreat,
    Failure,
}

/// What an episode was started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EpisodeSelection {
    /// An authored beat.
    Beat(BeatId),
    /// An improvised episode from the filler seed at this index.
    Filler(usize),
}

/// What happened in a completed episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// How the episode ended.
    pub result: EpisodeResult,
    /// The beat the party completed, if any.
    pub beat_hit: Option<BeatId>,
    /// The filler seed the episode was improvised from, if any.
    pub filler_seed: Option<usize>,
    /// Extra facts the party learned.
    pub facts_learned: Vec<String>,
}

impl EpisodeOutcome {
    /// An outcome with no beat, filler or facts.
    #[must_use]
    pub fn new(result: EpisodeResult) -> Self {
        Self {
            result,
            beat_hit: None,
            filler_seed: None,
            facts_learned: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_beat(mut self, beat: impl Into<String>) -> Self {
        self.beat_hit = Some(BeatId::new(beat));
        self
    }

    #[must_use]
    pub fn with_filler(mut self, index: usize) -> Self {
        self.filler_seed = Some(index);
        self
    }

    #[must_use]
    pub fn with_facts<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facts_learned = facts.into_iter().map(Into::into).collect();
        self
    }
}

/// Returns the progress after one more completed episode.
///
/// # Errors
///
/// Returns a state-class `ProgressError` if the hit beat is unknown or
/// already completed, or the filler seed is unknown or already used. Returns
/// a config-class error if the threat cannot be advanced.
pub fn complete_episode(
    content: &CampaignContent,
    progress: &CampaignProgress,
    outcome: &EpisodeOutcome,
) -> Result<CampaignProgress, ProgressError> {
    let beat = match &outcome.beat_hit {
        Some(id) => {
            let beat = content
                .beat(id)
                .ok_or_else(|| ProgressError::UnknownBeat(id.clone()))?;
            if progress.has_completed(id) {
                return Err(ProgressError::BeatAlreadyCompleted(id.clone()));
            }
            Some(beat)
        }
        None => None,
    };
    if let Some(index) = outcome.filler_seed {
        check_filler_seed(content, progress, index)?;
    }

    let mut next = progress.clone();
    next.episode_count = next.episode_count.saturating_add(1);
    if let Some(beat) = beat {
        next.complete_beat(beat.id.clone());
        next.learn(&beat.revelation);
    }
    for fact in &outcome.facts_learned {
        next.learn(fact);
    }
    if let Some(index) = outcome.filler_seed {
        next.used_filler_indices.insert(index);
    }
    advance_threat(&next, &content.threat, outcome)
}

/// Checks that filler seed `index` exists and is unspent.
///
/// # Errors
///
/// Returns `UnknownFillerSeed` or `FillerSeedAlreadyUsed`.
pub fn check_filler_seed(
    content: &CampaignContent,
    progress: &CampaignProgress,
    index: usize,
) -> Result<(), ProgressError> {
    if index >= content.filler_seeds.len() {
        return Err(ProgressError::UnknownFillerSeed {
            index,
            count: content.filler_seeds.len(),
        });
    }
    if progress.used_filler_indices.contains(&index) {
        return Err(ProgressError::FillerSeedAlreadyUsed(index));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleweaver_content::domain::beat::Beat;
    use taleweaver_content::domain::threat::{AdvancePolicy, Threat};

    fn content() -> CampaignContent {
        CampaignContent {
            name: "The Rotwood Blight".to_owned(),
            premise: String::new(),
            beats: vec![
                Beat::new("first_signs")
                    .with_text("Retrieve bramble-root", "The Brambles are sick"),
                Beat::new("find_the_scholar")
                    .with_text("Find Bramblewick", "There is a shrine")
                    .with_prerequisites(["first_signs"]),
            ],
            threat: Threat::new(
                "The Blight",
                ["a", "b", "c"],
                AdvancePolicy::EachEpisodeUnlessBeatHit,
            ),
            filler_seeds: vec!["escort refugees".to_owned()],
            character_arcs: Vec::new(),
        }
    }

    #[test]
    fn test_beat_hit_records_beat_and_revelation_and_holds_threat() {
        // Arrange
        let outcome = EpisodeOutcome::new(EpisodeResult::Victory)
            .with_beat("first_signs")
            .with_facts(["Thornfeather is hiding something", "The Brambles are sick"]);

        // Act
        let next = complete_episode(&content(), &CampaignProgress::new(), &outcome).unwrap();

        // Assert
        assert_eq!(next.episode_count, 1);
        assert_eq!(next.completed_beat_ids, vec![BeatId::new("first_signs")]);
        assert_eq!(
            next.facts_known,
            vec![
                "The Brambles are sick".to_owned(),
                "Thornfeather is hiding something".to_owned(),
            ]
        );
        assert_eq!(next.threat_stage, 0);
    }

    #[test]
    fn test_filler_episode_spends_seed_and_advances_threat() {
        // Arrange
        let outcome = EpisodeOutcome::new(EpisodeResult::Retreat).with_filler(0);

        // Act
        let next = complete_episode(&content(), &CampaignProgress::new(), &outcome).unwrap();

        // Assert
        assert!(next.used_filler_indices.contains(&0));
        assert_eq!(next.threat_stage, 1);
        assert_eq!(
            complete_episode(&content(), &next, &outcome),
            Err(ProgressError::FillerSeedAlreadyUsed(0))
        );
    }

    #[test]
    fn test_rejections_leave_progress_untouched() {
        let progress = complete_episode(
            &content(),
            &CampaignProgress::new(),
            &EpisodeOutcome::new(EpisodeResult::Victory).with_beat("first_signs"),
        )
        .unwrap();
        let snapshot = progress.clone();

        let again = complete_episode(
            &content(),
            &progress,
            &EpisodeOutcome::new(EpisodeResult::Victory).with_beat("first_signs"),
        );
        let unknown = complete_episode(
            &content(),
            &progress,
            &EpisodeOutcome::new(EpisodeResult::Victory).with_beat("ghost"),
        );
        let no_seed = complete_episode(
            &content(),
            &progress,
            &EpisodeOutcome::new(EpisodeResult::Victory).with_filler(4),
        );

        let first_signs = BeatId::new("first_signs");
        assert_eq!(
            again,
            Err(ProgressError::BeatAlreadyCompleted(first_signs))
        );
        assert_eq!(
            unknown,
            Err(ProgressError::UnknownBeat(BeatId::new("ghost")))
        );
        assert_eq!(
            no_seed,
            Err(ProgressError::UnknownFillerSeed { index: 4, count: 1 })
        );
        assert_eq!(progress, snapshot);
    }
}

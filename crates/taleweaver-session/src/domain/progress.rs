//! Mutable play state for one run through a campaign.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use taleweaver_content::domain::beat::BeatId;

/// How far a party has got. Created empty when a run starts and replaced
/// wholesale after every completed episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    /// Completed beats in the order they were hit.
    pub completed_beat_ids: Vec<BeatId>,
    /// Episodes completed so far.
    pub episode_count: u32,
    /// Index into the threat's stages.
    pub threat_stage: usize,
    /// Filler seeds already spent.
    pub used_filler_indices: BTreeSet<usize>,
    /// Revelations and facts the party has learned, without duplicates.
    pub facts_known: Vec<String>,
}

impl CampaignProgress {
    /// Progress at the start of a fresh run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `beat` has been completed.
    #[must_use]
    pub fn has_completed(&self, beat: &BeatId) -> bool {
        self.completed_beat_ids.contains(beat)
    }

    /// Marks `beat` completed. Completing a beat twice is a no-op.
    pub fn complete_beat(&mut self, beat: BeatId) {
        if !self.has_completed(&beat) {
            self.completed_beat_ids.push(beat);
        }
    }

    /// Records a fact unless it is blank or already known.
    pub fn learn(&mut self, fact: &str) {
        let fact = fact.trim();
        if !fact.is_empty() && !self.facts_known.iter().any(|known| known == fact) {
            self.facts_known.push(fact.to_owned());
        }
    }
}

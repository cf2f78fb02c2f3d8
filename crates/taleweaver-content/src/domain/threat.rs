//! The escalating threat track.

use serde::{Deserialize, Serialize};

/// When the threat advances one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// After every episode in which no beat was hit.
    EachEpisodeUnlessBeatHit,
    /// After every failed episode.
    OnEpisodeFailure,
    /// Whenever the completed-episode count is a multiple of `n`.
    EveryNEpisodes(u32),
    /// Only by game-master override, never automatically.
    Manual,
}

/// The campaign's escalating danger, as an ordered list of narrative stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    /// Display name, e.g. "The Blight".
    pub name: String,
    /// Stage descriptions from calm to catastrophe.
    pub stages: Vec<String>,
    /// Escalation rule.
    pub advance_policy: AdvancePolicy,
}

impl Threat {
    /// Creates a threat track.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, stages: I, advance_policy: AdvancePolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            stages: stages.into_iter().map(Into::into).collect(),
            advance_policy,
        }
    }

    /// Index of the final stage, or `None` for a track with no stages.
    #[must_use]
    pub fn last_stage(&self) -> Option<usize> {
        self.stages.len().checked_sub(1)
    }

    /// Narrative text for `stage`.
    #[must_use]
    pub fn stage_description(&self, stage: usize) -> Option<&str> {
        self.stages.get(stage).map(String::as_str)
    }
}

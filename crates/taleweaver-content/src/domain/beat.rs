//! Story beats and their unlock triggers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a beat, unique within a campaign.
///
/// Any string deserializes; well-formedness (`^[a-z][a-z0-9_]*$`) is a
/// validation concern so authors see malformed ids as violations rather than
/// as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatId(String);

impl BeatId {
    /// Wraps a raw id without checking its format.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is a lowercase slug: a leading ASCII letter followed by
    /// ASCII letters, digits or underscores.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => chars
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            _ => false,
        }
    }
}

impl fmt::Display for BeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// When a beat becomes eligible, beyond its prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UnlockTrigger {
    /// Available from the first episode.
    #[default]
    Start,
    /// Available once the named beat has been completed.
    AfterBeat(BeatId),
    /// Available once at least this many episodes have been completed.
    AfterEpisodeCount(u32),
    /// Available once the threat has reached this stage index.
    ThreatStage(usize),
}

/// An authored story unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    /// Unique slug.
    pub id: BeatId,
    /// What the episode is about; shown to the narrator.
    #[serde(default)]
    pub description: String,
    /// What the party learns when the beat is hit.
    #[serde(default)]
    pub revelation: String,
    /// Beats that must be completed first.
    #[serde(default)]
    pub prerequisites: BTreeSet<BeatId>,
    /// Additional unlock condition.
    #[serde(default)]
    pub unlock_trigger: UnlockTrigger,
    /// Last episode count at which the beat may still be offered.
    #[serde(default, alias = "closes_after_episodes")]
    pub expires_after_episode: Option<u32>,
    /// Whether completing this beat concludes the campaign.
    #[serde(default)]
    pub is_finale: bool,
    /// Ordered things the narrator should weave in.
    #[serde(default, alias = "must_include")]
    pub hints: Vec<String>,
}

impl Beat {
    /// Creates a start beat with empty text fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: BeatId::new(id),
            description: String::new(),
            revelation: String::new(),
            prerequisites: BTreeSet::new(),
            unlock_trigger: UnlockTrigger::Start,
            expires_after_episode: None,
            is_finale: false,
            hints: Vec::new(),
        }
    }

    /// Sets the description and revelation.
    #[must_use]
    pub fn with_text(
        mut self,
        description: impl Into<String>,
        revelation: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.revelation = revelation.into();
        self
    }

    /// Replaces the prerequisites with the given beat ids.
    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(BeatId::new).collect();
        self
    }

    /// Sets the unlock trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: UnlockTrigger) -> Self {
        self.unlock_trigger = trigger;
        self
    }

    /// Stops offering the beat after `episode`.
    #[must_use]
    pub fn expiring_after(mut self, episode: u32) -> Self {
        self.expires_after_episode = Some(episode);
        self
    }

    /// Marks the beat as the campaign finale.
    #[must_use]
    pub fn as_finale(mut self) -> Self {
        self.is_finale = true;
        self
    }

    /// Every beat that must be completed before this one: the prerequisites
    /// plus the target of an `AfterBeat` trigger.
    pub fn required_beats(&self) -> impl Iterator<Item = &BeatId> {
        let trigger_target = match &self.unlock_trigger {
            UnlockTrigger::AfterBeat(target) => Some(target),
            _ => None,
        };
        self.prerequisites.iter().chain(trigger_target)
    }

    /// A beat that can be offered on a fresh campaign.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.prerequisites.is_empty() && self.unlock_trigger == UnlockTrigger::Start
    }
}

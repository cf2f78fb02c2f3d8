//! Authoring limits applied at publish time.

use serde::{Deserialize, Serialize};
use taleweaver_core::error::DomainError;

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBounds {
    /// Fewest allowed.
    pub min: usize,
    /// Most allowed.
    pub max: usize,
}

impl CountBounds {
    /// Creates an inclusive range.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether `count` falls inside the range.
    #[must_use]
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Character-count bounds for authored text. Lengths are counted in
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    /// Beat id.
    pub beat_id: CountBounds,
    /// Beat description.
    pub description: CountBounds,
    /// Beat revelation.
    pub revelation: CountBounds,
    /// Campaign title.
    pub name: CountBounds,
    /// Campaign premise.
    pub premise: CountBounds,
    /// Threat name.
    pub threat_name: CountBounds,
    /// Each threat stage.
    pub stage: CountBounds,
    /// Each filler seed.
    pub filler_seed: CountBounds,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            beat_id: CountBounds::new(1, 30),
            description: CountBounds::new(10, 300),
            revelation: CountBounds::new(5, 300),
            name: CountBounds::new(1, 50),
            premise: CountBounds::new(20, 500),
            threat_name: CountBounds::new(1, 50),
            stage: CountBounds::new(5, 150),
            filler_seed: CountBounds::new(10, 150),
        }
    }
}

/// Size limits for a publishable campaign. Defaults match the authoring UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringLimits {
    /// Number of beats.
    pub beats: CountBounds,
    /// Number of threat stages.
    pub stages: CountBounds,
    /// Number of filler seeds.
    pub filler_seeds: CountBounds,
    /// Maximum hints per beat.
    pub max_hints: usize,
    /// Text length bounds.
    pub text: TextLimits,
}

impl Default for AuthoringLimits {
    fn default() -> Self {
        Self {
            beats: CountBounds::new(3, 10),
            stages: CountBounds::new(3, 6),
            filler_seeds: CountBounds::new(5, 15),
            max_hints: 5,
            text: TextLimits::default(),
        }
    }
}

impl AuthoringLimits {
    /// Loads limits from JSON; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the JSON is malformed or a range is
    /// inverted.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let limits: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::Config(format!("invalid authoring limits: {e}")))?;
        limits.validate()?;
        Ok(limits)
    }

    /// Loads limits from YAML; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the YAML is malformed or a range is
    /// inverted.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        let limits: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::Config(format!("invalid authoring limits: {e}")))?;
        limits.validate()?;
        Ok(limits)
    }

    /// Checks that every range is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` naming the first inverted range.
    pub fn validate(&self) -> Result<(), DomainError> {
        let text = &self.text;
        for (what, bounds) in [
            ("beats", self.beats),
            ("stages", self.stages),
            ("filler_seeds", self.filler_seeds),
            ("text.beat_id", text.beat_id),
            ("text.description", text.description),
            ("text.revelation", text.revelation),
            ("text.name", text.name),
            ("text.premise", text.premise),
            ("text.threat_name", text.threat_name),
            ("text.stage", text.stage),
            ("text.filler_seed", text.filler_seed),
        ] {
            if bounds.min > bounds.max {
                return Err(DomainError::Config(format!(
                    "{what} limit has min {} above max {}",
                    bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }
}

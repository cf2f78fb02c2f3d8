//! The authored campaign document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use taleweaver_core::error::DomainError;

use super::beat::{Beat, BeatId};
use super::threat::Threat;

/// Everything an author writes for a campaign that the progression engine
/// reads. Drafts and published content share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignContent {
    /// Campaign title.
    #[serde(default)]
    pub name: String,
    /// Two to four sentences of setup.
    #[serde(default)]
    pub premise: String,
    /// Story beats in authoring order.
    #[serde(default)]
    pub beats: Vec<Beat>,
    /// The escalation track.
    pub threat: Threat,
    /// One-line improvisation prompts for episodes with no beat to offer.
    #[serde(default)]
    pub filler_seeds: Vec<String>,
    /// Character arcs, owned by the generation service and carried verbatim.
    #[serde(default)]
    pub character_arcs: Vec<serde_json::Value>,
}

impl CampaignContent {
    /// Looks up a beat by id.
    #[must_use]
    pub fn beat(&self, id: &BeatId) -> Option<&Beat> {
        self.beats.iter().find(|beat| &beat.id == id)
    }

    /// Hex SHA-256 of the canonical JSON encoding. Identifies the exact
    /// content a campaign was published with.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the content cannot be encoded.
    pub fn content_hash(&self) -> Result<String, DomainError> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| DomainError::Infrastructure(format!("content encoding failed: {e}")))?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}

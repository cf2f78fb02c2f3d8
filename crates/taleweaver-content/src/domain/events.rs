//! Domain events for the Content Authoring context.

use serde::{Deserialize, Serialize};
use taleweaver_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

use super::campaign::CampaignContent;

/// Event type identifier for [`DraftSaved`].
pub const DRAFT_SAVED_EVENT_TYPE: &str = "content.draft_saved";
/// Event type identifier for [`CampaignPublished`].
pub const CAMPAIGN_PUBLISHED_EVENT_TYPE: &str = "content.campaign_published";

/// Emitted when an author saves a draft. Carries the whole document; the
/// latest draft replaces any earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSaved {
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// The saved content.
    pub content: CampaignContent,
}

/// Emitted when the latest draft passes publish validation and becomes
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPublished {
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// SHA-256 of the published content.
    pub content_hash: String,
    /// Advisory notes from validation.
    pub warnings: Vec<String>,
}

/// Event payload variants for the Content Authoring context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentEventKind {
    /// A draft has been saved.
    DraftSaved(DraftSaved),
    /// The campaign has been published.
    CampaignPublished(CampaignPublished),
}

/// Domain event envelope for the Content Authoring context.
#[derive(Debug, Clone)]
pub struct ContentEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ContentEventKind,
}

impl DomainEvent for ContentEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ContentEventKind::DraftSaved(_) => DRAFT_SAVED_EVENT_TYPE,
            ContentEventKind::CampaignPublished(_) => CAMPAIGN_PUBLISHED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ContentEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

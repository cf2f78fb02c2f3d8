//! Commands for the Content Authoring context.

use taleweaver_core::command::Command;
use uuid::Uuid;

use super::campaign::CampaignContent;

/// Command to save (or create) a draft.
#[derive(Debug, Clone)]
pub struct SaveDraft {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier. A new id starts a new campaign.
    pub campaign_id: Uuid,
    /// The draft content.
    pub content: CampaignContent,
}

impl Command for SaveDraft {
    fn command_type(&self) -> &'static str {
        "content.save_draft"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to publish the latest draft.
#[derive(Debug, Clone)]
pub struct PublishCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
}

impl Command for PublishCampaign {
    fn command_type(&self) -> &'static str {
        "content.publish_campaign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

//! Aggregate roots for the Content Authoring context.

use chrono::{DateTime, Utc};
use taleweaver_core::aggregate::AggregateRoot;
use taleweaver_core::clock::Clock;
use taleweaver_core::error::DomainError;
use taleweaver_core::event::EventMetadata;
use tracing::warn;
use uuid::Uuid;

use super::campaign::CampaignContent;
use super::events::{
    CAMPAIGN_PUBLISHED_EVENT_TYPE, CampaignPublished, ContentEvent, ContentEventKind,
    DRAFT_SAVED_EVENT_TYPE, DraftSaved,
};
use super::limits::AuthoringLimits;
use super::validation::{validate_draft, validate_for_publish};

/// Where a campaign is in its authoring lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Still editable.
    Draft,
    /// Immutable and playable.
    Published,
}

/// The aggregate root for an authored campaign.
#[derive(Debug)]
pub struct Campaign {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    status: CampaignStatus,
    content: Option<CampaignContent>,
    content_hash: Option<String>,
    warnings: Vec<String>,
    published_at: Option<DateTime<Utc>>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<ContentEvent>,
}

impl Campaign {
    /// Creates an empty draft campaign.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            status: CampaignStatus::Draft,
            content: None,
            content_hash: None,
            warnings: Vec::new(),
            published_at: None,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    /// The latest draft, or the published content once published.
    #[must_use]
    pub fn content(&self) -> Option<&CampaignContent> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == CampaignStatus::Published {
            return Err(DomainError::State(format!(
                "campaign {} is published and can no longer change",
                self.id
            )));
        }
        Ok(())
    }

    /// Saves a draft, producing a `DraftSaved` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the campaign is already published, or
    /// `DomainError::ValidationFailed` if the beat graph is broken.
    pub fn save_draft(
        &mut self,
        content: CampaignContent,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        let report = validate_draft(&content);
        if !report.is_publishable() {
            warn!(campaign_id = %self.id, errors = report.errors.len(), "draft rejected");
            return Err(DomainError::ValidationFailed(report.messages()));
        }

        let event = ContentEvent {
            metadata: EventMetadata::new(
                DRAFT_SAVED_EVENT_TYPE,
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind: ContentEventKind::DraftSaved(DraftSaved {
                campaign_id: self.id,
                content,
            }),
        };
        self.uncommitted_events.push(event);
        Ok(())
    }

    /// Publishes the latest draft, producing a `CampaignPublished` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the campaign is already published or
    /// has no draft, `DomainError::ValidationFailed` with every violation if
    /// the draft is not publishable, or `DomainError::Infrastructure` if the
    /// content cannot be hashed.
    pub fn publish(
        &mut self,
        limits: &AuthoringLimits,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        let content = self
            .content
            .as_ref()
            .ok_or_else(|| DomainError::State(format!("campaign {} has no draft", self.id)))?;

        let report = validate_for_publish(content, limits);
        if !report.is_publishable() {
            warn!(campaign_id = %self.id, errors = report.errors.len(), "publish rejected");
            return Err(DomainError::ValidationFailed(report.messages()));
        }

        let event = ContentEvent {
            metadata: EventMetadata::new(
                CAMPAIGN_PUBLISHED_EVENT_TYPE,
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind: ContentEventKind::CampaignPublished(CampaignPublished {
                campaign_id: self.id,
                content_hash: content.content_hash()?,
                warnings: report.warnings,
            }),
        };
        self.uncommitted_events.push(event);
        Ok(())
    }
}

impl AggregateRoot for Campaign {
    type Event = ContentEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            ContentEventKind::DraftSaved(payload) => {
                self.content = Some(payload.content.clone());
            }
            ContentEventKind::CampaignPublished(payload) => {
                self.status = CampaignStatus::Published;
                self.content_hash = Some(payload.content_hash.clone());
                self.warnings.clone_from(&payload.warnings);
                self.published_at = Some(event.metadata.occurred_at);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

//! Query handlers for the Content Authoring context.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taleweaver_core::error::DomainError;
use taleweaver_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{Campaign, CampaignStatus};
use crate::domain::campaign::CampaignContent;

/// Read-only view of a campaign aggregate.
#[derive(Debug, Serialize)]
pub struct CampaignView {
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// Draft or published.
    pub status: CampaignStatus,
    /// Campaign title from the latest content.
    pub name: String,
    /// Number of beats in the latest content.
    pub beat_count: usize,
    /// Hash of the published content.
    pub content_hash: Option<String>,
    /// Validation warnings recorded at publish.
    pub warnings: Vec<String>,
    /// When the campaign was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Current version (event count).
    pub version: i64,
}

async fn load(campaign_id: Uuid, repo: &dyn EventRepository) -> Result<Campaign, DomainError> {
    let stored_events = repo.load_events(campaign_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(campaign_id));
    }
    command_handlers::reconstitute(campaign_id, &stored_events)
}

/// Retrieves a campaign by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_campaign_by_id(
    campaign_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<CampaignView, DomainError> {
    let campaign = load(campaign_id, repo).await?;
    let content = campaign.content();
    Ok(CampaignView {
        campaign_id,
        status: campaign.status(),
        name: content.map(|c| c.name.clone()).unwrap_or_default(),
        beat_count: content.map_or(0, |c| c.beats.len()),
        content_hash: campaign.content_hash().map(str::to_owned),
        warnings: campaign.warnings().to_vec(),
        published_at: campaign.published_at(),
        version: campaign.version,
    })
}

/// Retrieves the immutable content of a published campaign, the input every
/// play-time resolver works from.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID,
/// or `DomainError::State` if the campaign is still a draft.
pub async fn get_published_content(
    campaign_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<CampaignContent, DomainError> {
    let campaign = load(campaign_id, repo).await?;
    match (campaign.status(), campaign.content()) {
        (CampaignStatus::Published, Some(content)) => Ok(content.clone()),
        _ => Err(DomainError::State(format!(
            "campaign {campaign_id} is not published"
        ))),
    }
}

//! Reading and writing campaign documents.
//!
//! Both JSON and YAML are accepted. A document that carries `anchor_runs`
//! and no `beats` is read with the legacy schema and migrated; every other
//! document is read as current content. Output is always the current schema.

use thiserror::Error;
use tracing::info;

use super::campaign::CampaignContent;
use super::legacy::{LegacyCampaign, LegacyError};

/// A campaign document that could not be read or written.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid campaign JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid campaign YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("legacy campaign could not be migrated: {0}")]
    Legacy(#[from] LegacyError),
}

impl From<DocumentError> for taleweaver_core::error::DomainError {
    fn from(err: DocumentError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Parses a campaign from JSON, migrating the legacy schema.
///
/// # Errors
///
/// Returns `DocumentError` if the JSON is malformed, does not match either
/// schema, or is a legacy document with an invalid trigger.
pub fn parse_content_json(json: &str) -> Result<CampaignContent, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let is_legacy = value.get("anchor_runs").is_some() && value.get("beats").is_none();
    if is_legacy {
        migrate(serde_json::from_value(value)?)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Parses a campaign from YAML, migrating the legacy schema.
///
/// # Errors
///
/// Returns `DocumentError` if the YAML is malformed, does not match either
/// schema, or is a legacy document with an invalid trigger.
pub fn parse_content_yaml(yaml: &str) -> Result<CampaignContent, DocumentError> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let is_legacy = value.get("anchor_runs").is_some() && value.get("beats").is_none();
    if is_legacy {
        migrate(serde_yaml::from_value(value)?)
    } else {
        Ok(serde_yaml::from_value(value)?)
    }
}

fn migrate(legacy: LegacyCampaign) -> Result<CampaignContent, DocumentError> {
    let runs = legacy.anchor_runs.len();
    let content = CampaignContent::try_from(legacy)?;
    info!(campaign = %content.name, runs, "migrated legacy anchor-run campaign");
    Ok(content)
}

/// Writes content as pretty-printed JSON.
///
/// # Errors
///
/// Returns `DocumentError::Json` if encoding fails.
pub fn to_json(content: &CampaignContent) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(content)?)
}

/// Writes content as YAML.
///
/// # Errors
///
/// Returns `DocumentError::Yaml` if encoding fails.
pub fn to_yaml(content: &CampaignContent) -> Result<String, DocumentError> {
    Ok(serde_yaml::to_string(content)?)
}

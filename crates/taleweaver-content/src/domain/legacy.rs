//! The deprecated anchor-runs schema and its migration to beats.
//!
//! Older campaigns describe story units as "anchor runs" with a single
//! string-valued trigger and a threat that advances `on` a fixed event.
//! They are read and converted on load. Nothing writes this schema anymore.

use serde::Deserialize;
use thiserror::Error;

use super::beat::{Beat, BeatId, UnlockTrigger};
use super::campaign::CampaignContent;
use super::threat::{AdvancePolicy, Threat};

/// A legacy document that cannot be expressed in the beats schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyError {
    #[error("anchor run {run}: {trigger} trigger requires a value")]
    MissingTriggerValue { run: String, trigger: &'static str },

    #[error("anchor run {run}: {trigger} trigger requires a numeric value, got {value:?}")]
    NonNumericTriggerValue {
        run: String,
        trigger: &'static str,
        value: String,
    },
}

/// Campaign document in the anchor-runs schema. Fields the engine has no use
/// for (tone, NPCs, locations) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCampaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub premise: String,
    pub threat: LegacyThreat,
    pub anchor_runs: Vec<LegacyAnchorRun>,
    #[serde(default)]
    pub filler_seeds: Vec<String>,
    #[serde(default)]
    pub character_arcs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyThreat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stages: Vec<String>,
    pub advance_on: LegacyAdvanceOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyAdvanceOn {
    RunFailed,
    #[serde(rename = "every_2_runs")]
    Every2Runs,
    #[serde(rename = "every_3_runs")]
    Every3Runs,
    Manual,
}

impl From<LegacyAdvanceOn> for AdvancePolicy {
    fn from(advance_on: LegacyAdvanceOn) -> Self {
        match advance_on {
            LegacyAdvanceOn::RunFailed => Self::OnEpisodeFailure,
            LegacyAdvanceOn::Every2Runs => Self::EveryNEpisodes(2),
            LegacyAdvanceOn::Every3Runs => Self::EveryNEpisodes(3),
            LegacyAdvanceOn::Manual => Self::Manual,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyAnchorRun {
    pub id: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub must_include: Vec<String>,
    #[serde(default)]
    pub reveal: String,
    #[serde(default)]
    pub trigger: LegacyTrigger,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyTrigger {
    #[serde(rename = "type")]
    pub kind: LegacyTriggerKind,
    #[serde(default)]
    pub value: Option<LegacyValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyTriggerKind {
    #[default]
    Start,
    AfterRun,
    AfterRunsCount,
    ThreatStage,
}

/// Trigger values were strings in the original schema, but hand-edited
/// files often carry bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyValue {
    Number(u64),
    Text(String),
}

impl LegacyValue {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }
}

impl LegacyAnchorRun {
    fn trigger(&self) -> Result<UnlockTrigger, LegacyError> {
        let kind = self.trigger.kind;
        let name = match kind {
            LegacyTriggerKind::Start => return Ok(UnlockTrigger::Start),
            LegacyTriggerKind::AfterRun => "after_run",
            LegacyTriggerKind::AfterRunsCount => "after_runs_count",
            LegacyTriggerKind::ThreatStage => "threat_stage",
        };
        let value = self
            .trigger
            .value
            .as_ref()
            .map(LegacyValue::as_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| LegacyError::MissingTriggerValue {
                run: self.id.clone(),
                trigger: name,
            })?;

        if kind == LegacyTriggerKind::AfterRun {
            return Ok(UnlockTrigger::AfterBeat(BeatId::new(value)));
        }
        let non_numeric = || LegacyError::NonNumericTriggerValue {
            run: self.id.clone(),
            trigger: name,
            value: value.clone(),
        };
        Ok(if kind == LegacyTriggerKind::AfterRunsCount {
            UnlockTrigger::AfterEpisodeCount(value.parse().map_err(|_| non_numeric())?)
        } else {
            UnlockTrigger::ThreatStage(value.parse().map_err(|_| non_numeric())?)
        })
    }
}

impl TryFrom<LegacyCampaign> for CampaignContent {
    type Error = LegacyError;

    fn try_from(legacy: LegacyCampaign) -> Result<Self, Self::Error> {
        let last = legacy.anchor_runs.len().saturating_sub(1);
        let beats = legacy
            .anchor_runs
            .iter()
            .enumerate()
            .map(|(index, run)| {
                let description = if run.goal.trim().is_empty() {
                    run.hook.clone()
                } else {
                    run.goal.clone()
                };
                let mut beat = Beat::new(run.id.clone())
                    .with_text(description, run.reveal.clone())
                    .with_trigger(run.trigger()?);
                beat.hints.clone_from(&run.must_include);
                beat.is_finale = index == last;
                Ok(beat)
            })
            .collect::<Result<Vec<_>, LegacyError>>()?;

        Ok(Self {
            name: legacy.name,
            premise: legacy.premise,
            beats,
            threat: Threat::new(
                legacy.threat.name,
                legacy.threat.stages,
                legacy.threat.advance_on.into(),
            ),
            filler_seeds: legacy.filler_seeds,
            character_arcs: legacy.character_arcs,
        })
    }
}

//! Content graph validation.
//!
//! The validator never stops at the first problem: it walks the whole draft
//! and reports every violation so an author can fix them in one pass.
//! Warnings are advisory and never block publishing.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::beat::{Beat, BeatId, UnlockTrigger};
use super::campaign::CampaignContent;
use super::limits::{AuthoringLimits, CountBounds};
use super::threat::AdvancePolicy;

/// The piece of authored text a length violation refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TextField {
    /// A beat's id.
    BeatId(BeatId),
    /// A beat's description.
    Description(BeatId),
    /// A beat's revelation.
    Revelation(BeatId),
    /// The campaign title.
    Name,
    /// The campaign premise.
    Premise,
    /// The threat's name.
    ThreatName,
    /// A threat stage, by index.
    Stage(usize),
    /// A filler seed, by index.
    FillerSeed(usize),
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeatId(id) => write!(f, "beat id {id}"),
            Self::Description(beat) => write!(f, "beat {beat} description"),
            Self::Revelation(beat) => write!(f, "beat {beat} revelation"),
            Self::Name => f.write_str("campaign name"),
            Self::Premise => f.write_str("premise"),
            Self::ThreatName => f.write_str("threat name"),
            Self::Stage(index) => write!(f, "threat stage {index}"),
            Self::FillerSeed(index) => write!(f, "filler seed {index}"),
        }
    }
}

/// A single reason content cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The id is not a lowercase slug.
    #[error(
        "beat id {id:?} must start with a lowercase letter and contain only a-z, 0-9 or _"
    )]
    MalformedBeatId { id: BeatId },

    /// Two beats share an id.
    #[error("beat id {id} is used more than once")]
    DuplicateBeatId { id: BeatId },

    /// A prerequisite names no beat.
    #[error("beat {beat} requires unknown beat {prerequisite}")]
    UnknownPrerequisite { beat: BeatId, prerequisite: BeatId },

    /// A beat requires itself.
    #[error("beat {beat} lists itself as a prerequisite")]
    SelfPrerequisite { beat: BeatId },

    /// An `AfterBeat` trigger names no beat.
    #[error("beat {beat} unlocks after unknown beat {target}")]
    UnknownTriggerTarget { beat: BeatId, target: BeatId },

    /// An `AfterBeat` trigger names its own beat.
    #[error("beat {beat} unlocks after itself")]
    SelfTrigger { beat: BeatId },

    /// Too few or too many beats.
    #[error("campaign has {count} beats, expected {min} to {max}")]
    BeatCount {
        count: usize,
        min: usize,
        max: usize,
    },

    /// Too few or too many threat stages.
    #[error("threat has {count} stages, expected {min} to {max}")]
    StageCount {
        count: usize,
        min: usize,
        max: usize,
    },

    /// Too few or too many filler seeds.
    #[error("campaign has {count} filler seeds, expected {min} to {max}")]
    FillerSeedCount {
        count: usize,
        min: usize,
        max: usize,
    },

    /// Blank beat description.
    #[error("beat {beat} has no description")]
    MissingDescription { beat: BeatId },

    /// Blank beat revelation.
    #[error("beat {beat} has no revelation")]
    MissingRevelation { beat: BeatId },

    /// More hints than the narrator is given room for.
    #[error("beat {beat} has {count} hints, at most {max} allowed")]
    TooManyHints {
        beat: BeatId,
        count: usize,
        max: usize,
    },

    /// Blank threat name.
    #[error("threat has no name")]
    BlankThreatName,

    /// Blank threat stage.
    #[error("threat stage {index} has no description")]
    BlankStage { index: usize },

    /// Blank filler seed.
    #[error("filler seed {index} is blank")]
    BlankFillerSeed { index: usize },

    /// Text shorter or longer than its configured bounds.
    #[error("{field} is {actual} characters, expected {min} to {max}")]
    FieldLength {
        field: TextField,
        actual: usize,
        min: usize,
        max: usize,
    },

    /// `EveryNEpisodes(0)` can never fire.
    #[error("threat advances every 0 episodes")]
    ZeroEpisodeInterval,

    /// A `ThreatStage` trigger past the last stage.
    #[error(
        "beat {beat} waits for threat stage {stage} but the threat only has {stages} stages"
    )]
    UnreachableThreatStage {
        beat: BeatId,
        stage: usize,
        stages: usize,
    },

    /// No beat can be offered on a fresh campaign.
    #[error(
        "no beat is available at the start: at least one needs no prerequisites and a start trigger"
    )]
    NoReachableStart,
}

/// Outcome of validating a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Blocking violations.
    pub errors: Vec<Violation>,
    /// Advisory notes for the author.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether the content may be published.
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in report order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// How strict validation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Graph integrity only, so work in progress can be saved.
    Draft,
    /// Everything required before players see the campaign.
    Publish,
}

/// Validates a draft against the publish-time rules.
#[must_use]
pub fn validate_for_publish(
    content: &CampaignContent,
    limits: &AuthoringLimits,
) -> ValidationReport {
    validate(content, limits, ValidationMode::Publish)
}

/// Validates only the integrity of the beat graph.
#[must_use]
pub fn validate_draft(content: &CampaignContent) -> ValidationReport {
    validate(content, &AuthoringLimits::default(), ValidationMode::Draft)
}

/// Validates `content` in the given mode. In draft mode `limits` are not
/// consulted.
#[must_use]
pub fn validate(
    content: &CampaignContent,
    limits: &AuthoringLimits,
    mode: ValidationMode,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_graph(content, &mut report.errors);

    if mode == ValidationMode::Publish {
        check_cardinality(content, limits, &mut report.errors);
        check_length(
            TextField::Name,
            &content.name,
            limits.text.name,
            &mut report.errors,
        );
        check_length(
            TextField::Premise,
            &content.premise,
            limits.text.premise,
            &mut report.errors,
        );
        for beat in &content.beats {
            check_beat_fields(
                beat,
                content.threat.stages.len(),
                limits,
                &mut report.errors,
            );
        }
        check_threat(content, limits, &mut report.errors);
        check_filler_seeds(&content.filler_seeds, limits, &mut report.errors);
        if !content.beats.iter().any(Beat::is_start) {
            report.errors.push(Violation::NoReachableStart);
        }

        if content.filler_seeds.len() < content.beats.len() {
            report
                .warnings
                .push("Consider adding more filler seeds for variety between beats".to_owned());
        }
    }
    report.warnings.extend(unreachable_beat_warnings(content));

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        ?mode,
        "validated campaign content"
    );
    report
}

fn check_graph(content: &CampaignContent, errors: &mut Vec<Violation>) {
    let known: HashSet<&BeatId> = content.beats.iter().map(|beat| &beat.id).collect();
    let mut seen = HashSet::new();
    let mut reported_duplicates = HashSet::new();

    for beat in &content.beats {
        if !beat.id.is_well_formed() {
            errors.push(Violation::MalformedBeatId {
                id: beat.id.clone(),
            });
        }
        if !seen.insert(&beat.id) && reported_duplicates.insert(&beat.id) {
            errors.push(Violation::DuplicateBeatId {
                id: beat.id.clone(),
            });
        }

        for prerequisite in &beat.prerequisites {
            if *prerequisite == beat.id {
                errors.push(Violation::SelfPrerequisite {
                    beat: beat.id.clone(),
                });
            } else if !known.contains(prerequisite) {
                errors.push(Violation::UnknownPrerequisite {
                    beat: beat.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }

        if let UnlockTrigger::AfterBeat(target) = &beat.unlock_trigger {
            if *target == beat.id {
                errors.push(Violation::SelfTrigger {
                    beat: beat.id.clone(),
                });
            } else if !known.contains(target) {
                errors.push(Violation::UnknownTriggerTarget {
                    beat: beat.id.clone(),
                    target: target.clone(),
                });
            }
        }
    }
}

fn check_cardinality(
    content: &CampaignContent,
    limits: &AuthoringLimits,
    errors: &mut Vec<Violation>,
) {
    let out_of =
        |bounds: CountBounds, count: usize| (!bounds.contains(count)).then_some((count, bounds));

    if let Some((count, CountBounds { min, max })) = out_of(limits.beats, content.beats.len()) {
        errors.push(Violation::BeatCount { count, min, max });
    }
    if let Some((count, CountBounds { min, max })) =
        out_of(limits.stages, content.threat.stages.len())
    {
        errors.push(Violation::StageCount { count, min, max });
    }
    if let Some((count, CountBounds { min, max })) =
        out_of(limits.filler_seeds, content.filler_seeds.len())
    {
        errors.push(Violation::FillerSeedCount { count, min, max });
    }
}

fn check_length(field: TextField, text: &str, bounds: CountBounds, errors: &mut Vec<Violation>) {
    let actual = text.chars().count();
    if !bounds.contains(actual) {
        errors.push(Violation::FieldLength {
            field,
            actual,
            min: bounds.min,
            max: bounds.max,
        });
    }
}

fn check_beat_fields(
    beat: &Beat,
    stage_count: usize,
    limits: &AuthoringLimits,
    errors: &mut Vec<Violation>,
) {
    let text = &limits.text;
    if beat.id.is_well_formed() {
        check_length(
            TextField::BeatId(beat.id.clone()),
            beat.id.as_str(),
            text.beat_id,
            errors,
        );
    }
    if beat.description.trim().is_empty() {
        errors.push(Violation::MissingDescription {
            beat: beat.id.clone(),
        });
    } else {
        check_length(
            TextField::Description(beat.id.clone()),
            &beat.description,
            text.description,
            errors,
        );
    }
    if beat.revelation.trim().is_empty() {
        errors.push(Violation::MissingRevelation {
            beat: beat.id.clone(),
        });
    } else {
        check_length(
            TextField::Revelation(beat.id.clone()),
            &beat.revelation,
            text.revelation,
            errors,
        );
    }
    if beat.hints.len() > limits.max_hints {
        errors.push(Violation::TooManyHints {
            beat: beat.id.clone(),
            count: beat.hints.len(),
            max: limits.max_hints,
        });
    }
    match beat.unlock_trigger {
        UnlockTrigger::ThreatStage(stage) if stage >= stage_count => {
            errors.push(Violation::UnreachableThreatStage {
                beat: beat.id.clone(),
                stage,
                stages: stage_count,
            });
        }
        _ => {}
    }
}

fn check_threat(content: &CampaignContent, limits: &AuthoringLimits, errors: &mut Vec<Violation>) {
    let threat = &content.threat;
    if threat.name.trim().is_empty() {
        errors.push(Violation::BlankThreatName);
    } else {
        check_length(
            TextField::ThreatName,
            &threat.name,
            limits.text.threat_name,
            errors,
        );
    }
    for (index, stage) in threat.stages.iter().enumerate() {
        if stage.trim().is_empty() {
            errors.push(Violation::BlankStage { index });
        } else {
            check_length(TextField::Stage(index), stage, limits.text.stage, errors);
        }
    }
    if threat.advance_policy == AdvancePolicy::EveryNEpisodes(0) {
        errors.push(Violation::ZeroEpisodeInterval);
    }
}

fn check_filler_seeds(seeds: &[String], limits: &AuthoringLimits, errors: &mut Vec<Violation>) {
    for (index, seed) in seeds.iter().enumerate() {
        if seed.trim().is_empty() {
            errors.push(Violation::BlankFillerSeed { index });
        } else {
            check_length(
                TextField::FillerSeed(index),
                seed,
                limits.text.filler_seed,
                errors,
            );
        }
    }
}

/// Beats whose prerequisites all exist yet can never all be completed,
/// because they form a cycle or hang off one.
fn unreachable_beat_warnings(content: &CampaignContent) -> Vec<String> {
    let known: HashSet<&BeatId> = content.beats.iter().map(|beat| &beat.id).collect();
    let mut reachable: BTreeSet<&BeatId> = BTreeSet::new();

    loop {
        let before = reachable.len();
        for beat in &content.beats {
            if !reachable.contains(&beat.id)
                && beat.required_beats().all(|required| reachable.contains(required))
            {
                reachable.insert(&beat.id);
            }
        }
        if reachable.len() == before {
            break;
        }
    }

    content
        .beats
        .iter()
        .filter(|beat| !reachable.contains(&beat.id))
        .filter(|beat| beat.required_beats().all(|required| known.contains(required)))
        .map(|beat| {
            format!(
                "beat {} can never become available: its prerequisites form or depend on a cycle",
                beat.id
            )
        })
        .collect()
}

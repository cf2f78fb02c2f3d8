//! Property tests for the content graph validator.

use std::collections::HashSet;

use proptest::prelude::*;
use taleweaver_content::domain::beat::{Beat, BeatId, UnlockTrigger};
use taleweaver_content::domain::campaign::CampaignContent;
use taleweaver_content::domain::limits::AuthoringLimits;
use taleweaver_content::domain::threat::{AdvancePolicy, Threat};
use taleweaver_content::domain::validation::{
    TextField, Violation, validate_draft, validate_for_publish,
};

const ID_POOL: &[&str] = &["a", "b", "c", "d", "e", "f", "g", "h", "Bad", "9lives"];

fn beat_strategy() -> impl Strategy<Value = Beat> {
    (
        prop::sample::select(ID_POOL),
        prop::collection::btree_set(prop::sample::select(ID_POOL), 0..3),
        prop::option::of(1u32..5),
    )
        .prop_map(|(id, prerequisites, after_count)| {
            let trigger =
                after_count.map_or(UnlockTrigger::Start, UnlockTrigger::AfterEpisodeCount);
            Beat::new(id)
                .with_text("something happens", "something is learned")
                .with_prerequisites(prerequisites.iter().copied())
                .with_trigger(trigger)
        })
}

fn content_strategy() -> impl Strategy<Value = CampaignContent> {
    prop::collection::vec(beat_strategy(), 3..=10).prop_map(|beats| CampaignContent {
        name: "Generated".to_owned(),
        premise: "A generated campaign with a generated premise.".to_owned(),
        filler_seeds: (0..beats.len().max(5))
            .map(|i| format!("filler seed number {i}"))
            .collect(),
        beats,
        threat: Threat::new(
            "Doom",
            ["Doom is near", "Doom is nearer", "Doom is here"],
            AdvancePolicy::EveryNEpisodes(2),
        ),
        character_arcs: Vec::new(),
    })
}

fn sound_content() -> CampaignContent {
    CampaignContent {
        name: "Generated".to_owned(),
        premise: "A generated campaign with a generated premise.".to_owned(),
        beats: ["a", "b", "c"]
            .map(|id| Beat::new(id).with_text("something happens", "something is learned"))
            .to_vec(),
        threat: Threat::new(
            "Doom",
            ["Doom is near", "Doom is nearer", "Doom is here"],
            AdvancePolicy::EveryNEpisodes(2),
        ),
        filler_seeds: (0..5).map(|i| format!("filler seed number {i}")).collect(),
        character_arcs: Vec::new(),
    }
}

fn has_length_violation(errors: &[Violation], wanted: &TextField) -> bool {
    errors
        .iter()
        .any(|v| matches!(v, Violation::FieldLength { field, .. } if field == wanted))
}

/// The structural conditions a publishable graph must meet, computed
/// independently of the validator.
fn structurally_sound(content: &CampaignContent) -> bool {
    let ids: Vec<&BeatId> = content.beats.iter().map(|b| &b.id).collect();
    let known: HashSet<&BeatId> = ids.iter().copied().collect();

    let unique = known.len() == ids.len();
    let well_formed = ids.iter().all(|id| id.is_well_formed());
    let prerequisites_resolve = content.beats.iter().all(|b| {
        b.prerequisites
            .iter()
            .all(|p| *p != b.id && known.contains(p))
    });
    let has_start = content
        .beats
        .iter()
        .any(|b| b.prerequisites.is_empty() && b.unlock_trigger == UnlockTrigger::Start);

    unique && well_formed && prerequisites_resolve && has_start
}

proptest! {
    #[test]
    fn publishable_iff_structurally_sound(content in content_strategy()) {
        let report = validate_for_publish(&content, &AuthoringLimits::default());

        prop_assert_eq!(
            report.is_publishable(),
            structurally_sound(&content),
            "{:?}",
            report.errors
        );
    }

    #[test]
    fn validation_is_pure(content in content_strategy()) {
        let before = content.clone();

        let first = validate_for_publish(&content, &AuthoringLimits::default());
        let second = validate_for_publish(&content, &AuthoringLimits::default());

        prop_assert_eq!(first, second);
        prop_assert_eq!(content, before);
    }

    #[test]
    fn draft_errors_are_a_subset_of_publish_errors(content in content_strategy()) {
        let draft = validate_draft(&content);
        let publish = validate_for_publish(&content, &AuthoringLimits::default());

        for violation in &draft.errors {
            prop_assert!(publish.errors.contains(violation));
        }
    }

    #[test]
    fn text_length_bounds_are_enforced(
        stage_len in 1usize..200,
        seed_len in 1usize..200,
        id_len in 1usize..45,
    ) {
        let limits = AuthoringLimits::default();
        let mut content = sound_content();
        content.threat.stages[1] = "s".repeat(stage_len);
        content.filler_seeds[2] = "f".repeat(seed_len);
        let long_id = BeatId::new("b".repeat(id_len));
        content.beats[1].id = long_id.clone();

        let report = validate_for_publish(&content, &limits);

        prop_assert_eq!(
            has_length_violation(&report.errors, &TextField::Stage(1)),
            !limits.text.stage.contains(stage_len)
        );
        prop_assert_eq!(
            has_length_violation(&report.errors, &TextField::FillerSeed(2)),
            !limits.text.filler_seed.contains(seed_len)
        );
        prop_assert_eq!(
            has_length_violation(&report.errors, &TextField::BeatId(long_id)),
            !limits.text.beat_id.contains(id_len)
        );
        prop_assert_eq!(
            report.is_publishable(),
            limits.text.stage.contains(stage_len)
                && limits.text.filler_seed.contains(seed_len)
                && limits.text.beat_id.contains(id_len)
        );
    }
}

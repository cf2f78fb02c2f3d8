//! Property tests for the leveling resolver.

use std::collections::BTreeMap;

use proptest::prelude::*;
use taleweaver_character::domain::leveling::{
    LevelReward, LevelingConfig, RewardKind, resolve_level_up,
};
use taleweaver_character::domain::rules::CharacterRules;
use taleweaver_character::domain::sheet::CharacterSheet;

fn reward_kind() -> impl Strategy<Value = RewardKind> {
    prop_oneof![
        Just(RewardKind::Stat),
        Just(RewardKind::Health),
        Just(RewardKind::Magic),
        Just(RewardKind::Choice),
        Just(RewardKind::Ability),
    ]
}

fn leveling_strategy() -> impl Strategy<Value = LevelingConfig> {
    (
        prop::collection::btree_set(1u32..60, 1..6),
        2u32..7,
        prop::collection::vec(prop::option::of(reward_kind()), 6),
    )
        .prop_map(|(thresholds, max_level, kinds)| LevelingConfig {
            max_level,
            thresholds: thresholds.into_iter().collect(),
            rewards: (2..=max_level)
                .zip(kinds)
                .filter_map(|(level, kind)| kind.map(|kind| (level, LevelReward::new(kind, ""))))
                .collect::<BTreeMap<_, _>>(),
        })
}

fn sheet_strategy() -> impl Strategy<Value = CharacterSheet> {
    (
        (1u32..3, 1u32..4, 1u32..4),
        (5u32..=7, 3u32..=5),
        1u32..7,
        0u32..80,
    )
        .prop_map(|((brave, clever, kind), (health, magic), level, xp)| {
            let stats = BTreeMap::from([
                ("Brave".to_owned(), brave),
                ("Clever".to_owned(), clever),
                ("Kind".to_owned(), kind),
            ]);
            CharacterSheet {
                level,
                xp,
                ..CharacterSheet::new(stats, health, magic)
            }
        })
}

fn choice_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("Brave".to_owned()),
        Just("Clever".to_owned()),
        Just("Sneaky".to_owned()),
        Just("magic".to_owned()),
        Just("ability".to_owned()),
    ])
}

proptest! {
    #[test]
    fn level_up_is_all_or_nothing(
        leveling in leveling_strategy(),
        sheet in sheet_strategy(),
        choice in choice_strategy(),
    ) {
        let before = sheet.clone();
        let rules = CharacterRules {
            leveling,
            ..CharacterRules::default()
        };

        if let Ok(level_up) = resolve_level_up(&sheet, &rules, choice.as_deref()) {
            let after = &level_up.sheet;
            prop_assert_eq!(after.level, before.level + 1);
            prop_assert!(after.level <= rules.leveling.max_level);
            prop_assert_eq!(after.xp, before.xp);
            prop_assert!(after.stats.values().all(|v| *v <= rules.stats.max_per_stat));
            prop_assert!(after.max_health <= rules.health.max);
            prop_assert!(after.max_magic <= rules.magic.max);
            prop_assert_eq!(
                level_up.reward.is_some(),
                rules.leveling.rewards.contains_key(&after.level)
            );
        }
        prop_assert_eq!(sheet, before);
    }

    #[test]
    fn level_for_xp_is_monotonic_and_bounded(
        leveling in leveling_strategy(),
        xp in 0u32..100,
        extra in 0u32..100,
    ) {
        let level = leveling.level_for_xp(xp);

        prop_assert!((1..=leveling.max_level).contains(&level));
        prop_assert!(leveling.level_for_xp(xp + extra) >= level);
    }
}

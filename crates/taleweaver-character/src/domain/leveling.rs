//! XP thresholds, level rewards and the level-up resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use taleweaver_core::error::DomainError;
use thiserror::Error;
use tracing::debug;

use super::rules::CharacterRules;
use super::sheet::CharacterSheet;
use super::stats::ResourceConfig;

/// What a level grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// +1 to a stat of the player's choosing.
    Stat,
    /// +1 maximum health.
    Health,
    /// +1 maximum magic.
    Magic,
    /// The player picks `magic` or `ability`.
    Choice,
    /// A new ability.
    Ability,
}

/// A configured reward, e.g. `{ "type": "stat", "desc": "+1 to any stat" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReward {
    #[serde(rename = "type")]
    pub kind: RewardKind,
    #[serde(default)]
    pub desc: String,
}

impl LevelReward {
    /// A reward of `kind` with a player-facing description.
    #[must_use]
    pub fn new(kind: RewardKind, desc: impl Into<String>) -> Self {
        Self {
            kind,
            desc: desc.into(),
        }
    }
}

/// The leveling table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelingConfig {
    /// Highest reachable level.
    pub max_level: u32,
    /// Ascending XP requirements; `thresholds[i]` unlocks level `i + 2`.
    pub thresholds: Vec<u32>,
    /// Reward granted on reaching each level.
    #[serde(default)]
    pub rewards: BTreeMap<u32, LevelReward>,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            max_level: 5,
            thresholds: vec![2, 4, 7, 11],
            rewards: BTreeMap::from([
                (2, LevelReward::new(RewardKind::Stat, "+1 to any stat")),
                (3, LevelReward::new(RewardKind::Health, "+1 max Hearts")),
                (
                    4,
                    LevelReward::new(RewardKind::Choice, "+1 max Threads or a new ability"),
                ),
                (5, LevelReward::new(RewardKind::Stat, "+1 to any stat")),
            ]),
        }
    }
}

/// Why a level-up was refused. The sheet is never modified on refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelUpError {
    #[error("not enough experience to advance, or already at the maximum level")]
    NotEligible,
    #[error("this level's reward requires a choice")]
    ChoiceRequired,
    #[error("{0:?} is not a valid choice; pick magic or ability")]
    InvalidChoice(String),
    #[error("{0:?} is not a configured stat")]
    UnknownStat(String),
    #[error("{stat} is already at its maximum of {max}")]
    StatAtMax { stat: String, max: u32 },
    #[error("maximum {resource} is already {max}")]
    ResourceAtMax { resource: String, max: u32 },
    #[error("{0}")]
    Config(String),
}

impl From<LevelUpError> for DomainError {
    fn from(err: LevelUpError) -> Self {
        match err {
            LevelUpError::Config(msg) => Self::Config(msg),
            other => Self::State(other.to_string()),
        }
    }
}

impl LevelingConfig {
    /// Checks the table is usable.
    ///
    /// # Errors
    ///
    /// Returns `LevelUpError::Config` if `max_level` is below 2, the
    /// thresholds are empty or not strictly ascending, or a reward is keyed to
    /// a level outside `2..=max_level`.
    pub fn validate(&self) -> Result<(), LevelUpError> {
        if self.max_level < 2 {
            return Err(LevelUpError::Config(format!(
                "max_level must be at least 2, got {}",
                self.max_level
            )));
        }
        if self.thresholds.is_empty() {
            return Err(LevelUpError::Config(
                "no XP thresholds are configured".to_owned(),
            ));
        }
        if let Some(&[earlier, later]) = self.thresholds.windows(2).find(|pair| pair[0] >= pair[1])
        {
            return Err(LevelUpError::Config(format!(
                "XP thresholds must strictly ascend, but {earlier} is followed by {later}"
            )));
        }
        if let Some(level) = self
            .rewards
            .keys()
            .find(|level| !(2..=self.max_level).contains(*level))
        {
            return Err(LevelUpError::Config(format!(
                "reward configured for level {level}, outside 2..={}",
                self.max_level
            )));
        }
        Ok(())
    }

    /// The level `xp` is worth: one more than the number of thresholds met,
    /// clamped to `[1, max_level]`.
    #[must_use]
    pub fn level_for_xp(&self, xp: u32) -> u32 {
        let level = self
            .thresholds
            .iter()
            .rposition(|&threshold| threshold <= xp)
            .map_or(1, |index| u32::try_from(index + 2).unwrap_or(u32::MAX));
        level.clamp(1, self.max_level.max(1))
    }

    /// Whether `sheet` has the XP for another level and is below the cap.
    #[must_use]
    pub fn can_level_up(&self, sheet: &CharacterSheet) -> bool {
        self.level_for_xp(sheet.xp) > sheet.level && sheet.level < self.max_level
    }

    /// Reward waiting at the sheet's next level, if any.
    #[must_use]
    pub fn next_reward(&self, sheet: &CharacterSheet) -> Option<&LevelReward> {
        self.rewards.get(&(sheet.level + 1))
    }
}

/// The effect a level-up actually had, as recorded on the `LevelGained`
/// event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AppliedReward {
    MaxHealth,
    MaxMagic,
    /// `stat` was raised by one; `value` is its new score.
    Stat { stat: String, value: u32 },
    /// Record-only; abilities have no mechanical effect here.
    AbilityPicked,
}

impl AppliedReward {
    /// Applies the reward to a sheet that is reaching `level`.
    pub fn apply_to(&self, sheet: &mut CharacterSheet, level: u32) {
        match self {
            Self::MaxHealth => sheet.max_health = sheet.max_health.saturating_add(1),
            Self::MaxMagic => sheet.max_magic = sheet.max_magic.saturating_add(1),
            Self::Stat { stat, value } => {
                sheet.stats.insert(stat.clone(), *value);
            }
            Self::AbilityPicked => sheet.ability_picks.push(level),
        }
    }
}

/// A resolved level-up: the advanced sheet and what was granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub sheet: CharacterSheet,
    pub reward: Option<AppliedReward>,
}

fn raise_resource(
    current: u32,
    resource: &ResourceConfig,
    reward: AppliedReward,
) -> Result<AppliedReward, LevelUpError> {
    if current >= resource.max {
        return Err(LevelUpError::ResourceAtMax {
            resource: resource.name.clone(),
            max: resource.max,
        });
    }
    Ok(reward)
}

/// Advances `sheet` by exactly one level and applies that level's reward.
///
/// `choice` names the stat for a `stat` reward, or `magic`/`ability` for a
/// `choice` reward; it is ignored otherwise. Levels with no configured reward
/// grant the level alone. A stat missing from the sheet counts as
/// `min_per_stat`.
///
/// # Errors
///
/// Returns `LevelUpError::NotEligible` if [`LevelingConfig::can_level_up`] is
/// false, `ChoiceRequired`, `InvalidChoice`, `UnknownStat`, `StatAtMax` or
/// `ResourceAtMax` when the reward cannot be applied as requested, and
/// `Config` if the table itself is invalid. `sheet` is borrowed and never
/// modified.
pub fn resolve_level_up(
    sheet: &CharacterSheet,
    rules: &CharacterRules,
    choice: Option<&str>,
) -> Result<LevelUp, LevelUpError> {
    let leveling = &rules.leveling;
    leveling.validate()?;
    if !leveling.can_level_up(sheet) {
        return Err(LevelUpError::NotEligible);
    }

    let level = sheet.level + 1;
    let reward = match leveling.rewards.get(&level).map(|reward| reward.kind) {
        None => None,
        Some(RewardKind::Health) => Some(raise_resource(
            sheet.max_health,
            &rules.health,
            AppliedReward::MaxHealth,
        )?),
        Some(RewardKind::Magic) => Some(raise_resource(
            sheet.max_magic,
            &rules.magic,
            AppliedReward::MaxMagic,
        )?),
        Some(RewardKind::Ability) => Some(AppliedReward::AbilityPicked),
        Some(RewardKind::Stat) => {
            let stats = &rules.stats;
            let stat = choice.ok_or(LevelUpError::ChoiceRequired)?;
            if !stats.has_stat(stat) {
                return Err(LevelUpError::UnknownStat(stat.to_owned()));
            }
            let current = sheet
                .stats
                .get(stat)
                .copied()
                .unwrap_or(stats.min_per_stat);
            if current >= stats.max_per_stat {
                return Err(LevelUpError::StatAtMax {
                    stat: stat.to_owned(),
                    max: stats.max_per_stat,
                });
            }
            Some(AppliedReward::Stat {
                stat: stat.to_owned(),
                value: current + 1,
            })
        }
        Some(RewardKind::Choice) => match choice {
            None => return Err(LevelUpError::ChoiceRequired),
            Some("magic") => Some(raise_resource(
                sheet.max_magic,
                &rules.magic,
                AppliedReward::MaxMagic,
            )?),
            Some("ability") => Some(AppliedReward::AbilityPicked),
            Some(other) => return Err(LevelUpError::InvalidChoice(other.to_owned())),
        },
    };

    let mut next = sheet.clone();
    next.level = level;
    if let Some(reward) = &reward {
        reward.apply_to(&mut next, level);
    }
    debug!(level, ?reward, "level-up resolved");
    Ok(LevelUp {
        sheet: next,
        reward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(level: u32, xp: u32) -> CharacterSheet {
        let stats = BTreeMap::from([
            ("Brave".to_owned(), 2),
            ("Clever".to_owned(), 2),
            ("Kind".to_owned(), 1),
        ]);
        CharacterSheet {
            level,
            xp,
            ..CharacterSheet::new(stats, 5, 3)
        }
    }

    fn table(thresholds: &[u32], rewards: &[(u32, RewardKind)]) -> LevelingConfig {
        LevelingConfig {
            max_level: 5,
            thresholds: thresholds.to_vec(),
            rewards: rewards
                .iter()
                .map(|&(level, kind)| (level, LevelReward::new(kind, "")))
                .collect(),
        }
    }

    fn rules(leveling: LevelingConfig) -> CharacterRules {
        CharacterRules {
            leveling,
            ..CharacterRules::default()
        }
    }

    #[test]
    fn test_level_for_xp_at_threshold_boundaries() {
        let leveling = table(&[10, 25, 50, 100], &[]);

        assert_eq!(leveling.level_for_xp(0), 1);
        assert_eq!(leveling.level_for_xp(9), 1);
        assert_eq!(leveling.level_for_xp(10), 2);
        assert_eq!(leveling.level_for_xp(24), 2);
        assert_eq!(leveling.level_for_xp(25), 3);
        assert_eq!(leveling.level_for_xp(100), 5);
        assert_eq!(leveling.level_for_xp(10_000), 5);
    }

    #[test]
    fn test_level_for_xp_is_clamped_to_max_level() {
        let leveling = LevelingConfig {
            max_level: 3,
            ..table(&[10, 25, 50, 100], &[])
        };

        assert_eq!(leveling.level_for_xp(100), 3);
    }

    #[test]
    fn test_can_level_up_one_step_at_a_time() {
        let leveling = table(&[10, 25, 50, 100], &[]);

        assert!(leveling.can_level_up(&sheet(1, 30)));
        assert!(leveling.can_level_up(&sheet(2, 30)));
        assert!(!leveling.can_level_up(&sheet(3, 30)));
        assert!(!leveling.can_level_up(&sheet(5, 500)));
    }

    #[test]
    fn test_stat_reward_without_choice_is_rejected() {
        // Arrange
        let rules = rules(table(&[10], &[(2, RewardKind::Stat)]));
        let before = sheet(1, 10);

        // Act
        let result = resolve_level_up(&before, &rules, None);

        // Assert
        assert_eq!(result, Err(LevelUpError::ChoiceRequired));
        assert_eq!(before, sheet(1, 10));
    }

    #[test]
    fn test_stat_reward_increments_chosen_stat() {
        // Arrange
        let rules = rules(table(&[10], &[(2, RewardKind::Stat)]));

        // Act
        let level_up = resolve_level_up(&sheet(1, 10), &rules, Some("Kind")).unwrap();

        // Assert
        assert_eq!(level_up.sheet.level, 2);
        assert_eq!(level_up.sheet.stats["Kind"], 2);
        assert_eq!(
            level_up.reward,
            Some(AppliedReward::Stat {
                stat: "Kind".to_owned(),
                value: 2,
            })
        );
    }

    #[test]
    fn test_stat_missing_from_sheet_starts_at_min_per_stat() {
        // Arrange
        let rules = rules(table(&[10], &[(2, RewardKind::Stat)]));
        let mut before = sheet(1, 10);
        before.stats.remove("Kind");

        // Act
        let level_up = resolve_level_up(&before, &rules, Some("Kind")).unwrap();
        let mut replayed = before.clone();
        replayed.level = 2;
        if let Some(reward) = &level_up.reward {
            reward.apply_to(&mut replayed, 2);
        }

        // Assert
        assert_eq!(level_up.sheet.stats["Kind"], rules.stats.min_per_stat + 1);
        assert_eq!(replayed, level_up.sheet);
    }

    #[test]
    fn test_stat_reward_rejects_stat_at_max() {
        let rules = rules(table(&[10], &[(2, RewardKind::Stat)]));
        let mut before = sheet(1, 10);
        before.stats.insert("Brave".to_owned(), 3);

        let result = resolve_level_up(&before, &rules, Some("Brave"));

        assert_eq!(
            result,
            Err(LevelUpError::StatAtMax {
                stat: "Brave".to_owned(),
                max: 3
            })
        );
    }

    #[test]
    fn test_stat_reward_rejects_unknown_stat() {
        let rules = rules(table(&[10], &[(2, RewardKind::Stat)]));

        let result = resolve_level_up(&sheet(1, 10), &rules, Some("Sneaky"));

        assert_eq!(result, Err(LevelUpError::UnknownStat("Sneaky".to_owned())));
    }

    #[test]
    fn test_choice_reward_accepts_magic_or_ability_only() {
        let rules = rules(table(&[10], &[(2, RewardKind::Choice)]));
        let before = sheet(1, 10);

        let magic = resolve_level_up(&before, &rules, Some("magic")).unwrap();
        let ability = resolve_level_up(&before, &rules, Some("ability")).unwrap();
        let missing = resolve_level_up(&before, &rules, None);
        let invalid = resolve_level_up(&before, &rules, Some("health"));

        assert_eq!(magic.sheet.max_magic, 4);
        assert_eq!(ability.sheet.ability_picks, vec![2]);
        assert_eq!(ability.sheet.max_magic, 3);
        assert_eq!(missing, Err(LevelUpError::ChoiceRequired));
        assert_eq!(
            invalid,
            Err(LevelUpError::InvalidChoice("health".to_owned()))
        );
    }

    #[test]
    fn test_health_reward_and_unrewarded_level() {
        let rules = rules(table(&[10, 20], &[(3, RewardKind::Health)]));

        let second = resolve_level_up(&sheet(1, 20), &rules, None).unwrap();
        let third = resolve_level_up(&second.sheet, &rules, None).unwrap();

        assert_eq!(second.reward, None);
        assert_eq!(second.sheet.max_health, 5);
        assert_eq!(third.reward, Some(AppliedReward::MaxHealth));
        assert_eq!(third.sheet.max_health, 6);
        assert_eq!(third.sheet.level, 3);
    }

    #[test]
    fn test_health_reward_rejected_at_resource_max() {
        // Arrange
        let rules = rules(table(&[10], &[(2, RewardKind::Health)]));
        let mut before = sheet(1, 10);
        before.max_health = rules.health.max;

        // Act
        let result = resolve_level_up(&before, &rules, None);

        // Assert
        assert_eq!(
            result,
            Err(LevelUpError::ResourceAtMax {
                resource: "Hearts".to_owned(),
                max: 7,
            })
        );
        assert_eq!(
            DomainError::from(result.unwrap_err()).to_string(),
            "state error: maximum Hearts is already 7"
        );
    }

    #[test]
    fn test_magic_choice_at_max_still_allows_ability() {
        // Arrange
        let rules = rules(table(&[10], &[(2, RewardKind::Choice)]));
        let mut before = sheet(1, 10);
        before.max_magic = rules.magic.max;

        // Act
        let magic = resolve_level_up(&before, &rules, Some("magic"));
        let ability = resolve_level_up(&before, &rules, Some("ability")).unwrap();

        // Assert
        assert_eq!(
            magic,
            Err(LevelUpError::ResourceAtMax {
                resource: "Threads".to_owned(),
                max: 5,
            })
        );
        assert_eq!(ability.sheet.max_magic, 5);
        assert_eq!(ability.sheet.level, 2);
    }

    #[test]
    fn test_ineligible_sheet_is_rejected() {
        let rules = rules(table(&[10], &[]));

        let result = resolve_level_up(&sheet(1, 9), &rules, None);

        assert_eq!(result, Err(LevelUpError::NotEligible));
    }

    #[test]
    fn test_validate_rejects_non_ascending_thresholds() {
        let leveling = table(&[10, 10], &[]);

        let err = leveling.validate().unwrap_err();

        assert_eq!(
            DomainError::from(err).to_string(),
            "configuration error: XP thresholds must strictly ascend, but 10 is followed by 10"
        );
    }

    #[test]
    fn test_validate_rejects_reward_beyond_max_level() {
        let leveling = table(&[10], &[(6, RewardKind::Health)]);

        assert!(matches!(leveling.validate(), Err(LevelUpError::Config(_))));
        assert!(LevelingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rewards_deserialize_from_yaml_table() {
        let leveling: LevelingConfig = serde_yaml::from_str(
            "max_level: 3\nthresholds: [5, 9]\nrewards:\n  2: { type: choice, desc: Pick one }\n",
        )
        .unwrap();

        assert_eq!(leveling.rewards[&2].kind, RewardKind::Choice);
        assert_eq!(leveling.rewards[&2].desc, "Pick one");
    }
}

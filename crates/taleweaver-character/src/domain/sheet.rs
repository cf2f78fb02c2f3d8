//! A character's mechanical state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stats, level, XP and resource maxima.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Stat name to value.
    pub stats: BTreeMap<String, u32>,
    /// Current level, starting at 1.
    pub level: u32,
    /// Accumulated experience.
    pub xp: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Maximum magic.
    pub max_magic: u32,
    /// Levels at which an ability reward was taken.
    #[serde(default)]
    pub ability_picks: Vec<u32>,
}

impl CharacterSheet {
    /// A level-1 sheet with no XP.
    #[must_use]
    pub fn new(stats: BTreeMap<String, u32>, max_health: u32, max_magic: u32) -> Self {
        Self {
            stats,
            level: 1,
            xp: 0,
            max_health,
            max_magic,
            ability_picks: Vec::new(),
        }
    }
}

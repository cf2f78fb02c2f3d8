//! Stat and resource configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use taleweaver_core::error::DomainError;

/// The campaign's stats and how points are distributed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatConfig {
    /// Stat names, e.g. Brave, Clever, Kind.
    pub names: Vec<String>,
    /// Points every new character distributes.
    #[serde(default = "default_starting_pool")]
    pub starting_pool: u32,
    /// Lowest value any stat may hold.
    #[serde(default = "default_min_per_stat")]
    pub min_per_stat: u32,
    /// Highest value any stat may hold.
    #[serde(default = "default_max_per_stat")]
    pub max_per_stat: u32,
}

fn default_starting_pool() -> u32 {
    5
}

fn default_min_per_stat() -> u32 {
    1
}

fn default_max_per_stat() -> u32 {
    3
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            names: ["Brave", "Clever", "Kind"].map(str::to_owned).to_vec(),
            starting_pool: default_starting_pool(),
            min_per_stat: default_min_per_stat(),
            max_per_stat: default_max_per_stat(),
        }
    }
}

impl StatConfig {
    /// Whether `name` is a configured stat.
    #[must_use]
    pub fn has_stat(&self, name: &str) -> bool {
        self.names.iter().any(|configured| configured == name)
    }

    /// Checks that the configuration admits at least one legal allocation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if there are no names, duplicate names,
    /// an inverted range, or a pool no allocation can sum to.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.names.is_empty() {
            return Err(DomainError::Config("no stats are configured".to_owned()));
        }
        let unique: BTreeSet<&String> = self.names.iter().collect();
        if unique.len() != self.names.len() {
            return Err(DomainError::Config("stat names must be unique".to_owned()));
        }
        if self.min_per_stat > self.max_per_stat {
            return Err(DomainError::Config(format!(
                "min_per_stat {} is above max_per_stat {}",
                self.min_per_stat, self.max_per_stat
            )));
        }
        let count = u32::try_from(self.names.len())
            .map_err(|_| DomainError::Config("too many stats".to_owned()))?;
        let lowest = count.saturating_mul(self.min_per_stat);
        let highest = count.saturating_mul(self.max_per_stat);
        if !(lowest..=highest).contains(&self.starting_pool) {
            return Err(DomainError::Config(format!(
                "starting_pool {} cannot be allocated; totals range from {lowest} to {highest}",
                self.starting_pool
            )));
        }
        Ok(())
    }

    /// Checks a new character's starting allocation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the keys differ from the
    /// configured names, a value is outside `[min_per_stat, max_per_stat]`,
    /// or the values do not sum to `starting_pool`.
    pub fn validate_allocation(
        &self,
        allocation: &BTreeMap<String, u32>,
    ) -> Result<(), DomainError> {
        let expected: BTreeSet<&str> = self.names.iter().map(String::as_str).collect();
        let given: BTreeSet<&str> = allocation.keys().map(String::as_str).collect();
        if expected != given {
            return Err(DomainError::Validation(format!(
                "stats must be exactly {expected:?}, got {given:?}"
            )));
        }
        for (name, value) in allocation {
            if !(self.min_per_stat..=self.max_per_stat).contains(value) {
                return Err(DomainError::Validation(format!(
                    "{name} is {value}; each stat must be between {} and {}",
                    self.min_per_stat, self.max_per_stat
                )));
            }
        }
        let total: u32 = allocation.values().sum();
        if total != self.starting_pool {
            return Err(DomainError::Validation(format!(
                "stats total {total}; exactly {} points must be allocated",
                self.starting_pool
            )));
        }
        Ok(())
    }
}

/// A pooled resource such as health or magic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Display name, e.g. Hearts.
    pub name: String,
    /// Maximum a new character starts with.
    pub starting: u32,
    /// Ceiling that level rewards cannot raise the maximum past.
    pub max: u32,
}

impl ResourceConfig {
    /// A resource named `name` that starts at `starting` and tops out at
    /// `max`.
    #[must_use]
    pub fn new(name: impl Into<String>, starting: u32, max: u32) -> Self {
        Self {
            name: name.into(),
            starting,
            max,
        }
    }

    /// # Errors
    ///
    /// Returns `DomainError::Config` if the resource starts at zero or above
    /// its ceiling.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.starting == 0 || self.starting > self.max {
            return Err(DomainError::Config(format!(
                "{} must start between 1 and its max of {}, got {}",
                self.name, self.max, self.starting
            )));
        }
        Ok(())
    }
}

//! A campaign's character rules: stats, resources and the leveling table.

use serde::{Deserialize, Serialize};
use taleweaver_core::error::DomainError;

use super::leveling::LevelingConfig;
use super::stats::{ResourceConfig, StatConfig};

/// Everything the Character context needs to know about a game system.
/// Defaults describe the built-in system: Brave/Clever/Kind, Hearts and
/// Threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRules {
    pub stats: StatConfig,
    pub health: ResourceConfig,
    pub magic: ResourceConfig,
    pub leveling: LevelingConfig,
}

impl Default for CharacterRules {
    fn default() -> Self {
        Self {
            stats: StatConfig::default(),
            health: ResourceConfig::new("Hearts", 5, 7),
            magic: ResourceConfig::new("Threads", 3, 5),
            leveling: LevelingConfig::default(),
        }
    }
}

impl CharacterRules {
    /// Loads rules from JSON; omitted sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the JSON is malformed or the rules
    /// are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let rules: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::Config(format!("invalid character rules: {e}")))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Loads rules from YAML; omitted sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the YAML is malformed or the rules
    /// are inconsistent.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        let rules: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::Config(format!("invalid character rules: {e}")))?;
        rules.validate()?;
        Ok(rules)
    }

    /// # Errors
    ///
    /// Returns `DomainError::Config` if the stat, resource or leveling
    /// configuration is unusable.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.stats.validate()?;
        self.health.validate()?;
        self.magic.validate()?;
        self.leveling.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        // Arrange
        let yaml = "health: { name: Vigor, starting: 6, max: 9 }\n\
                    stats:\n  names: [Might, Wits]\n  starting_pool: 4\n";

        // Act
        let rules = CharacterRules::from_yaml_str(yaml).unwrap();

        // Assert
        assert_eq!(rules.health, ResourceConfig::new("Vigor", 6, 9));
        assert_eq!(
            rules.stats.names,
            vec!["Might".to_owned(), "Wits".to_owned()]
        );
        assert_eq!(rules.stats.max_per_stat, 3);
        assert_eq!(rules.magic, ResourceConfig::new("Threads", 3, 5));
        assert_eq!(rules.leveling, LevelingConfig::default());
    }

    #[test]
    fn test_json_with_broken_leveling_is_a_config_error() {
        let json = r#"{ "leveling": { "max_level": 3, "thresholds": [] } }"#;

        let err = CharacterRules::from_json_str(json).unwrap_err();

        assert!(matches!(err, DomainError::Config(msg) if msg.contains("no XP thresholds")));
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = CharacterRules::from_json_str("{ not json").unwrap_err();

        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_resource_starting_above_max_is_a_config_error() {
        let json = r#"{ "magic": { "name": "Threads", "starting": 6, "max": 5 } }"#;

        let err = CharacterRules::from_json_str(json).unwrap_err();

        assert!(matches!(err, DomainError::Config(msg) if msg.starts_with("Threads must start")));
    }
}

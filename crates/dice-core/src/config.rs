//! ============================================================================
//! Engine Config - Compatibility rules and rank tables
//! ============================================================================
//! Built-in defaults can be replaced from a JSON file:
//! ```json
//! {
//!   "rules": { "gift": { "patternsAllowed": false, "blockedHats": ["*"] } },
//!   "rankTables": { "hat": [["cone", 0], ["tophat", 1]] }
//! }
//! ```
//! Path comes from the caller or the MY_DICE_CONFIG env var.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::catalog::RankTables;
use crate::compat::RuleBook;
use crate::error::ConfigError;

/// Env var naming a config file
pub const CONFIG_ENV_VAR: &str = "MY_DICE_CONFIG";

/// Rule and ranking configuration. Sections left out of a file keep
/// their built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub rules: RuleBook,
    pub rank_tables: RankTables,
}

impl EngineConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            "Loaded engine config from {} ({} dice rules)",
            path.display(),
            config.rules.len()
        );
        Ok(config)
    }

    /// Load from an explicit path, else MY_DICE_CONFIG, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::from_env(),
        }
    }

    /// Load the file named by MY_DICE_CONFIG, or defaults when it is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(env_path) if !env_path.trim().is_empty() => Self::load(Path::new(&env_path)),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.rules, RuleBook::default());
        assert_eq!(config.rank_tables.table(Category::Hat).rank_of("Cone"), 0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rules": {{ "moon": {{ "patternsAllowed": false }} }} }}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert!(config.rules.rule_for("/dice/Dice/MoonDice.svg").is_some());
        assert!(config.rules.rule_for("/dice/Dice/BoxDice.svg").is_none());
        assert_eq!(config.rank_tables, RankTables::default());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let config = EngineConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/my-dice.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

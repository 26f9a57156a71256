// ABOUTME: Configuration management for the scenario-vars application
// ABOUTME: Handles loading configuration from YAML files and environment variable overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::template::Params;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub variables: VariablesConfig,

    /// Reject unknown loader names when building actions
    #[serde(default)]
    pub strict_loaders: bool,

    /// Template params bound for every script user
    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariablesConfig {
    /// Seconds before a persistent variable written without ttl expires
    pub default_ttl: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("scenario-vars.yaml"),
            PathBuf::from("scenario-vars.yml"),
            PathBuf::from(".scenario-vars.yaml"),
            PathBuf::from(".scenario-vars.yml"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".scenario-vars").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        for path in possible_paths {
            if path.exists() {
                return path;
            }
        }

        // may not exist
        PathBuf::from("scenario-vars.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("SCENARIO_VARS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SCENARIO_VARS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(ttl) = std::env::var("SCENARIO_VARS_DEFAULT_TTL") {
            self.variables.default_ttl = Some(ttl.parse()?);
        }
        if let Ok(strict) = std::env::var("SCENARIO_VARS_STRICT_LOADERS") {
            self.strict_loaders = strict.parse()?;
        }

        Ok(())
    }

    /// Merge additional template params, overriding configured ones
    pub fn merge_params(&mut self, params: Params) {
        self.params.extend(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.variables.default_ttl, None);
        assert!(!config.strict_loaders);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("scenario-vars.yaml");

        fs::write(
            &config_path,
            r#"
variables:
  default_ttl: 86400
strict_loaders: true
params:
  bot_name: Ada
logging:
  level: debug
  format: compact
"#,
        )
        .unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.variables.default_ttl, Some(86400));
        assert!(config.strict_loaders);
        assert_eq!(config.params["bot_name"], json!("Ada"));
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load(Some(temp_dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config.variables.default_ttl, None);
    }

    #[test]
    fn test_merge_params() {
        let mut config = Config::default();
        config.params.insert("a".to_string(), json!("1"));

        let mut extra = Params::new();
        extra.insert("a".to_string(), json!("2"));
        config.merge_params(extra);

        assert_eq!(config.params["a"], json!("2"));
    }
}

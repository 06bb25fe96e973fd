//! CLI configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where rendered feedback documents are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareConfig {
    /// Default repository for issue sharing ("owner/name").
    pub repo: Option<String>,
    /// Labels applied to shared issues.
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedactionConfig {
    /// Extra patterns appended to the built-in redaction rules.
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("feedback")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            share: ShareConfig::default(),
            redaction: RedactionConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from the default location (./debrief.toml) or fall back
    /// to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("debrief.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }
        Ok(Config::default())
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::Settings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Thresholds and windows used by the narrative requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_technical_trades: usize,
    pub min_emotional_reflections: usize,
    pub reflection_window: usize,
    pub recent_trade_window: usize,
    /// Smallest group considered for best session / best setup
    pub min_group_trades: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_technical_trades: 10,
            min_emotional_reflections: 1,
            reflection_window: 10,
            recent_trade_window: 10,
            min_group_trades: 3,
        }
    }
}

/// Narrative backend settings. The API key is read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
    pub burst: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".into(),
            model: "claude-sonnet-4-5".into(),
            max_tokens: 2500,
            temperature: 0.2,
            timeout_secs: 60,
            requests_per_minute: 10,
            burst: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub analysis: AnalysisConfig,
    pub narrative: NarrativeConfig,
    pub trading: Settings,
}

impl JournalConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: JournalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.min_technical_trades == 0 || analysis.min_emotional_reflections == 0 {
            return Err(ConfigError::Invalid("analysis thresholds must be at least 1".into()));
        }
        if analysis.reflection_window == 0 || analysis.recent_trade_window == 0 {
            return Err(ConfigError::Invalid("analysis windows cannot be zero".into()));
        }

        let narrative = &self.narrative;
        if narrative.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("narrative.base_url cannot be empty".into()));
        }
        if narrative.max_tokens == 0 {
            return Err(ConfigError::Invalid("narrative.max_tokens cannot be zero".into()));
        }
        if !(0.0..=1.0).contains(&narrative.temperature) {
            return Err(ConfigError::Invalid("narrative.temperature must be within [0, 1]".into()));
        }
        Ok(())
    }
}

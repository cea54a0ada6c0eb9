//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/inboxta/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/inboxta/` (~/.config/inboxta/)
//! - State/Logs: `$XDG_STATE_HOME/inboxta/` (~/.local/state/inboxta/)

use crate::error::{Error, Result};
use crate::types::{AnalyzeOptions, ModelTier};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// LLM configuration for the completion service (optional)
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    /// Triage thresholds and escalation policy
    #[serde(default)]
    pub triage: TriageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// LLM provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider type
    pub provider: LlmProvider,
    /// Model id used for the mini tier
    pub mini_model: String,
    /// Model id used for the standard tier
    pub standard_model: String,
    /// Model id used for the frontier tier
    pub frontier_model: String,
    /// API endpoint (optional, uses default for provider)
    pub endpoint: Option<String>,
    /// API key (can also use env var)
    pub api_key: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// The provider model id configured for a cost tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Mini => &self.mini_model,
            ModelTier::Standard => &self.standard_model,
            ModelTier::Frontier => &self.frontier_model,
        }
    }
}

fn default_llm_timeout() -> u64 {
    30
}

/// Supported LLM providers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    Claude,
    OpenAI,
}

impl LlmProvider {
    /// Returns the default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }
}

/// Triage thresholds and escalation policy
#[derive(Debug, Deserialize, Clone)]
pub struct TriageConfig {
    /// Minimum decision confidence for auto-reply
    #[serde(default = "default_auto_reply_threshold")]
    pub auto_reply_threshold: f64,

    /// Default cost tier for analysis
    #[serde(default)]
    pub default_tier: ModelTier,

    /// Retry low-confidence questions one tier up
    #[serde(default)]
    pub use_smart_model_for_low_confidence: bool,

    /// Confidence below which the retry triggers
    #[serde(default = "default_smart_model_threshold")]
    pub smart_model_threshold: f64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            auto_reply_threshold: default_auto_reply_threshold(),
            default_tier: ModelTier::default(),
            use_smart_model_for_low_confidence: false,
            smart_model_threshold: default_smart_model_threshold(),
        }
    }
}

impl TriageConfig {
    /// Build per-call analysis options from this config.
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            model: self.default_tier,
            auto_reply_threshold: self.auto_reply_threshold,
            use_smart_model_for_low_confidence: self.use_smart_model_for_low_confidence,
            smart_model_threshold: self.smart_model_threshold,
        }
    }
}

fn default_auto_reply_threshold() -> f64 {
    0.85
}

fn default_smart_model_threshold() -> f64 {
    0.5
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate threshold ranges.
    pub fn validate(&self) -> Result<()> {
        let t = &self.triage;
        if !(0.0..=1.0).contains(&t.auto_reply_threshold) {
            return Err(Error::Config(
                "triage.auto_reply_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&t.smart_model_threshold) {
            return Err(Error::Config(
                "triage.smart_model_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/inboxta/config.toml` (~/.config/inboxta/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("inboxta").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/inboxta/` (~/.local/state/inboxta/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("inboxta")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/inboxta/inboxta.log` (~/.local/state/inboxta/inboxta.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("inboxta.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.is_none());
        assert_eq!(config.triage.auto_reply_threshold, 0.85);
        assert_eq!(config.triage.smart_model_threshold, 0.5);
        assert!(!config.triage.use_smart_model_for_low_confidence);
        assert_eq!(config.triage.default_tier, ModelTier::Mini);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[llm]
provider = "ollama"
mini_model = "llama3.2"
standard_model = "llama3.3"
frontier_model = "llama3.3:70b"

[triage]
auto_reply_threshold = 0.9
use_smart_model_for_low_confidence = true

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let llm = config.llm.unwrap();
        assert_eq!(llm.provider, LlmProvider::Ollama);
        assert_eq!(llm.model_for(ModelTier::Mini), "llama3.2");
        assert_eq!(llm.model_for(ModelTier::Frontier), "llama3.3:70b");
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(config.triage.auto_reply_threshold, 0.9);
        assert!(config.triage.use_smart_model_for_low_confidence);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_threshold_validation() {
        let toml = r#"
[triage]
auto_reply_threshold = 1.5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analyze_options_from_config() {
        let toml = r#"
[triage]
default_tier = "standard"
smart_model_threshold = 0.6
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let opts = config.triage.analyze_options();
        assert_eq!(opts.model, ModelTier::Standard);
        assert_eq!(opts.smart_model_threshold, 0.6);
        assert_eq!(opts.auto_reply_threshold, 0.85);
    }

    #[test]
    fn test_llm_provider_endpoints() {
        assert_eq!(
            LlmProvider::Ollama.default_endpoint(),
            "http://localhost:11434"
        );
        assert_eq!(
            LlmProvider::Claude.default_endpoint(),
            "https://api.anthropic.com"
        );
    }
}

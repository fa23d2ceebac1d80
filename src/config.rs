use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::{Recommender, ReplyTiming};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_reply_delay_min_ms")]
    pub reply_delay_min_ms: u64,
    #[serde(default = "default_reply_delay_max_ms")]
    pub reply_delay_max_ms: u64,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    /// Fixed seed for reply delays and match scores
    pub seed: Option<u64>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            reply_delay_min_ms: default_reply_delay_min_ms(),
            reply_delay_max_ms: default_reply_delay_max_ms(),
            recommendation_limit: default_recommendation_limit(),
            seed: None,
        }
    }
}

fn default_reply_delay_min_ms() -> u64 { 1000 }
fn default_reply_delay_max_ms() -> u64 { 3000 }
fn default_recommendation_limit() -> usize { 2 }

impl AssistantSettings {
    pub fn reply_timing(&self) -> Result<ReplyTiming, ConfigError> {
        if self.reply_delay_min_ms > self.reply_delay_max_ms {
            return Err(ConfigError::Message(format!(
                "assistant.reply_delay_min_ms ({}) exceeds assistant.reply_delay_max_ms ({})",
                self.reply_delay_min_ms, self.reply_delay_max_ms
            )));
        }

        Ok(ReplyTiming::new(
            Duration::from_millis(self.reply_delay_min_ms),
            Duration::from_millis(self.reply_delay_max_ms),
        ))
    }

    /// Amenities replies must carry at least one listing
    pub fn recommender(&self) -> Result<Recommender, ConfigError> {
        if self.recommendation_limit == 0 {
            return Err(ConfigError::Message(
                "assistant.recommendation_limit must be at least 1".to_string(),
            ));
        }

        Ok(Recommender::new(self.recommendation_limit))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON file with the candidate pool; built-in listings when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VYBR__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VYBR__ASSISTANT__SEED -> assistant.seed
            .add_source(
                Environment::with_prefix("VYBR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("VYBR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.assistant.reply_timing()?;
        self.assistant.recommender()?;
        Ok(())
    }
}

/// Apply shorthand environment overrides
///
/// `VYBR_CATALOG_PATH` sets `catalog.path`.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("VYBR_CATALOG_PATH") {
        Ok(path) if !path.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("catalog.path", path)?
            .build(),
        _ => Ok(settings),
    }
}

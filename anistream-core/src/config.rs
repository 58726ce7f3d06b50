use crate::provider::ProviderDescriptor;
use crate::resolve::RetryPolicy;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
///
/// Everything here is static: loaded once at process start, never mutated.
/// Provider order in the file encodes fallback priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: Vec<ProviderConfig>,
    pub catalog: CatalogConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            catalog: CatalogConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// One provider entry; position in the list is fallback priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub display_name: String,
    pub episodes_url: String,
    pub watch_url: String,
    #[serde(default)]
    pub search_url: Option<String>,
}

impl ProviderConfig {
    #[must_use]
    pub fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            episodes_url: self.episodes_url.clone(),
            watch_url: self.watch_url.clone(),
            search_url: self.search_url.clone(),
        }
    }
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "animefox".to_string(),
            display_name: "AnimeFox".to_string(),
            episodes_url: "https://api.consumet.org/anime/animefox/info".to_string(),
            watch_url: "https://api.consumet.org/anime/animefox/watch".to_string(),
            search_url: Some("https://animefox.tv/search?q=".to_string()),
        },
        ProviderConfig {
            name: "gogoanime".to_string(),
            display_name: "Gogoanime".to_string(),
            episodes_url: "https://api.consumet.org/anime/gogoanime/info".to_string(),
            watch_url: "https://api.consumet.org/anime/gogoanime/watch".to_string(),
            search_url: Some("https://gogoanime3.co/search.html?keyword=".to_string()),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// GraphQL endpoint of the catalog metadata service.
    pub url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "https://graphql.anilist.co".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total invocation budget per provider call, including the first
    /// attempt.
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration: optional file, then `ANISTREAM_*` environment
    /// overrides, over the built-in defaults.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ANISTREAM")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Validate configuration, collecting every problem rather than
    /// stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.providers.is_empty() {
            errors.push("at least one provider must be configured".to_string());
        }
        for (i, provider) in self.providers.iter().enumerate() {
            if provider.name.is_empty() {
                errors.push(format!("provider {i}: name must not be empty"));
            }
            if provider.episodes_url.is_empty() {
                errors.push(format!("provider {i}: episodes_url must not be empty"));
            }
            if provider.watch_url.is_empty() {
                errors.push(format!("provider {i}: watch_url must not be empty"));
            }
        }
        if self.retry.max_attempts == 0 {
            errors.push("retry.max_attempts must be at least 1".to_string());
        }
        if self.catalog.url.is_empty() {
            errors.push("catalog.url must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

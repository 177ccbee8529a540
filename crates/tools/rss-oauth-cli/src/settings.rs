//! Configuration for the rss-oauth CLI
//!
//! Sources, later ones overriding earlier ones:
//! - Configuration file (`rss.toml`, or the path in `RSS_CONFIG_FILE`)
//! - Environment variables with the `RSS` prefix, e.g. `RSS__OAUTH__CLIENT_ID`

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use rss_identity_oauth2::{HttpClientConfig, OAuthConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Identity manager endpoints and credentials
    pub oauth: OAuthConfig,

    /// Transport settings for the IdM connection pool
    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load from `RSS_CONFIG_FILE` (default `rss.toml`) and the environment
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("RSS_CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rss.toml"));
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            builder = builder.add_source(File::from(config_path));
        } else {
            debug!(
                "No config file found at {}, using environment only",
                config_path.display()
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("RSS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.oauth
            .validate()
            .context("Invalid [oauth] configuration")?;

        if self.http.timeout_seconds == 0 {
            anyhow::bail!("HTTP timeout must be greater than 0");
        }

        Ok(())
    }

    /// Filter string for `tracing_subscriber::EnvFilter`
    pub fn log_filter(&self) -> String {
        if self.logging.level.contains('=') || self.logging.level.contains(',') {
            self.logging.level.clone()
        } else {
            format!(
                "rss_oauth_cli={level},rss_identity_oauth2={level},warn",
                level = self.logging.level
            )
        }
    }
}

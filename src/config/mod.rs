//! Configuration management for tubemark
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tubemark::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("oEmbed provider: {}", config.providers.oembed_endpoint);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `TUBEMARK__<section>__<key>`
//!
//! Examples:
//! - `TUBEMARK__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `TUBEMARK__RETRY__MAX_RETRIES=5`
//! - `TUBEMARK__TIMEOUTS__REQUEST=3s`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/tubemark.toml`.
//! This can be overridden using the `TUBEMARK_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::HumanDuration;
pub use models::{
    Config, HealthConfig, ProvidersConfig, RetryConfig, ServerConfig, TimeoutConfig,
};
pub use validation::ValidationError;

use thiserror::Error;

use crate::fetch::FetchConfig;
use crate::health::ProbeSettings;
use crate::resolver::ResolverSettings;
use crate::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or a value
    /// fails validation (bad endpoint URL, template without `{video_id}`,
    /// inverted retry delays, ...).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(self.retry.max_retries)
            .base_delay(self.retry.base_delay.as_duration())
            .max_delay(self.retry.max_delay.as_duration())
            .backoff_factor(self.retry.backoff_factor)
            .build()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let mut fetch = FetchConfig {
            connect_timeout: self.timeouts.connect.as_duration(),
            ..FetchConfig::default()
        };
        if let Some(user_agent) = &self.providers.user_agent {
            fetch.user_agent = user_agent.clone();
        }
        fetch
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings::builder()
            .playlist_endpoint(self.providers.playlist_endpoint.clone())
            .oembed_endpoint(self.providers.oembed_endpoint.clone())
            .thumbnail_template(self.providers.thumbnail_template.clone())
            .request_timeout(self.timeouts.request.as_duration())
            .retry(self.retry_policy())
            .transient_only(self.retry.transient_only)
            .build()
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings::builder()
            .playlist_endpoint(self.providers.playlist_endpoint.clone())
            .oembed_endpoint(self.providers.oembed_endpoint.clone())
            .sample_video_url(self.health.sample_video_url.clone())
            .sample_playlist_url(self.health.sample_playlist_url.clone())
            .timeout(self.timeouts.health_probe.as_duration())
            .build()
    }
}

use super::models::Config;
use crate::resolver::{VIDEO_ID_PLACEHOLDER, thumbnail_url};
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Endpoint '{field}' is not a valid http(s) URL: {value}")]
    InvalidEndpoint { field: String, value: String },

    #[error("Thumbnail template must contain {placeholder} and expand to a URL: {template}")]
    InvalidThumbnailTemplate {
        template: String,
        placeholder: &'static str,
    },

    #[error("backoff_factor must be greater than 1, got {0}")]
    InvalidBackoffFactor(f64),

    #[error("base_delay ({base_ms}ms) exceeds max_delay ({max_ms}ms)")]
    DelayBoundsInverted { base_ms: u64, max_ms: u64 },

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_providers(config)?;
    validate_retry(config)?;
    validate_timeouts(config)?;
    Ok(())
}

fn validate_providers(config: &Config) -> Result<(), ValidationError> {
    let providers = &config.providers;
    validate_endpoint("providers.playlist_endpoint", &providers.playlist_endpoint)?;
    validate_endpoint("providers.oembed_endpoint", &providers.oembed_endpoint)?;
    validate_endpoint("health.sample_video_url", &config.health.sample_video_url)?;
    validate_endpoint("health.sample_playlist_url", &config.health.sample_playlist_url)?;

    // Any well-formed id will do for a dry run of the template
    if thumbnail_url(&providers.thumbnail_template, "dQw4w9WgXcQ").is_err() {
        return Err(ValidationError::InvalidThumbnailTemplate {
            template: providers.thumbnail_template.clone(),
            placeholder: VIDEO_ID_PLACEHOLDER,
        });
    }

    Ok(())
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ValidationError> {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::InvalidEndpoint {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

fn validate_retry(config: &Config) -> Result<(), ValidationError> {
    let retry = &config.retry;

    if !retry.backoff_factor.is_finite() || retry.backoff_factor <= 1.0 {
        return Err(ValidationError::InvalidBackoffFactor(retry.backoff_factor));
    }

    if retry.base_delay > retry.max_delay {
        return Err(ValidationError::DelayBoundsInverted {
            base_ms: retry.base_delay.as_millis(),
            max_ms: retry.max_delay.as_millis(),
        });
    }

    Ok(())
}

fn validate_timeouts(config: &Config) -> Result<(), ValidationError> {
    let timeouts = &config.timeouts;

    for (field, value) in [
        ("timeouts.request", timeouts.request),
        ("timeouts.health_probe", timeouts.health_probe),
        ("timeouts.connect", timeouts.connect),
    ] {
        if value.as_millis() == 0 {
            return Err(ValidationError::ZeroTimeout {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

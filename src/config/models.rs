use crate::health::{DEFAULT_SAMPLE_PLAYLIST_URL, DEFAULT_SAMPLE_VIDEO_URL};
use crate::humanize::HumanDuration;
use crate::resolver::{
    DEFAULT_OEMBED_ENDPOINT, DEFAULT_PLAYLIST_ENDPOINT, DEFAULT_THUMBNAIL_TEMPLATE,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Lookup endpoints and thumbnail derivation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Playlist lookup, queried as `<endpoint>?url=<youtube url>`
    #[serde(default = "default_playlist_endpoint")]
    pub playlist_endpoint: String,
    /// oEmbed-style lookup, queried as `<endpoint>?url=<youtube url>`
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,
    /// Must contain `{video_id}`
    #[serde(default = "default_thumbnail_template")]
    pub thumbnail_template: String,
    pub user_agent: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            playlist_endpoint: default_playlist_endpoint(),
            oembed_endpoint: default_oembed_endpoint(),
            thumbnail_template: default_thumbnail_template(),
            user_agent: None,
        }
    }
}

fn default_playlist_endpoint() -> String {
    DEFAULT_PLAYLIST_ENDPOINT.to_string()
}

fn default_oembed_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

fn default_thumbnail_template() -> String {
    DEFAULT_THUMBNAIL_TEMPLATE.to_string()
}

/// Request deadlines
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_request_timeout")]
    pub request: HumanDuration,
    #[serde(default = "default_health_probe_timeout")]
    pub health_probe: HumanDuration,
    #[serde(default = "default_connect_timeout")]
    pub connect: HumanDuration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
            health_probe: default_health_probe_timeout(),
            connect: default_connect_timeout(),
        }
    }
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration::from_millis(10_000)
}

fn default_health_probe_timeout() -> HumanDuration {
    HumanDuration::from_millis(5_000)
}

fn default_connect_timeout() -> HumanDuration {
    HumanDuration::from_millis(5_000)
}

/// Backoff policy for provider lookups
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay: HumanDuration,
    #[serde(default = "default_max_delay")]
    pub max_delay: HumanDuration,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    /// Skip retries for failures that cannot change on a second try
    #[serde(default)]
    pub transient_only: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
            backoff_factor: default_backoff_factor(),
            transient_only: false,
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> HumanDuration {
    HumanDuration::from_millis(1000)
}

fn default_max_delay() -> HumanDuration {
    HumanDuration::from_millis(10_000)
}

fn default_backoff_factor() -> f64 {
    2.0
}

/// Sample links used by provider probes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    #[serde(default = "default_sample_video_url")]
    pub sample_video_url: String,
    #[serde(default = "default_sample_playlist_url")]
    pub sample_playlist_url: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            sample_video_url: default_sample_video_url(),
            sample_playlist_url: default_sample_playlist_url(),
        }
    }
}

fn default_sample_video_url() -> String {
    DEFAULT_SAMPLE_VIDEO_URL.to_string()
}

fn default_sample_playlist_url() -> String {
    DEFAULT_SAMPLE_PLAYLIST_URL.to_string()
}

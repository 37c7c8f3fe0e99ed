//! Liveness probes for the two lookup providers

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::{self, DEFAULT_PROBE_TIMEOUT, FetchConfig, FetchError, HttpFetcher};
use crate::resolver::{DEFAULT_OEMBED_ENDPOINT, DEFAULT_PLAYLIST_ENDPOINT};

pub const DEFAULT_SAMPLE_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const DEFAULT_SAMPLE_PLAYLIST_URL: &str =
    "https://www.youtube.com/playlist?list=PLFgquLnL59alCl_2TQvOiD5Vgm1hCaGSI";

/// Per-provider liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Playlist lookup endpoint
    pub provider_a: bool,
    /// oEmbed endpoint
    pub provider_b: bool,
}

#[derive(Debug, Clone, Builder)]
pub struct ProbeSettings {
    #[builder(into, default = DEFAULT_PLAYLIST_ENDPOINT.to_string())]
    pub playlist_endpoint: String,
    #[builder(into, default = DEFAULT_OEMBED_ENDPOINT.to_string())]
    pub oembed_endpoint: String,
    #[builder(into, default = DEFAULT_SAMPLE_VIDEO_URL.to_string())]
    pub sample_video_url: String,
    #[builder(into, default = DEFAULT_SAMPLE_PLAYLIST_URL.to_string())]
    pub sample_playlist_url: String,
    #[builder(default = DEFAULT_PROBE_TIMEOUT)]
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct HealthProber {
    fetcher: HttpFetcher,
    settings: ProbeSettings,
}

impl HealthProber {
    pub fn new(fetch_config: &FetchConfig, settings: ProbeSettings) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(fetch_config)?;
        Ok(Self::with_fetcher(fetcher, settings))
    }

    pub fn with_fetcher(fetcher: HttpFetcher, settings: ProbeSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Probe both providers concurrently; each flag is settled on its own.
    pub async fn check_health(&self) -> ApiHealth {
        let s = &self.settings;
        let (provider_a, provider_b) = tokio::join!(
            self.probe(&s.playlist_endpoint, &s.sample_playlist_url),
            self.probe(&s.oembed_endpoint, &s.sample_video_url),
        );

        ApiHealth {
            provider_a,
            provider_b,
        }
    }

    /// True when any HTTP response arrives before the deadline
    async fn probe(&self, endpoint: &str, sample: &str) -> bool {
        let url = match fetch::lookup_url(endpoint, sample) {
            Ok(url) => url,
            Err(e) => {
                warn!(endpoint, error = %e, "Health probe skipped");
                return false;
            }
        };

        match self
            .fetcher
            .fetch_with_timeout(url, &[], self.settings.timeout)
            .await
        {
            Ok(response) => {
                debug!(endpoint, status = response.status().as_u16(), "Provider reachable");
                true
            }
            Err(e) => {
                warn!(endpoint, error = %e, "Provider unreachable");
                false
            }
        }
    }
}

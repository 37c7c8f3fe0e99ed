//! Metadata resolution for saved YouTube links
//!
//! [`MetadataResolver::resolve`] turns an arbitrary URL into a title and a
//! thumbnail. It tries the live lookup endpoints first (playlist lookup for
//! playlist-only links, oEmbed for everything else), retrying with backoff,
//! and degrades to data synthesized from the URL's ids when the endpoints are
//! exhausted. It never returns an error: the outcome is encoded in
//! [`ResolutionResult::success`] and [`ResolutionResult::source`].

use bon::Builder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::extract::ExtractedIds;
use crate::fetch::{self, DEFAULT_REQUEST_TIMEOUT, FetchConfig, FetchError, HttpFetcher};
use crate::retry::{RetryPolicy, retry_with_backoff, retry_with_backoff_if};

pub const DEFAULT_PLAYLIST_ENDPOINT: &str = "https://yt-playlist-info.vercel.app/api/playlist";
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://noembed.com/embed";
pub const DEFAULT_THUMBNAIL_TEMPLATE: &str = "https://img.youtube.com/vi/{video_id}/mqdefault.jpg";

/// Substituted with the video id in thumbnail templates
pub const VIDEO_ID_PLACEHOLDER: &str = "{video_id}";

/// Thumbnail value used when no image can be derived
pub const PLACEHOLDER_THUMBNAIL: &str = "placeholder";

const UNTITLED: &str = "Untitled";
const DEFAULT_PLAYLIST_TITLE: &str = "YouTube Playlist";
const GENERIC_TITLE: &str = "YouTube Content";

const JSON_HEADERS: &[(&str, &str)] = &[("accept", "application/json")];

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed provider response: {0}")]
    Decode(String),

    #[error("Provider reported an error: {0}")]
    Provider(String),

    #[error("Playlist response contained no items")]
    EmptyPlaylist,

    #[error("Invalid thumbnail template: {0}")]
    InvalidThumbnailTemplate(String),
}

impl ResolveError {
    /// Network trouble and server-side statuses; everything else is
    /// deterministic for a given URL.
    pub fn is_transient(&self) -> bool {
        match self {
            ResolveError::Fetch(e) => e.is_transient(),
            ResolveError::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Title and thumbnail for a saved link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
}

/// Which tier produced the returned data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub data: VideoMetadata,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub source: MetadataSource,
}

impl ResolutionResult {
    fn primary(data: VideoMetadata) -> Self {
        Self {
            data,
            success: true,
            error: None,
            source: MetadataSource::Primary,
        }
    }

    fn fallback(data: VideoMetadata) -> Self {
        Self {
            data,
            success: true,
            error: None,
            source: MetadataSource::Fallback,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            data: VideoMetadata {
                title: GENERIC_TITLE.to_string(),
                thumbnail_url: PLACEHOLDER_THUMBNAIL.to_string(),
            },
            success: false,
            error: Some(error),
            source: MetadataSource::Fallback,
        }
    }
}

/// Endpoints, deadlines and retry tuning for a resolver
#[derive(Debug, Clone, Builder)]
pub struct ResolverSettings {
    #[builder(into, default = DEFAULT_PLAYLIST_ENDPOINT.to_string())]
    pub playlist_endpoint: String,
    #[builder(into, default = DEFAULT_OEMBED_ENDPOINT.to_string())]
    pub oembed_endpoint: String,
    #[builder(into, default = DEFAULT_THUMBNAIL_TEMPLATE.to_string())]
    pub thumbnail_template: String,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default)]
    pub retry: RetryPolicy,
    /// Only retry failures that [`ResolveError::is_transient`] accepts
    #[builder(default)]
    pub transient_only: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

// Playlist lookup response
#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    #[serde(default)]
    playlist_info: Option<PlaylistInfo>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PlaylistInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Option<Vec<PlaylistItem>>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    thumbnail: Option<String>,
}

// oEmbed response
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Resolves URLs into [`ResolutionResult`]s. Stateless across calls.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    fetcher: HttpFetcher,
    settings: ResolverSettings,
}

impl MetadataResolver {
    pub fn new(fetch_config: &FetchConfig, settings: ResolverSettings) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(fetch_config)?;
        Ok(Self::with_fetcher(fetcher, settings))
    }

    pub fn with_fetcher(fetcher: HttpFetcher, settings: ResolverSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve `url` into display metadata. Always produces a result.
    pub async fn resolve(&self, url: &str) -> ResolutionResult {
        let span = info_span!("resolve", resolution_id = %Uuid::now_v7(), url);
        self.resolve_inner(url).instrument(span).await
    }

    async fn resolve_inner(&self, url: &str) -> ResolutionResult {
        let ids = ExtractedIds::from_url(url);
        debug!(video_id = ?ids.video_id, playlist_id = ?ids.playlist_id, "Extracted ids");

        let primary = if ids.is_playlist_only() {
            self.with_retry(|| self.lookup_playlist(url)).await
        } else {
            self.with_retry(|| self.lookup_video(url, &ids)).await
        };

        match primary {
            Ok(data) => {
                debug!(title = %data.title, "Resolved from provider");
                ResolutionResult::primary(data)
            }
            Err(e) => {
                warn!(error = %e, "Provider lookup exhausted, using fallback metadata");
                self.fallback(&ids)
            }
        }
    }

    async fn with_retry<F, Fut>(&self, operation: F) -> Result<VideoMetadata, ResolveError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<VideoMetadata, ResolveError>>,
    {
        let policy = &self.settings.retry;
        if self.settings.transient_only {
            retry_with_backoff_if(policy, operation, ResolveError::is_transient).await
        } else {
            retry_with_backoff(policy, operation).await
        }
    }

    async fn lookup_playlist(&self, url: &str) -> Result<VideoMetadata, ResolveError> {
        let body: PlaylistResponse = self.get_json(&self.settings.playlist_endpoint, url).await?;

        if let Some(message) = provider_error(body.error) {
            return Err(ResolveError::Provider(message));
        }

        let info = body.playlist_info.ok_or(ResolveError::EmptyPlaylist)?;
        let items = info.items.unwrap_or_default();
        let first = items.first().ok_or(ResolveError::EmptyPlaylist)?;

        Ok(VideoMetadata {
            title: non_empty(info.title).unwrap_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string()),
            thumbnail_url: non_empty(first.thumbnail.clone())
                .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
        })
    }

    async fn lookup_video(
        &self,
        url: &str,
        ids: &ExtractedIds,
    ) -> Result<VideoMetadata, ResolveError> {
        let body: OEmbedResponse = self.get_json(&self.settings.oembed_endpoint, url).await?;

        if let Some(message) = provider_error(body.error) {
            return Err(ResolveError::Provider(message));
        }

        // A locally known id always wins over the provider's thumbnail
        let thumbnail_url = match &ids.video_id {
            Some(id) => self.thumbnail_for(id)?,
            None => non_empty(body.thumbnail_url)
                .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
        };

        Ok(VideoMetadata {
            title: non_empty(body.title).unwrap_or_else(|| UNTITLED.to_string()),
            thumbnail_url,
        })
    }

    /// One bounded GET against `endpoint?url=<target>`, decoded as JSON.
    /// The deadline covers both the response head and the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        target: &str,
    ) -> Result<T, ResolveError> {
        let timeout = self.settings.request_timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        let request_url = fetch::lookup_url(endpoint, target)?;
        let response = self
            .fetcher
            .fetch_with_timeout(request_url, JSON_HEADERS, timeout)
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::HttpStatus(status.as_u16()));
        }

        let body = tokio::time::timeout_at(deadline, response.bytes())
            .await
            .map_err(|_| FetchError::Timeout(timeout))?
            .map_err(|e| FetchError::RequestFailed(format!("Failed to read body: {e}")))?;

        serde_json::from_slice(&body).map_err(|e| ResolveError::Decode(e.to_string()))
    }

    fn fallback(&self, ids: &ExtractedIds) -> ResolutionResult {
        match self.synthesize(ids) {
            Ok(data) => ResolutionResult::fallback(data),
            Err(e) => {
                error!(error = %e, "Could not synthesize fallback metadata");
                ResolutionResult::failed(e.to_string())
            }
        }
    }

    /// Metadata built from the ids alone, no I/O
    fn synthesize(&self, ids: &ExtractedIds) -> Result<VideoMetadata, ResolveError> {
        let thumbnail_url = match &ids.video_id {
            Some(id) => self.thumbnail_for(id)?,
            None => PLACEHOLDER_THUMBNAIL.to_string(),
        };

        let title = match (&ids.video_id, &ids.playlist_id) {
            (Some(video_id), _) => format!("YouTube Video ({video_id})"),
            (None, Some(playlist_id)) => format!("YouTube Playlist ({playlist_id})"),
            (None, None) => GENERIC_TITLE.to_string(),
        };

        Ok(VideoMetadata {
            title,
            thumbnail_url,
        })
    }

    pub fn thumbnail_for(&self, video_id: &str) -> Result<String, ResolveError> {
        thumbnail_url(&self.settings.thumbnail_template, video_id)
    }
}

/// Expand a thumbnail template for `video_id`
pub fn thumbnail_url(template: &str, video_id: &str) -> Result<String, ResolveError> {
    if !template.contains(VIDEO_ID_PLACEHOLDER) {
        return Err(ResolveError::InvalidThumbnailTemplate(format!(
            "'{template}' has no {VIDEO_ID_PLACEHOLDER} placeholder"
        )));
    }

    let url = template.replace(VIDEO_ID_PLACEHOLDER, video_id);
    reqwest::Url::parse(&url)
        .map_err(|e| ResolveError::InvalidThumbnailTemplate(format!("'{template}': {e}")))?;

    Ok(url)
}

fn provider_error(error: Option<serde_json::Value>) -> Option<String> {
    match error? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(message) if message.is_empty() => None,
        serde_json::Value::String(message) => Some(message),
        other => Some(other.to_string()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

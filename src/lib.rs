pub mod api;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod health;
pub mod humanize;
pub mod observability;
pub mod resolver;
pub mod retry;

pub use extract::{ExtractedIds, extract_playlist_id, extract_video_id};
pub use health::{ApiHealth, HealthProber};
pub use resolver::{MetadataResolver, MetadataSource, ResolutionResult, VideoMetadata};
pub use retry::{RetryPolicy, retry_with_backoff};

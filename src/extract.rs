//! YouTube URL identifier extraction
//!
//! Pure, total parsing of arbitrary input into an optional video id and an
//! optional playlist id. Nothing here performs I/O or returns an error: input
//! that matches no known shape simply yields `None`.

use regex::Regex;
use std::sync::LazyLock;

/// YouTube video ids are always this long
pub const VIDEO_ID_LEN: usize = 11;

/// Video id patterns, tried in order; the first 11-character capture wins.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Short link: youtu.be/<id>
        Regex::new(r"youtu\.be/([^#&?/]*)").unwrap(),
        // Canonical forms
        Regex::new(r"youtube(?:-nocookie)?\.com/(?:watch\?v=|embed/|v/|shorts/|live/)([^#&?/]*)")
            .unwrap(),
        // Catch-all: any v= query parameter or /v/ path segment
        Regex::new(r"(?:[?&]v=|/v/)([^#&?/]*)").unwrap(),
    ]
});

static PLAYLIST_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^#&]*)").unwrap());

/// Identifiers parsed from a single URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedIds {
    pub video_id: Option<String>,
    pub playlist_id: Option<String>,
}

impl ExtractedIds {
    pub fn from_url(url: &str) -> Self {
        Self {
            video_id: extract_video_id(url),
            playlist_id: extract_playlist_id(url),
        }
    }

    /// A playlist lookup only makes sense when there is no video to anchor on
    pub fn is_playlist_only(&self) -> bool {
        self.playlist_id.is_some() && self.video_id.is_none()
    }
}

/// Extract an 11-character video id, rejecting partial or oversized matches
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .filter_map(|re| re.captures(url))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|candidate| candidate.chars().count() == VIDEO_ID_LEN)
        .map(str::to_owned)
}

/// Extract the raw `list=` query value
pub fn extract_playlist_id(url: &str) -> Option<String> {
    PLAYLIST_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

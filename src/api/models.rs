//! Wire models for the HTTP surface.
//!
//! `GET /resolve?url=...` answers with [`crate::resolver::ResolutionResult`]
//! and `GET /providers/health` with [`crate::health::ApiHealth`]; both are
//! serialized as-is. The types here cover the remaining envelopes.

use serde::{Deserialize, Serialize};

/// Query string for `GET /resolve`
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

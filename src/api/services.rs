use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{
    error::ApiError,
    models::{HealthResponse, ResolveQuery},
    state::AppState,
};
use crate::health::ApiHealth;
use crate::observability::MetricsSnapshot;
use crate::resolver::ResolutionResult;

/// Metadata lookup for a link the user is saving (GET /resolve?url=...)
///
/// Any string is accepted as `url`; links with no recognizable ids still get
/// a fallback title. Only a missing parameter is rejected.
pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let url = query
        .url
        .ok_or_else(|| ApiError::InvalidQuery("missing 'url' query parameter".to_string()))?;

    let result = state.resolver.resolve(&url).await;
    state.metrics.record_resolution(&result);

    Ok(Json(result))
}

/// Live/dead status of both lookup providers (GET /providers/health)
pub async fn provider_health(State(state): State<AppState>) -> Json<ApiHealth> {
    let health = state.prober.check_health().await;
    state.metrics.health_checked();
    Json(health)
}

/// Counter snapshot (GET /operators/metrics)
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// Process liveness (GET /health)
pub async fn health() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    services::{health, metrics, provider_health, resolve},
    state::AppState,
};
use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::health::HealthProber;
use crate::resolver::MetadataResolver;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Routes for the resolution service
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/resolve", get(resolve))
        .route("/providers/health", get(provider_health))
        .route("/operators/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Build resolver and prober from `config`, sharing one HTTP client
pub fn build_state(config: &Config) -> Result<AppState, AnyError> {
    let fetcher = HttpFetcher::new(&config.fetch_config())?;
    let resolver = MetadataResolver::with_fetcher(fetcher.clone(), config.resolver_settings());
    let prober = HealthProber::with_fetcher(fetcher, config.probe_settings());
    Ok(AppState::new(resolver, prober))
}

pub async fn run(address: SocketAddr, config: Config) -> Result<(), AnyError> {
    let state = build_state(&config)?;
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "tubemark API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

//! mapfeed API Server
//!
//! Serves RSS feeds of recent updates for a map client, built from a comment
//! service and from a multi-layer WFS endpoint.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod feed;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::HttpUpstreamClient;
use app::{FeedService, ResponseCache};
use config::{Config, FeedsConfig};
use domain::ports::UpstreamClient;

/// Application state shared across all handlers
pub struct AppState<C: UpstreamClient> {
    pub feed_service: Arc<FeedService<C>>,
    pub cache: Arc<ResponseCache>,
}

impl<C: UpstreamClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            feed_service: self.feed_service.clone(),
            cache: self.cache.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router: a health probe, everything else is a feed lookup
pub fn build_router<C: UpstreamClient>(state: AppState<C>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Feeds, looked up by path
        .fallback(handlers::serve_feed::<C>)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mapfeed_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mapfeed API...");

    // Load configuration
    let config = Config::from_env();
    let feeds = FeedsConfig::load(&config.feeds_config_path).with_context(|| {
        format!(
            "loading feed configuration from {}",
            config.feeds_config_path.display()
        )
    })?;
    tracing::info!(
        "Loaded {} feeds from {}",
        feeds.paths.len(),
        config.feeds_config_path.display()
    );

    // Create adapters
    let upstream = Arc::new(
        HttpUpstreamClient::new(config.upstream_timeout).context("building HTTP client")?,
    );

    // Create application services
    let feed_service = Arc::new(FeedService::new(
        upstream,
        Arc::new(feeds),
        config.request_timeout,
        config.fetch_concurrency,
    ));

    let state = AppState {
        feed_service,
        cache: Arc::new(ResponseCache::new(
            config.cache_ttl,
            config.cache_max_entries,
        )),
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("binding {}", config.address))?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app).await?;

    Ok(())
}

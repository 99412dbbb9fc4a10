//! RPS Wager Service
//!
//! HTTP service exposing the escrowed rock-paper-scissors engine.
//! The transport layer authenticates callers (modeled here as the
//! `X-Player-Id` header) and serializes operations; the engine itself
//! lives in rps-wager-core.

mod handlers;
mod state;

use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::api_router;
use state::AppState;

/// Default timeout threshold in logical clock ticks
const DEFAULT_PERIOD_LENGTH: u64 = 10;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    // periodLength is fixed at initialization and immutable afterwards
    let period_length = std::env::var("PERIOD_LENGTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PERIOD_LENGTH);
    tracing::info!(period_length, "reveal period configured");

    let state = AppState::new(period_length);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api_router(state).layer(cors);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("rps-wager-service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

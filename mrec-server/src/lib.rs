//! mrec-server library interface
//!
//! Music recognition service: accepts an uploaded clip, asks the external
//! recognition service what it is, and answers with normalized track metadata.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::services::{AudioStore, ConnectionRegistry, Recognizer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// External recognition service
    pub recognizer: Arc<dyn Recognizer>,
    /// Destination for copies of uploaded clips
    pub audio_store: AudioStore,
    /// Answer "not recognized" with 404 instead of 200
    pub strict_status_codes: bool,
    /// Largest accepted `/recognize` body
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream failure for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn Recognizer>, audio_store: AudioStore) -> Self {
        Self {
            recognizer,
            audio_store,
            strict_status_codes: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_strict_status_codes(mut self, strict: bool) -> Self {
        self.strict_status_codes = strict;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (landing page and recorder script)
        .merge(api::ui_routes())
        // API routes
        .merge(api::recognize_routes(state.max_upload_bytes))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until `shutdown` resolves, then drain `connections`
///
/// The registry is never part of the handler state. It is closed only after
/// in-flight requests have finished. Returns the number of connections closed.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    connections: ConnectionRegistry,
    shutdown: F,
) -> std::io::Result<usize>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Shutting down...");
    Ok(connections.close_all().await)
}

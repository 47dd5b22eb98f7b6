//! joia-ui library interface
//!
//! Exposes the application state, router, and the library/job components
//! for integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod jobs;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::jobs::client::KaraokeClient;
use crate::jobs::JobRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (the song library)
    pub db: SqlitePool,
    /// Client for the external karaoke generation service
    pub karaoke: Arc<KaraokeClient>,
    /// In-memory registry of active karaoke creation jobs
    pub jobs: JobRegistry,
    /// Interval between job status polls
    pub poll_interval: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, karaoke: Arc<KaraokeClient>, poll_interval: Duration) -> Self {
        Self {
            db,
            karaoke,
            jobs: JobRegistry::new(),
            poll_interval,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::song_routes())
        .merge(api::karaoke_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

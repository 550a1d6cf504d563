//! vocabox-we library interface
//!
//! Exposes the application state, router construction, and the service
//! layer for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::services::{Enricher, Suggester};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Enrichment orchestrator
    pub enricher: Arc<Enricher>,
    /// Suggestion merger
    pub suggester: Arc<Suggester>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, enricher: Arc<Enricher>, suggester: Arc<Suggester>) -> Self {
        Self {
            db,
            enricher,
            suggester,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Word images stored by the asset store are served back under `/assets`.
pub fn build_router(state: AppState, assets_dir: PathBuf) -> Router {
    Router::new()
        .merge(api::word_routes())
        .merge(api::health_routes())
        .nest_service("/assets", ServeDir::new(assets_dir))
        .with_state(state)
}

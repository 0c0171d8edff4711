//! Sleep Disorder Risk - Web Backend
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SLEEP RISK SERVER                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌──────────────────────────┐  │
//! │  │  API      │  │  Auth     │  │  ClassificationService   │  │
//! │  │  (Axum)   │  │  (JWT)    │  │  (scaler + forest, Arc)  │  │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬─────────────┘  │
//! │        └──────────────┼─────────────────────┘                │
//! │                       ▼                                      │
//! │                ┌─────────────┐                               │
//! │                │   SQLite    │                               │
//! │                └─────────────┘                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sleeprisk_core::ClassificationService;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: Config,
    /// Loaded once at startup, never mutated
    pub classifier: ClassificationService,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/admin/login", post(handlers::auth::admin_login));

    // Authenticated routes (user or admin JWT)
    let protected_routes = Router::new()
        // Analyses
        .route(
            "/api/v1/analyses",
            post(handlers::analyses::create).get(handlers::analyses::list),
        )
        .route("/api/v1/analyses/:id", get(handlers::analyses::get))
        .route("/api/v1/analyses/:id/report", get(handlers::analyses::report))

        // Admin
        .route("/api/v1/admin/reports", get(handlers::admin::reports))
        .route("/api/v1/admin/reports/:id", get(handlers::admin::report))
        .route("/api/v1/admin/urgent", get(handlers::admin::urgent))
        .route("/api/v1/admin/stats", get(handlers::admin::stats))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

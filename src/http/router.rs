//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Site CRUD
        .route("/sites", get(handlers::list_sites))
        .route("/sites", post(handlers::create_site))
        .route("/sites/{site_id}", get(handlers::get_site))
        .route("/sites/{site_id}", put(handlers::update_site))
        // Availability queries
        .route("/sites/{site_id}/open", get(handlers::get_open_status))
        .route("/sites/{site_id}/next-open", get(handlers::get_next_open))
        // Loans
        .route("/loans", get(handlers::list_loans))
        .route("/loans", post(handlers::create_loan))
        .route("/loans/{loan_id}", get(handlers::get_loan))
        // Batch job triggers
        .route("/tasks/clean-exceptions", post(handlers::run_clean_exceptions))
        .route("/tasks/extend-loans", post(handlers::run_extend_loans))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

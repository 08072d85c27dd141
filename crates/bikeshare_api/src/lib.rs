//! Bike-share API Library
//!
//! This library provides the HTTP API over the in-memory station repository.

mod station;

pub use station::{ErrorResponse, ImportResponse};

use axum::{
    Router,
    routing::{get, post},
};
use bikeshare_core::StationRepository;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(repository: StationRepository) -> Router {
    let shared_repository = Arc::new(repository);
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/stations",
            get(station::list_stations).post(station::create_station),
        )
        .route("/stations/import", post(station::import_stations))
        .route(
            "/stations/{id}",
            get(station::get_station)
                .put(station::update_station)
                .delete(station::delete_station),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(shared_repository)
}

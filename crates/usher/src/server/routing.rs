//! Axum router configuration for all endpoints

use axum::{
  routing::{get, post},
  Router,
};
use std::sync::Arc;

use crate::server::handlers::{recommendations, status};
use crate::server::services::recommender::Recommender;

/// Create the main application router
pub fn create_router(recommender: Arc<Recommender>) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    // Recommendation endpoint
    .route("/recommendations", post(recommendations::get_recommendations))
    // Share the recommender as axum state; the index inside is read-only
    // after startup so concurrent requests need no extra locking
    .with_state(recommender)
}

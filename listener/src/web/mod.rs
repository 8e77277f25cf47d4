//! Web server module for the hub listener.
//!
//! This module provides:
//! - The verification handshake (`GET /listener`)
//! - The signed delivery endpoint (`POST /listener`)
//! - Health and greeting routes

pub mod handlers;
pub mod signature;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    delivery, health, hello, log_delivery, subscription_challenge, validate_delivery,
    validate_mode, validate_subscription, AppState, Delivery, HealthResponse,
};
pub use signature::{generate_signature, verify_signature, SignatureAlgorithm, SIGNATURE_HEADER};

/// Path serving both the handshake and deliveries.
pub const LISTENER_PATH: &str = "/listener";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/hello", get(hello))
        .route(LISTENER_PATH, get(subscription_challenge).post(delivery))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

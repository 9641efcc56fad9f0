//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`availability`] - quote/search (slots + price breakdown)
//! - [`bookings`] - booking lifecycle endpoints

pub mod availability;
pub mod bookings;
pub mod health;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(availability::router())
        .merge(bookings::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

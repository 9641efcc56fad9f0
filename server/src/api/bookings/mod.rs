//! Booking API Module
//!
//! All mutations go through the lifecycle manager; reads are token-scoped.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Booking router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{token}", get(handler::get_by_token).patch(handler::update))
        .route("/{token}/confirm", post(handler::confirm))
        .route("/{token}/cancel", post(handler::cancel))
        .route("/{token}/payment", post(handler::payment))
}

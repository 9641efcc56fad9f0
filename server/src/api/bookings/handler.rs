//! Booking API Handlers
//!
//! Bookings are addressed by their magic-link token: the opaque credential
//! issued at creation that lets a customer view and manage the booking
//! without authentication.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::Booking;
use crate::db::repository::BookingRepository;
use crate::engine::{BookingLifecycle, PaymentOutcome};
use crate::utils::validation::{CreateBookingInput, UpdateBookingInput};
use crate::utils::{AppError, AppResult};

/// Create a pending booking: allocation + pricing + TTL hold
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateBookingInput>,
) -> AppResult<Json<Booking>> {
    let lifecycle = BookingLifecycle::from_state(&state);
    let booking = lifecycle.create(&payload).await?;
    Ok(Json(booking))
}

/// Fetch a booking by its magic-link token
pub async fn get_by_token(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    Ok(Json(booking))
}

/// Revise contact details and extras while the booking is PENDING
pub async fn update(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    Json(payload): Json<UpdateBookingInput>,
) -> AppResult<Json<Booking>> {
    let lifecycle = BookingLifecycle::from_state(&state);
    let booking = lifecycle.update(&token, &payload).await?;
    Ok(Json(booking))
}

/// Confirmation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub booking: Booking,
}

/// Confirm a pending booking (idempotent for already-confirmed ones)
pub async fn confirm(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<ConfirmResponse>> {
    let lifecycle = BookingLifecycle::from_state(&state);
    let (booking, already_confirmed) = lifecycle.confirm(&token).await?;
    Ok(Json(ConfirmResponse {
        success: true,
        message: already_confirmed.then(|| "Booking already confirmed".to_string()),
        booking,
    }))
}

/// Cancel a booking, freeing its interval
pub async fn cancel(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<Booking>> {
    let lifecycle = BookingLifecycle::from_state(&state);
    let booking = lifecycle.cancel(&token).await?;
    Ok(Json(booking))
}

/// Payment authority callback body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub outcome: PaymentOutcome,
}

/// Apply a payment outcome reported by the payment authority
pub async fn payment(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<Booking>> {
    let lifecycle = BookingLifecycle::from_state(&state);
    let booking = lifecycle.payment_outcome(&token, payload.outcome).await?;
    Ok(Json(booking))
}

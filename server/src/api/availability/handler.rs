//! Availability API Handlers
//!
//! The quote/search endpoint: slot enumeration plus the price breakdown a
//! customer would pay, computed by the same engine that later persists the
//! booking.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{PricingRepository, PromoRepository, RepoError, StaffRepository};
use crate::engine::{EngineContext, SlotQuery, compute_quote, enumerate_slots, pricing};
use crate::engine::pricing::{PricingContext, QuoteInputs};
use crate::utils::time::{minutes_of, now_millis, today_in_tz};
use crate::utils::validation::{self, FieldErrors, QuoteInput};
use crate::utils::{AppError, AppResult};

/// Price breakdown as quoted to the customer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingView {
    pub base_total: i64,
    pub extras_price: i64,
    pub discount_amount: i64,
    pub promo_discount_amount: i64,
    pub total_price: i64,
    pub deposit_due_now: i64,
    pub promo_applied: Option<String>,
}

/// Quote response: valid start times plus the price breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub date: String,
    pub slots: Vec<String>,
    pub pricing: PricingView,
}

/// Quote/search: slot list + price breakdown for a date
pub async fn quote(
    State(state): State<ServerState>,
    Query(input): Query<QuoteInput>,
) -> AppResult<Json<QuoteResponse>> {
    let params = validation::normalize_quote(&input).map_err(AppError::ValidationFields)?;

    let db = state.get_db();
    let pricing_repo = PricingRepository::new(db.clone());
    let tiers = pricing_repo.find_tiers().await?;
    let options = pricing_repo.find_extra_hours_options().await?;
    let offers = pricing_repo.find_enabled_offers().await?;

    let mut errors = FieldErrors::new();
    if let Err(e) = validation::validate_guests_against_tiers(params.guests, &tiers) {
        errors.extend(e);
    }
    if let Err(e) = validation::validate_extra_hours_option(params.extra_hours, &options) {
        errors.extend(e);
    }

    let staff = match &params.staff_id {
        Some(raw) => match StaffRepository::new(db.clone()).find_by_id(raw).await {
            Ok(Some(member)) if member.is_active => member.id,
            Ok(_) | Err(RepoError::Validation(_)) => {
                errors.insert("staffId".into(), format!("Unknown staff member: {raw}"));
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(AppError::ValidationFields(errors));
    }

    let tz = state.config.timezone;
    let day = EngineContext::new(db.clone(), tz).load_day(params.date).await?;

    // An invalid or exhausted code quietly prices as "no promo"
    let promo = match &params.promo_code {
        Some(code) => PromoRepository::new(db.clone()).find_by_code(code).await?,
        None => None,
    };

    let breakdown = compute_quote(
        &PricingContext {
            tiers: &tiers,
            extra_hours_options: &options,
            offers: &offers,
            settings: &day.settings,
        },
        &QuoteInputs {
            date: params.date,
            today: today_in_tz(tz),
            guests: params.guests,
            extra_hours: params.extra_hours,
            promo: promo.as_ref(),
        },
    );

    let now = now_millis();
    let slots = match (&day.window, day.range) {
        (Some(window), Some((window_start, window_end))) => {
            let duration_minutes =
                day.settings.base_session_minutes + params.extra_hours as i64 * 60;
            enumerate_slots(&SlotQuery {
                rooms: &day.rooms,
                bookings: &day.bookings,
                blocks: &day.blocks,
                window_start_ms: window_start,
                window_end_ms: window_end,
                open_minutes: minutes_of(window.open),
                duration_minutes,
                guests: params.guests,
                staff: staff.as_ref(),
                earliest_start_ms: now + day.settings.min_lead_millis(),
                now_ms: now,
            })
        }
        // Closed date: empty slot list, never an error
        _ => Vec::new(),
    };

    Ok(Json(QuoteResponse {
        date: params.date.to_string(),
        slots,
        pricing: PricingView {
            base_total: breakdown.base_price,
            extras_price: breakdown.extra_hours_price,
            discount_amount: breakdown.discount_amount,
            promo_discount_amount: breakdown.promo_discount_amount,
            total_price: breakdown.total_price,
            deposit_due_now: pricing::amount_due_now(breakdown.total_price, &day.settings),
            promo_applied: breakdown.applied_promo,
        },
    }))
}

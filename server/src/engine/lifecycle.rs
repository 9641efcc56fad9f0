//! Booking Lifecycle Manager
//!
//! Owns the DRAFT → PENDING → {CONFIRMED | CANCELLED | FAILED | NO_SHOW}
//! state machine: creation (allocation + pricing under lease), customer
//! updates while PENDING, idempotent confirmation, cancellation, payment
//! outcomes and TTL expiry of unpaid holds.

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Deserialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;
use uuid::Uuid;

use super::allocate::{AllocationQuery, allocate_candidates};
use super::conflict::{booking_blocks, overlaps};
use super::context::EngineContext;
use super::pricing::{self, PricingContext, QuoteInputs};
use super::slots::SLOT_STEP_MINUTES;
use crate::core::state::{LeaseRegistry, ServerState};
use crate::db::models::{Booking, BookingStatus, Extra, VenueSettings};
use crate::db::repository::{
    BookingRepository, PricingRepository, PromoRepository, RepoError, SettingsRepository,
    StaffRepository,
};
use crate::utils::AppError;
use crate::utils::time::{minutes_of, now_millis, today_in_tz};
use crate::utils::validation::{
    self, CreateBookingInput, CustomerInput, ExtraSelectionInput, FieldErrors, UpdateBookingInput,
};

/// Lifecycle operation errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("No room available for the requested time")]
    NoAvailability,

    #[error("{0}")]
    InvalidState(String),

    #[error("Booking not found")]
    NotFound,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<LifecycleError> for AppError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation(fields) => AppError::ValidationFields(fields),
            LifecycleError::NoAvailability => {
                AppError::Conflict("No room available for the requested time".into())
            }
            LifecycleError::InvalidState(msg) => AppError::InvalidState(msg),
            LifecycleError::NotFound => AppError::NotFound("Booking not found".into()),
            LifecycleError::Repo(e) => e.into(),
        }
    }
}

/// Payment authority verdict for a pending booking
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success,
    Failure,
    Cancelled,
}

/// Whether a booking's hold on its interval has lapsed.
///
/// Expiry is a computed condition: the stored status may still read
/// PENDING until the sweep catches up.
pub fn is_expired(booking: &Booking, now: i64) -> bool {
    matches!(
        booking.status,
        BookingStatus::Pending | BookingStatus::Draft
    ) && booking.expires_at.is_some_and(|expires| expires <= now)
}

/// Booking lifecycle manager
#[derive(Clone)]
pub struct BookingLifecycle {
    db: Surreal<Db>,
    tz: Tz,
    leases: Arc<LeaseRegistry>,
    pending_ttl_minutes: i64,
}

impl BookingLifecycle {
    pub fn new(
        db: Surreal<Db>,
        tz: Tz,
        leases: Arc<LeaseRegistry>,
        pending_ttl_minutes: i64,
    ) -> Self {
        Self {
            db,
            tz,
            leases,
            pending_ttl_minutes,
        }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(
            state.db.clone(),
            state.config.timezone,
            state.leases.clone(),
            state.config.pending_ttl_minutes,
        )
    }

    /// Create a PENDING booking: validate, price, allocate under lease,
    /// persist with a TTL hold.
    pub async fn create(&self, input: &CreateBookingInput) -> Result<Booking, LifecycleError> {
        let params = validation::normalize_create(input).map_err(LifecycleError::Validation)?;
        let mut errors = FieldErrors::new();

        let pricing_repo = PricingRepository::new(self.db.clone());
        let tiers = pricing_repo.find_tiers().await?;
        let options = pricing_repo.find_extra_hours_options().await?;
        let offers = pricing_repo.find_enabled_offers().await?;

        if let Err(e) = validation::validate_guests_against_tiers(params.quote.guests, &tiers) {
            errors.extend(e);
        }
        if let Err(e) = validation::validate_extra_hours_option(params.quote.extra_hours, &options)
        {
            errors.extend(e);
        }

        // Staff/service references resolve before any interval math
        let requested_staff = self
            .resolve_staff(&params.quote.staff_id, &mut errors)
            .await?;
        let service = resolve_record("serviceId", &params.quote.service_id, &mut errors);

        let ctx = EngineContext::new(self.db.clone(), self.tz);
        let day = ctx.load_day(params.quote.date).await?;

        let now = now_millis();
        let duration_minutes =
            day.settings.base_session_minutes + params.quote.extra_hours as i64 * 60;

        let interval = match (&day.window, day.range) {
            (Some(window), Some((window_start, window_end))) => {
                let open_minutes = minutes_of(window.open);
                let mut slot_minutes = minutes_of(params.start_time);
                if slot_minutes < open_minutes {
                    // Times before opening belong to the post-midnight tail
                    slot_minutes += 24 * 60;
                }
                let offset = slot_minutes - open_minutes;
                let start = window_start + offset * 60_000;
                let end = start + duration_minutes * 60_000;

                if offset % SLOT_STEP_MINUTES != 0 {
                    errors.insert("time".into(), "Not a valid slot start time".into());
                    None
                } else if end > window_end {
                    errors.insert(
                        "time".into(),
                        "The requested time is outside operating hours".into(),
                    );
                    None
                } else if start < now + day.settings.min_lead_millis() {
                    errors.insert(
                        "time".into(),
                        "The requested start is too soon to book".into(),
                    );
                    None
                } else {
                    Some((start, end))
                }
            }
            _ => {
                errors.insert("date".into(), "The venue is closed on this date".into());
                None
            }
        };

        // Extras resolve against the live catalog; the snapshot freezes here
        let selections = self.resolve_extras(&params.extras, &mut errors).await?;

        let Some((start, end)) = interval else {
            return Err(LifecycleError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(LifecycleError::Validation(errors));
        }

        // Pricing: quoted and persisted breakdowns share this computation
        let promo = match &params.quote.promo_code {
            Some(code) => PromoRepository::new(self.db.clone()).find_by_code(code).await?,
            None => None,
        };
        let breakdown = pricing::compute_quote(
            &PricingContext {
                tiers: &tiers,
                extra_hours_options: &options,
                offers: &offers,
                settings: &day.settings,
            },
            &QuoteInputs {
                date: params.quote.date,
                today: today_in_tz(self.tz),
                guests: params.quote.guests,
                extra_hours: params.quote.extra_hours,
                promo: promo.as_ref(),
            },
        );
        let (extras, extras_total) = pricing::extras_lines(&selections, params.quote.guests);
        let total_price = breakdown.total_price + extras_total;

        let candidates = allocate_candidates(&AllocationQuery {
            rooms: &day.rooms,
            staff_pool: &day.staff,
            bookings: &day.bookings,
            blocks: &day.blocks,
            start,
            end,
            now_ms: now,
            guests: params.quote.guests,
            requested_staff: requested_staff.as_ref(),
            service: service.as_ref(),
            exclude: None,
        });

        let booking_repo = BookingRepository::new(self.db.clone());
        for candidate in candidates {
            // Serialize with concurrent creations for the same room/staff,
            // then re-check against fresh rows before inserting
            let _room_lease = self.leases.acquire(&candidate.room.to_string()).await;
            let _staff_lease = match &candidate.staff {
                Some(staff) => Some(self.leases.acquire(&staff.to_string()).await),
                None => None,
            };

            let fresh = booking_repo
                .find_blocking_for_room(&candidate.room, start, end, None)
                .await?;
            if fresh
                .iter()
                .any(|b| booking_blocks(b, now, None) && overlaps(start, end, b.start_at, b.end_at))
            {
                continue;
            }
            if let Some(staff) = &candidate.staff {
                let fresh = booking_repo
                    .find_blocking_for_staff(staff, start, end, None)
                    .await?;
                if fresh.iter().any(|b| {
                    booking_blocks(b, now, None) && overlaps(start, end, b.start_at, b.end_at)
                }) {
                    continue;
                }
            }

            let booking = Booking {
                id: None,
                room: candidate.room.clone(),
                staff_member: candidate.staff.clone(),
                service: service.clone(),
                start_at: start,
                end_at: end,
                guest_count: params.quote.guests,
                first_name: params.customer.first_name.clone(),
                surname: params.customer.surname.clone(),
                email: params.customer.email.clone(),
                phone: params.customer.phone.clone(),
                notes: params.customer.notes.clone(),
                base_price: breakdown.base_price,
                extra_hours: params.quote.extra_hours,
                extra_hours_price: breakdown.extra_hours_price,
                extras: extras.clone(),
                extras_total,
                discount_amount: breakdown.discount_amount,
                promo_discount_amount: breakdown.promo_discount_amount,
                promo_code: breakdown.applied_promo.clone(),
                total_price,
                deposit_amount: pricing::amount_due_now(total_price, &day.settings),
                deposit_paid: false,
                status: BookingStatus::Pending,
                manage_token: Uuid::new_v4().simple().to_string(),
                expires_at: Some(now + self.pending_ttl_minutes * 60_000),
                created_at: now,
                confirmed_at: None,
                cancelled_at: None,
            };

            let created = booking_repo.create(booking).await?;
            tracing::info!(
                booking = %created.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                room = %created.room,
                total = created.total_price,
                "Created pending booking"
            );
            return Ok(created);
        }

        Err(LifecycleError::NoAvailability)
    }

    /// Customer revision while PENDING: contact fields and the extras
    /// selection. Hours and base price are frozen from creation.
    pub async fn update(
        &self,
        token: &str,
        input: &UpdateBookingInput,
    ) -> Result<Booking, LifecycleError> {
        let booking_repo = BookingRepository::new(self.db.clone());
        let booking = self.require_by_token(&booking_repo, token).await?;
        let id = required_id(&booking)?;

        let now = now_millis();
        if booking.status != BookingStatus::Pending {
            return Err(LifecycleError::InvalidState(
                "Only pending bookings can be updated".into(),
            ));
        }
        if is_expired(&booking, now) {
            return Err(LifecycleError::InvalidState(
                "The booking hold has expired".into(),
            ));
        }

        let customer = CustomerInput {
            first_name: trimmed(&input.first_name).or(booking.first_name.clone()),
            surname: trimmed(&input.surname).or(booking.surname.clone()),
            email: trimmed(&input.email).or(booking.email.clone()),
            phone: trimmed(&input.phone).or(booking.phone.clone()),
            notes: trimmed(&input.notes).or(booking.notes.clone()),
        };
        validation::validate_customer(&customer, false).map_err(LifecycleError::Validation)?;

        let mut updated = booking_repo
            .update_contact(
                &id,
                customer.first_name,
                customer.surname,
                customer.email,
                customer.phone,
                customer.notes,
            )
            .await?;

        if let Some(selections) = &input.extras {
            let mut errors = FieldErrors::new();
            let resolved = self.resolve_extras(selections, &mut errors).await?;
            if !errors.is_empty() {
                return Err(LifecycleError::Validation(errors));
            }

            let (lines, extras_total) = pricing::extras_lines(&resolved, booking.guest_count);
            let total_price = booking.session_total() + extras_total;
            let settings = self.settings().await?;
            let deposit_amount = if booking.deposit_paid {
                booking.deposit_amount
            } else {
                pricing::amount_due_now(total_price, &settings)
            };
            updated = booking_repo
                .update_extras(&id, lines, extras_total, total_price, deposit_amount)
                .await?;
        }

        Ok(updated)
    }

    /// PENDING → CONFIRMED after full-strictness customer validation.
    /// Confirming an already-CONFIRMED booking is a no-op success.
    pub async fn confirm(&self, token: &str) -> Result<(Booking, bool), LifecycleError> {
        let booking_repo = BookingRepository::new(self.db.clone());
        let booking = self.require_by_token(&booking_repo, token).await?;
        let id = required_id(&booking)?;

        match booking.status {
            BookingStatus::Confirmed => Ok((booking, true)),
            BookingStatus::Pending => {
                let now = now_millis();
                if is_expired(&booking, now) {
                    return Err(LifecycleError::InvalidState(
                        "The booking hold has expired".into(),
                    ));
                }

                let customer = CustomerInput {
                    first_name: booking.first_name.clone(),
                    surname: booking.surname.clone(),
                    email: booking.email.clone(),
                    phone: booking.phone.clone(),
                    notes: booking.notes.clone(),
                };
                validation::validate_customer(&customer, true)
                    .map_err(LifecycleError::Validation)?;

                let confirmed = booking_repo.mark_confirmed(&id, now).await?;

                if let Some(code) = &confirmed.promo_code {
                    let promo_repo = PromoRepository::new(self.db.clone());
                    if let Some(promo) = promo_repo.find_by_code(code).await?
                        && let Some(promo_id) = promo.id
                    {
                        promo_repo.increment_uses(&promo_id).await?;
                    }
                }

                tracing::info!(booking = %id, "Booking confirmed");
                Ok((confirmed, false))
            }
            other => Err(LifecycleError::InvalidState(format!(
                "Cannot confirm a booking in status {:?}",
                other
            ))),
        }
    }

    /// Cancel a booking; always frees the interval. Cancelling an
    /// already-CANCELLED booking is a no-op success.
    pub async fn cancel(&self, token: &str) -> Result<Booking, LifecycleError> {
        let booking_repo = BookingRepository::new(self.db.clone());
        let booking = self.require_by_token(&booking_repo, token).await?;
        let id = required_id(&booking)?;
        let now = now_millis();

        match booking.status {
            BookingStatus::Cancelled => Ok(booking),
            BookingStatus::Failed | BookingStatus::NoShow => Err(LifecycleError::InvalidState(
                format!("Cannot cancel a booking in status {:?}", booking.status),
            )),
            BookingStatus::Confirmed => {
                let settings = self.settings().await?;
                let cutoff_millis = settings.cancellation_cutoff_hours * 60 * 60 * 1000;
                if booking.start_at - now < cutoff_millis {
                    return Err(LifecycleError::InvalidState(
                        "Too close to the session start to cancel".into(),
                    ));
                }
                Ok(booking_repo.mark_cancelled(&id, now).await?)
            }
            BookingStatus::Pending | BookingStatus::Draft => {
                Ok(booking_repo.mark_cancelled(&id, now).await?)
            }
        }
    }

    /// Apply the payment authority's verdict.
    ///
    /// Success confirms (and records the deposit). Failure/cancel either
    /// releases the hold or leaves the booking PENDING for retry, per the
    /// venue's `release_pending_on_payment_failure` policy.
    pub async fn payment_outcome(
        &self,
        token: &str,
        outcome: PaymentOutcome,
    ) -> Result<Booking, LifecycleError> {
        let booking_repo = BookingRepository::new(self.db.clone());
        let booking = self.require_by_token(&booking_repo, token).await?;
        let id = required_id(&booking)?;

        match outcome {
            PaymentOutcome::Success => {
                if booking.status == BookingStatus::Pending && booking.deposit_amount > 0 {
                    booking_repo.mark_deposit_paid(&id).await?;
                }
                let (confirmed, _) = self.confirm(token).await?;
                Ok(confirmed)
            }
            PaymentOutcome::Failure | PaymentOutcome::Cancelled => {
                if booking.status != BookingStatus::Pending {
                    return Err(LifecycleError::InvalidState(format!(
                        "No payment outstanding for a booking in status {:?}",
                        booking.status
                    )));
                }
                let settings = self.settings().await?;
                if !settings.release_pending_on_payment_failure {
                    tracing::info!(booking = %id, ?outcome, "Payment did not complete; keeping the hold for retry");
                    return Ok(booking);
                }
                let now = now_millis();
                let released = match outcome {
                    PaymentOutcome::Failure => booking_repo.mark_failed(&id, now).await?,
                    _ => booking_repo.mark_cancelled(&id, now).await?,
                };
                tracing::info!(booking = %id, ?outcome, "Released hold after payment outcome");
                Ok(released)
            }
        }
    }

    /// Flip expired PENDING holds to CANCELLED.
    ///
    /// The conflict checker already ignores them at read time; the sweep
    /// keeps the table converging to the same picture.
    pub async fn sweep_expired(&self) -> Result<usize, RepoError> {
        let booking_repo = BookingRepository::new(self.db.clone());
        let now = now_millis();
        let expired = booking_repo.find_expired_pending(now).await?;
        let count = expired.len();

        for booking in expired {
            if let Some(id) = booking.id.as_ref() {
                booking_repo.mark_cancelled(id, now).await?;
            }
        }

        Ok(count)
    }

    // ── internals ───────────────────────────────────────────────────

    async fn require_by_token(
        &self,
        repo: &BookingRepository,
        token: &str,
    ) -> Result<Booking, LifecycleError> {
        repo.find_by_token(token)
            .await?
            .ok_or(LifecycleError::NotFound)
    }

    async fn settings(&self) -> Result<VenueSettings, RepoError> {
        SettingsRepository::new(self.db.clone()).get_or_create().await
    }

    async fn resolve_staff(
        &self,
        staff_id: &Option<String>,
        errors: &mut FieldErrors,
    ) -> Result<Option<RecordId>, RepoError> {
        let Some(raw) = staff_id else {
            return Ok(None);
        };
        match StaffRepository::new(self.db.clone()).find_by_id(raw).await {
            Ok(Some(member)) if member.is_active => Ok(member.id),
            Ok(_) => {
                errors.insert("staffId".into(), format!("Unknown staff member: {raw}"));
                Ok(None)
            }
            Err(RepoError::Validation(_)) => {
                errors.insert("staffId".into(), format!("Invalid staff id: {raw}"));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn resolve_extras(
        &self,
        selections: &[ExtraSelectionInput],
        errors: &mut FieldErrors,
    ) -> Result<Vec<(Extra, i32)>, RepoError> {
        let pricing_repo = PricingRepository::new(self.db.clone());
        let mut resolved = Vec::with_capacity(selections.len());
        for selection in selections {
            match pricing_repo.find_extra_by_id(&selection.extra_id).await {
                Ok(Some(extra)) if extra.is_active => {
                    resolved.push((extra, selection.quantity));
                }
                Ok(_) => {
                    errors.insert(
                        "extras".into(),
                        format!("Unknown extra: {}", selection.extra_id),
                    );
                }
                Err(RepoError::Validation(_)) => {
                    errors.insert(
                        "extras".into(),
                        format!("Invalid extra id: {}", selection.extra_id),
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(resolved)
    }
}

fn required_id(booking: &Booking) -> Result<RecordId, LifecycleError> {
    booking
        .id
        .clone()
        .ok_or_else(|| LifecycleError::Repo(RepoError::Database("Booking row has no id".into())))
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_record(
    field: &str,
    value: &Option<String>,
    errors: &mut FieldErrors,
) -> Option<RecordId> {
    let raw = value.as_deref()?;
    match raw.parse::<RecordId>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.insert(field.into(), format!("Invalid id: {raw}"));
            None
        }
    }
}

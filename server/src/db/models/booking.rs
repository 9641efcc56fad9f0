//! Booking Model
//!
//! The central record. Created as PENDING by the allocation+pricing flow,
//! mutated by the lifecycle manager afterwards, never hard-deleted here.

use super::extra::PricingMode;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking status state machine:
/// DRAFT → PENDING → {CONFIRMED | CANCELLED | FAILED | NO_SHOW}
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Draft,
    Pending,
    Confirmed,
    Cancelled,
    Failed,
    NoShow,
}

impl BookingStatus {
    /// Terminal statuses cannot transition anywhere
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Failed | BookingStatus::NoShow
        )
    }
}

/// Immutable snapshot of one selected extra at time of selection.
///
/// Later changes to the catalog price must not retroactively change
/// historical bookings, so every pricing input is copied here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraLine {
    #[serde(with = "serde_helpers::record_id")]
    pub extra: RecordId,
    pub name: String,
    pub unit_price: i64,
    pub pricing_mode: PricingMode,
    pub quantity: i32,
    pub line_total: i64,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub staff_member: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub service: Option<RecordId>,

    /// Unix millis, half-open interval [start_at, end_at)
    pub start_at: i64,
    pub end_at: i64,
    pub guest_count: i32,

    // Customer identity; optional until confirmation
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,

    // Price breakdown, whole currency units
    pub base_price: i64,
    pub extra_hours: i32,
    pub extra_hours_price: i64,
    #[serde(default)]
    pub extras: Vec<ExtraLine>,
    pub extras_total: i64,
    pub discount_amount: i64,
    pub promo_discount_amount: i64,
    pub promo_code: Option<String>,
    pub total_price: i64,

    pub deposit_amount: i64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub deposit_paid: bool,

    pub status: BookingStatus,
    /// Opaque credential for unauthenticated self-service management
    pub manage_token: String,
    /// TTL for PENDING bookings; past this the held interval is released
    pub expires_at: Option<i64>,

    pub created_at: i64,
    pub confirmed_at: Option<i64>,
    pub cancelled_at: Option<i64>,
}

impl Booking {
    /// Session portion of the total (everything the discount chain applies to)
    pub fn session_total(&self) -> i64 {
        self.total_price - self.extras_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_screaming_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
        let parsed: BookingStatus = serde_json::from_str("\"CONFIRMED\"").unwrap();
        assert_eq!(parsed, BookingStatus::Confirmed);
    }

    #[test]
    fn terminal_statuses_cannot_move_on() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Failed.is_terminal());
        assert!(BookingStatus::NoShow.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }
}

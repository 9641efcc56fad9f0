//! Venue Settings Model
//!
//! Singleton record; created with defaults on first access.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Venue-wide booking policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSettings {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub deposit_enabled: bool,
    /// Whole currency units due up front when deposits are enabled
    #[serde(default)]
    pub deposit_amount: i64,
    /// Venue's own Monday-Wednesday percent (offers may outbid it)
    #[serde(default)]
    pub midweek_discount_percent: i64,
    /// Un-extended session length
    #[serde(default = "default_session_minutes")]
    pub base_session_minutes: i64,
    /// Minimum lead time before a session can start
    #[serde(default)]
    pub min_days_before_booking: i64,
    #[serde(default)]
    pub min_hours_before_booking: i64,
    /// Customers cannot cancel a confirmed booking closer to start than this
    #[serde(default = "default_cancellation_cutoff")]
    pub cancellation_cutoff_hours: i64,
    /// Payment failure policy: release the held slot or keep PENDING for retry
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub release_pending_on_payment_failure: bool,
}

fn default_session_minutes() -> i64 {
    60
}

fn default_cancellation_cutoff() -> i64 {
    24
}

impl Default for VenueSettings {
    fn default() -> Self {
        Self {
            id: None,
            deposit_enabled: false,
            deposit_amount: 0,
            midweek_discount_percent: 0,
            base_session_minutes: default_session_minutes(),
            min_days_before_booking: 0,
            min_hours_before_booking: 2,
            cancellation_cutoff_hours: default_cancellation_cutoff(),
            release_pending_on_payment_failure: false,
        }
    }
}

impl VenueSettings {
    /// Lead-time offset in millis: earliest bookable start is now + this
    pub fn min_lead_millis(&self) -> i64 {
        (self.min_days_before_booking * 24 + self.min_hours_before_booking) * 60 * 60 * 1000
    }
}

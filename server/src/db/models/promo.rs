//! Promo Code Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Customer-entered discount code
///
/// Percent-off and fixed-off are mutually exclusive per code; when a code
/// somehow carries both, percent wins. A code failing any validity predicate
/// is treated as absent, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub code: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
    pub percent_off: Option<i64>,
    pub fixed_off: Option<i64>,
    /// Validity window, date-inclusive on both ends
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_guests: Option<i32>,
    pub max_uses: Option<i64>,
    #[serde(default)]
    pub uses: i64,
}

fn default_true() -> bool {
    true
}

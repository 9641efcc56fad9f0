//! Offer Model
//!
//! Venue-configured discount rules, independent of promo codes.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Offer kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferKind {
    /// Percent off Monday-Wednesday sessions; competes with the venue's
    /// configured midweek percent (larger wins)
    Midweek,
    /// Generic percent off; the single largest enabled value applies
    Percent,
    /// Flat amount off; all enabled values are summed
    Fixed,
}

/// Discount rule entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub kind: OfferKind,
    /// Percent for MIDWEEK/PERCENT kinds, whole currency units for FIXED
    pub value: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

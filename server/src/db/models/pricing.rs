//! Pricing Configuration Models
//!
//! Tiers partition the bookable guest range with no gaps; extension options
//! are the discrete session-length add-ons. All prices are whole currency
//! units.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Guest-count range mapped to a flat base price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub min_guests: i32,
    pub max_guests: i32,
    pub price: i64,
}

/// Discrete session-extension choice (0-4 hours) with a flat add-on price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraHoursOption {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub hours: i32,
    pub price: i64,
}

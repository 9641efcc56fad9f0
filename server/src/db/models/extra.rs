//! Extra (Add-on Item) Model
//!
//! Named add-ons (food, drink, party packages) selected independently of the
//! session-length price and totalled outside the discount chain.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// How an extra is priced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    Flat,
    PerGuest,
}

/// Catalog entry for an add-on item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extra {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: i64,
    pub pricing_mode: PricingMode,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

//! Maintenance Block Models

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One-off maintenance hold on a room, no customer attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomBlock {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    /// Unix millis, half-open interval [start_at, end_at)
    pub start_at: i64,
    pub end_at: i64,
    pub reason: Option<String>,
}

/// Weekly repeating hold, expanded to concrete intervals per matching date
///
/// `day_of_week`: 0=Sunday .. 6=Saturday; times are HH:MM,
/// end ≤ start meaning the hold runs past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringBlock {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

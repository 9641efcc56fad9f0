//! Operating Hours Models
//!
//! Weekly defaults plus date-specific overrides. A close time numerically
//! ≤ the open time means the window crosses midnight.

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Per-weekday open/close window
///
/// `day_of_week`: 0=Sunday .. 6=Saturday
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingWindow {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub day_of_week: u8,
    /// Opening time (HH:MM)
    pub open: String,
    /// Closing time (HH:MM); ≤ open means close is on the next day
    pub close: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
}

/// Date-specific override; fully determines openness for its date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialHours {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub date: NaiveDate,
    pub open: Option<String>,
    pub close: Option<String>,
    /// false fully closes the date
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

//! Staff Member Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Bookable staff member (host, sound engineer, ...)
///
/// An optional booking dimension: a session may or may not require one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Services this member can be booked for
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub services: Vec<RecordId>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl StaffMember {
    /// Whether this member offers the given service
    pub fn offers(&self, service: &RecordId) -> bool {
        self.services.iter().any(|s| s == service)
    }
}

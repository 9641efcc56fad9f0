//! Room Model
//!
//! Karaoke rooms are immutable reference data owned by venue configuration.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Karaoke room entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub code: String,
    pub name: String,
    /// Smallest party the room is rented to
    pub min_guests: i32,
    /// Largest party the room can hold
    pub max_guests: i32,
    /// Fixed allocation order (ties broken by name)
    #[serde(default)]
    pub sort: i32,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Room {
    /// Whether a party of `guests` fits this room's capacity range
    pub fn fits(&self, guests: i32) -> bool {
        guests >= self.min_guests && guests <= self.max_guests
    }
}

//! Repository Module
//!
//! CRUD and query primitives over the embedded SurrealDB store.

// Venue configuration
pub mod block;
pub mod hours;
pub mod room;
pub mod settings;
pub mod staff;

// Pricing
pub mod pricing;
pub mod promo;

// Bookings
pub mod booking;

// Re-exports
pub use block::BlockRepository;
pub use booking::BookingRepository;
pub use hours::HoursRepository;
pub use pricing::PricingRepository;
pub use promo::PromoRepository;
pub use room::RoomRepository;
pub use settings::SettingsRepository;
pub use staff::StaffRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

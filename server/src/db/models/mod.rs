//! Database Models

// Serde helpers
pub mod serde_helpers;

// Venue configuration
pub mod block;
pub mod hours;
pub mod room;
pub mod settings;
pub mod staff;

// Pricing
pub mod extra;
pub mod offer;
pub mod pricing;
pub mod promo;

// Bookings
pub mod booking;

// Re-exports
pub use block::{RecurringBlock, RoomBlock};
pub use booking::{Booking, BookingStatus, ExtraLine};
pub use extra::{Extra, PricingMode};
pub use hours::{OperatingWindow, SpecialHours};
pub use offer::{Offer, OfferKind};
pub use pricing::{ExtraHoursOption, PricingTier};
pub use promo::PromoCode;
pub use room::Room;
pub use settings::VenueSettings;
pub use staff::StaffMember;

//! Availability & Pricing Engine
//!
//! The decision core of the booking server:
//!
//! - [`hours`] - calendar window resolution (weekly defaults + overrides)
//! - [`conflict`] - pure interval conflict checks over a snapshot
//! - [`slots`] - session start-time enumeration at fixed granularity
//! - [`allocate`] - deterministic room/staff assignment
//! - [`pricing`] - tiered base price, extension, discount and deposit math
//! - [`context`] - per-request snapshot loading
//! - [`lifecycle`] - the booking state machine

pub mod allocate;
pub mod conflict;
pub mod context;
pub mod hours;
pub mod lifecycle;
pub mod pricing;
pub mod slots;

pub use allocate::{Allocation, AllocationQuery, allocate, allocate_candidates};
pub use conflict::{BlockInterval, ConflictReason};
pub use context::{DayContext, EngineContext};
pub use hours::{DayWindow, resolve_window, window_range};
pub use lifecycle::{BookingLifecycle, LifecycleError, PaymentOutcome, is_expired};
pub use pricing::{PriceBreakdown, PricingContext, QuoteInputs, compute_quote};
pub use slots::{SLOT_STEP_MINUTES, SlotQuery, enumerate_slots};

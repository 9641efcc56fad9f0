//! Conflict Checker
//!
//! Pure functions over a snapshot of bookings and maintenance blocks.
//! Intervals are half-open `[start, end)`: touching endpoints never
//! conflict. A PENDING booking past its TTL no longer blocks — expiry is a
//! computed condition here, regardless of what status the row still holds.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use std::fmt;
use surrealdb::RecordId;

use crate::db::models::{Booking, BookingStatus, RecurringBlock};
use crate::utils::time::{date_hm_to_millis, minutes_of};

/// Why a candidate interval was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// The venue is closed on the requested date
    Closed,
    /// The interval falls partly or fully outside the operating window
    OutsideOperatingHours,
    /// Another booking or block occupies the room
    RoomUnavailable,
    /// The staff member is booked elsewhere in the interval
    StaffUnavailable,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::Closed => write!(f, "The venue is closed on this date"),
            ConflictReason::OutsideOperatingHours => {
                write!(f, "The requested time is outside operating hours")
            }
            ConflictReason::RoomUnavailable => write!(f, "The room is not available"),
            ConflictReason::StaffUnavailable => write!(f, "The staff member is not available"),
        }
    }
}

/// A concrete blocked interval in one room (one-off or materialized recurring)
#[derive(Debug, Clone)]
pub struct BlockInterval {
    pub room: RecordId,
    pub start_at: i64,
    pub end_at: i64,
}

/// Half-open interval intersection: `[start, end)` vs `[b_start, b_end)`
pub fn overlaps(start: i64, end: i64, b_start: i64, b_end: i64) -> bool {
    start < b_end && end > b_start
}

/// Whether a booking row still holds its interval at `now`
///
/// CANCELLED and FAILED rows never block. PENDING (and DRAFT) rows block
/// only until their TTL lapses, even when no sweep has flipped them yet.
pub fn booking_blocks(booking: &Booking, now: i64, exclude: Option<&RecordId>) -> bool {
    if let (Some(excluded), Some(id)) = (exclude, booking.id.as_ref())
        && excluded == id
    {
        return false;
    }
    match booking.status {
        BookingStatus::Cancelled | BookingStatus::Failed => false,
        BookingStatus::Pending | BookingStatus::Draft => {
            booking.expires_at.is_none_or(|expires| expires > now)
        }
        BookingStatus::Confirmed | BookingStatus::NoShow => true,
    }
}

/// Check one room against the snapshot for `[start, end)`
pub fn check_room(
    room: &RecordId,
    start: i64,
    end: i64,
    bookings: &[Booking],
    blocks: &[BlockInterval],
    now: i64,
    exclude: Option<&RecordId>,
) -> Result<(), ConflictReason> {
    let busy = bookings.iter().any(|b| {
        &b.room == room
            && booking_blocks(b, now, exclude)
            && overlaps(start, end, b.start_at, b.end_at)
    });
    if busy {
        return Err(ConflictReason::RoomUnavailable);
    }

    let blocked = blocks
        .iter()
        .any(|b| &b.room == room && overlaps(start, end, b.start_at, b.end_at));
    if blocked {
        return Err(ConflictReason::RoomUnavailable);
    }

    Ok(())
}

/// Check a staff member against the snapshot for `[start, end)`.
///
/// The room is irrelevant: a staff member cannot be double-booked across
/// rooms.
pub fn check_staff(
    staff: &RecordId,
    start: i64,
    end: i64,
    bookings: &[Booking],
    now: i64,
    exclude: Option<&RecordId>,
) -> Result<(), ConflictReason> {
    let busy = bookings.iter().any(|b| {
        b.staff_member.as_ref() == Some(staff)
            && booking_blocks(b, now, exclude)
            && overlaps(start, end, b.start_at, b.end_at)
    });
    if busy {
        return Err(ConflictReason::StaffUnavailable);
    }
    Ok(())
}

/// Expand enabled recurring blocks into concrete intervals for one date
pub fn expand_recurring(blocks: &[RecurringBlock], date: NaiveDate, tz: Tz) -> Vec<BlockInterval> {
    let dow = date.weekday().num_days_from_sunday() as u8;
    blocks
        .iter()
        .filter(|b| b.enabled && b.day_of_week == dow)
        .filter_map(|b| {
            let start = NaiveTime::parse_from_str(&b.start_time, "%H:%M").ok()?;
            let end = NaiveTime::parse_from_str(&b.end_time, "%H:%M").ok()?;
            let start_at = date_hm_to_millis(date, start.hour(), start.minute(), tz);
            let end_date = if minutes_of(end) <= minutes_of(start) {
                date.succ_opt().unwrap_or(date)
            } else {
                date
            };
            let end_at = date_hm_to_millis(end_date, end.hour(), end.minute(), tz);
            Some(BlockInterval {
                room: b.room.clone(),
                start_at,
                end_at,
            })
        })
        .collect()
}

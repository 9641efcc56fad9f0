//! Room/Staff Allocator
//!
//! Deterministic assignment for a confirmed interval: rooms are scanned in
//! fixed venue order, staff pairing is room-major. Exhausting every
//! candidate is an expected business condition, not a fault.

use surrealdb::RecordId;

use super::conflict::{BlockInterval, check_room, check_staff};
use crate::db::models::{Booking, Room, StaffMember};

/// A chosen room (and staff member, when one was required)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub room: RecordId,
    pub staff: Option<RecordId>,
}

/// Inputs for one allocation pass
pub struct AllocationQuery<'a> {
    pub rooms: &'a [Room],
    pub staff_pool: &'a [StaffMember],
    pub bookings: &'a [Booking],
    pub blocks: &'a [BlockInterval],
    pub start: i64,
    pub end: i64,
    pub now_ms: i64,
    pub guests: i32,
    pub requested_staff: Option<&'a RecordId>,
    pub service: Option<&'a RecordId>,
    pub exclude: Option<&'a RecordId>,
}

/// First compatible allocation, or `None` when every candidate is taken
pub fn allocate(query: &AllocationQuery) -> Option<Allocation> {
    allocate_candidates(query).into_iter().next()
}

/// All compatible allocations in deterministic scan order.
///
/// The caller re-validates each candidate under the room/staff lease before
/// inserting, so later entries serve as fallbacks when an earlier one is
/// snatched by a concurrent request.
pub fn allocate_candidates(query: &AllocationQuery) -> Vec<Allocation> {
    let rooms: Vec<&Room> = query
        .rooms
        .iter()
        .filter(|room| room.is_active && room.fits(query.guests))
        .collect();

    // Explicit staff request: the member must be free for the whole interval
    if let Some(staff) = query.requested_staff {
        if check_staff(
            staff,
            query.start,
            query.end,
            query.bookings,
            query.now_ms,
            query.exclude,
        )
        .is_err()
        {
            return Vec::new();
        }
        return free_rooms(query, &rooms)
            .map(|room| Allocation {
                room,
                staff: Some(staff.clone()),
            })
            .collect();
    }

    // Service-driven pairing: rooms x eligible staff, room-major
    if let Some(service) = query.service {
        let eligible: Vec<&StaffMember> = query
            .staff_pool
            .iter()
            .filter(|s| s.is_active && s.offers(service))
            .collect();

        if !eligible.is_empty() {
            let free_staff: Vec<RecordId> = eligible
                .iter()
                .filter_map(|s| s.id.clone())
                .filter(|id| {
                    check_staff(
                        id,
                        query.start,
                        query.end,
                        query.bookings,
                        query.now_ms,
                        query.exclude,
                    )
                    .is_ok()
                })
                .collect();

            return free_rooms(query, &rooms)
                .flat_map(|room| {
                    free_staff.iter().map(move |staff| Allocation {
                        room: room.clone(),
                        staff: Some(staff.clone()),
                    })
                })
                .collect();
        }
    }

    // No staff dimension: rooms alone
    free_rooms(query, &rooms)
        .map(|room| Allocation { room, staff: None })
        .collect()
}

fn free_rooms<'a>(
    query: &'a AllocationQuery<'a>,
    rooms: &'a [&'a Room],
) -> impl Iterator<Item = RecordId> + 'a {
    rooms.iter().filter_map(move |room| {
        let id = room.id.as_ref()?;
        check_room(
            id,
            query.start,
            query.end,
            query.bookings,
            query.blocks,
            query.now_ms,
            query.exclude,
        )
        .ok()
        .map(|_| id.clone())
    })
}

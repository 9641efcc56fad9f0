//! Slot Enumerator
//!
//! Walks the operating window at fixed granularity and keeps the start
//! times at which at least one eligible room is free for the full duration.
//! The computation is a pure function of its inputs: same inputs and
//! unchanged booking state yield the same list.

use surrealdb::RecordId;

use super::conflict::{BlockInterval, check_room, check_staff};
use crate::db::models::{Booking, Room};
use crate::utils::time::minutes_label;

/// Fixed slot granularity
pub const SLOT_STEP_MINUTES: i64 = 15;

/// Inputs for one enumeration pass
pub struct SlotQuery<'a> {
    pub rooms: &'a [Room],
    pub bookings: &'a [Booking],
    pub blocks: &'a [BlockInterval],
    /// Absolute millis of the operating window
    pub window_start_ms: i64,
    pub window_end_ms: i64,
    /// Minutes-since-midnight of the opening time, for slot labels
    pub open_minutes: i64,
    pub duration_minutes: i64,
    pub guests: i32,
    pub staff: Option<&'a RecordId>,
    /// now + configured minimum lead time
    pub earliest_start_ms: i64,
    pub now_ms: i64,
}

/// Enumerate valid session start times as ascending HH:MM labels
pub fn enumerate_slots(query: &SlotQuery) -> Vec<String> {
    let mut slots = Vec::new();
    let mut offset = 0i64;

    loop {
        let start = query.window_start_ms + offset * 60_000;
        let end = start + query.duration_minutes * 60_000;
        if end > query.window_end_ms {
            break;
        }

        if start >= query.earliest_start_ms && slot_is_free(query, start, end) {
            slots.push(minutes_label(query.open_minutes + offset));
        }

        offset += SLOT_STEP_MINUTES;
    }

    slots
}

fn slot_is_free(query: &SlotQuery, start: i64, end: i64) -> bool {
    // A busy staff member rules the slot out regardless of rooms
    if let Some(staff) = query.staff
        && check_staff(staff, start, end, query.bookings, query.now_ms, None).is_err()
    {
        return false;
    }

    query
        .rooms
        .iter()
        .filter(|room| room.is_active && room.fits(query.guests))
        .any(|room| {
            let Some(room_id) = room.id.as_ref() else {
                return false;
            };
            check_room(
                room_id,
                start,
                end,
                query.bookings,
                query.blocks,
                query.now_ms,
                None,
            )
            .is_ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::BookingStatus;

    const HOUR: i64 = 60 * 60 * 1000;
    // Window 17:00-23:00 on some day; absolute base chosen arbitrarily
    const OPEN_MS: i64 = 1_000 * HOUR;
    const CLOSE_MS: i64 = OPEN_MS + 6 * HOUR;
    const OPEN_MINUTES: i64 = 17 * 60;

    fn room(key: &str) -> Room {
        Room {
            id: Some(RecordId::from_table_key("room", key)),
            code: key.to_uppercase(),
            name: format!("Room {key}"),
            min_guests: 8,
            max_guests: 20,
            sort: 0,
            is_active: true,
        }
    }

    fn booking(room_key: &str, start_at: i64, end_at: i64) -> Booking {
        Booking {
            id: Some(RecordId::from_table_key("booking", "b1")),
            room: RecordId::from_table_key("room", room_key),
            staff_member: None,
            service: None,
            start_at,
            end_at,
            guest_count: 10,
            first_name: None,
            surname: None,
            email: None,
            phone: None,
            notes: None,
            base_price: 152,
            extra_hours: 0,
            extra_hours_price: 0,
            extras: vec![],
            extras_total: 0,
            discount_amount: 0,
            promo_discount_amount: 0,
            promo_code: None,
            total_price: 152,
            deposit_amount: 0,
            deposit_paid: false,
            status: BookingStatus::Confirmed,
            manage_token: "t".into(),
            expires_at: None,
            created_at: 0,
            confirmed_at: None,
            cancelled_at: None,
        }
    }

    fn query<'a>(
        rooms: &'a [Room],
        bookings: &'a [Booking],
        duration_minutes: i64,
    ) -> SlotQuery<'a> {
        SlotQuery {
            rooms,
            bookings,
            blocks: &[],
            window_start_ms: OPEN_MS,
            window_end_ms: CLOSE_MS,
            open_minutes: OPEN_MINUTES,
            duration_minutes,
            guests: 10,
            staff: None,
            earliest_start_ms: 0,
            now_ms: 0,
        }
    }

    #[test]
    fn empty_venue_yields_every_step_up_to_close_minus_duration() {
        let rooms = vec![room("r1")];
        let slots = enumerate_slots(&query(&rooms, &[], 60));

        // 17:00 .. 22:00 inclusive, 15-minute steps
        assert_eq!(slots.len(), 21);
        assert_eq!(slots.first().unwrap(), "17:00");
        assert_eq!(slots.last().unwrap(), "22:00");
        assert!(slots.contains(&"19:45".to_string()));
    }

    #[test]
    fn last_slot_end_never_exceeds_close() {
        let rooms = vec![room("r1")];
        let slots = enumerate_slots(&query(&rooms, &[], 120));
        // 2h session: latest start is 21:00
        assert_eq!(slots.last().unwrap(), "21:00");
    }

    #[test]
    fn occupied_interval_drops_slots_only_when_no_room_is_free() {
        let rooms = vec![room("r1")];
        // 19:00-21:00 occupied
        let bookings = vec![booking("r1", OPEN_MS + 2 * HOUR, OPEN_MS + 4 * HOUR)];
        let slots = enumerate_slots(&query(&rooms, &bookings, 60));

        assert!(!slots.contains(&"19:00".to_string()));
        assert!(!slots.contains(&"20:45".to_string()));
        // Touching endpoints are fine
        assert!(slots.contains(&"18:00".to_string()));
        assert!(slots.contains(&"21:00".to_string()));

        // A second room absorbs the overlap
        let two_rooms = vec![room("r1"), room("r2")];
        let slots = enumerate_slots(&query(&two_rooms, &bookings, 60));
        assert!(slots.contains(&"19:00".to_string()));
    }

    #[test]
    fn lead_time_filters_early_slots() {
        let rooms = vec![room("r1")];
        let mut q = query(&rooms, &[], 60);
        q.earliest_start_ms = OPEN_MS + HOUR + 1;
        let slots = enumerate_slots(&q);

        assert_eq!(slots.first().unwrap(), "18:15");
    }

    #[test]
    fn rooms_too_small_for_the_party_are_skipped() {
        let mut small = room("r1");
        small.max_guests = 9;
        let rooms = vec![small];
        let mut q = query(&rooms, &[], 60);
        q.guests = 15;
        assert!(enumerate_slots(&q).is_empty());
    }

    #[test]
    fn busy_staff_member_rules_out_the_slot_for_all_rooms() {
        let rooms = vec![room("r1"), room("r2")];
        let staff = RecordId::from_table_key("staff_member", "s1");
        let mut b = booking("r1", OPEN_MS + 2 * HOUR, OPEN_MS + 4 * HOUR);
        b.staff_member = Some(staff.clone());
        let bookings = vec![b];

        let mut q = query(&rooms, &bookings, 60);
        q.staff = Some(&staff);
        let slots = enumerate_slots(&q);

        // Room r2 is free but the staff member is not
        assert!(!slots.contains(&"19:00".to_string()));
        assert!(slots.contains(&"21:00".to_string()));
    }
}

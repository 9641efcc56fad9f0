//! Engine context loading
//!
//! The engine itself is pure; this module assembles the per-request
//! snapshot it computes over. Facts are fetched fresh on every request —
//! no engine state survives a request boundary.

use chrono::NaiveDate;
use chrono_tz::Tz;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::conflict::{self, BlockInterval, ConflictReason};
use super::hours::{DayWindow, resolve_window, window_range};
use crate::db::models::{Booking, Room, StaffMember, VenueSettings};
use crate::db::repository::{
    BlockRepository, BookingRepository, HoursRepository, RepoResult, RoomRepository,
    SettingsRepository, StaffRepository,
};
use crate::utils::time::minutes_of;

/// Loads day snapshots for the availability engine
#[derive(Clone)]
pub struct EngineContext {
    db: Surreal<Db>,
    tz: Tz,
}

/// Everything the engine needs to answer questions about one date
pub struct DayContext {
    pub date: NaiveDate,
    /// `None` when the venue is closed on this date
    pub window: Option<DayWindow>,
    /// Absolute millis of the operating window, when open
    pub range: Option<(i64, i64)>,
    pub rooms: Vec<Room>,
    pub staff: Vec<StaffMember>,
    pub bookings: Vec<Booking>,
    pub blocks: Vec<BlockInterval>,
    pub settings: VenueSettings,
}

impl EngineContext {
    pub fn new(db: Surreal<Db>, tz: Tz) -> Self {
        Self { db, tz }
    }

    /// Load the full snapshot for a date
    pub async fn load_day(&self, date: NaiveDate) -> RepoResult<DayContext> {
        let hours = HoursRepository::new(self.db.clone());
        let weekly = hours.find_weekly().await?;
        let special = hours.find_special(date).await?;
        let window = resolve_window(&weekly, special.as_ref(), date);

        let settings = SettingsRepository::new(self.db.clone()).get_or_create().await?;
        let rooms = RoomRepository::new(self.db.clone()).find_all_active().await?;
        let staff = StaffRepository::new(self.db.clone()).find_all_active().await?;

        let (range, bookings, blocks) = match &window {
            Some(w) => {
                let (start, end) = window_range(date, w, self.tz);

                let bookings = BookingRepository::new(self.db.clone())
                    .find_blocking_in_range(start, end)
                    .await?;

                let block_repo = BlockRepository::new(self.db.clone());
                let mut blocks: Vec<BlockInterval> = block_repo
                    .find_in_range(start, end)
                    .await?
                    .into_iter()
                    .map(|b| BlockInterval {
                        room: b.room,
                        start_at: b.start_at,
                        end_at: b.end_at,
                    })
                    .collect();

                // Recurring blocks are expanded for every date the window
                // touches and checked identically to one-off blocks
                let recurring = block_repo.find_recurring_enabled().await?;
                blocks.extend(conflict::expand_recurring(&recurring, date, self.tz));
                if minutes_of(w.close) <= minutes_of(w.open)
                    && let Some(next) = date.succ_opt()
                {
                    blocks.extend(conflict::expand_recurring(&recurring, next, self.tz));
                }

                (Some((start, end)), bookings, blocks)
            }
            None => (None, Vec::new(), Vec::new()),
        };

        Ok(DayContext {
            date,
            window,
            range,
            rooms,
            staff,
            bookings,
            blocks,
            settings,
        })
    }
}

impl DayContext {
    /// Full conflict check for a candidate interval.
    ///
    /// `skip_window` is for callers that already validated the window, e.g.
    /// slot enumeration walking a range computed inside operating hours.
    pub fn check_interval(
        &self,
        room: &RecordId,
        staff: Option<&RecordId>,
        start: i64,
        end: i64,
        now: i64,
        exclude: Option<&RecordId>,
        skip_window: bool,
    ) -> Result<(), ConflictReason> {
        if !skip_window {
            match self.range {
                None => return Err(ConflictReason::Closed),
                Some((window_start, window_end)) => {
                    if start < window_start || end > window_end {
                        return Err(ConflictReason::OutsideOperatingHours);
                    }
                }
            }
        }

        conflict::check_room(room, start, end, &self.bookings, &self.blocks, now, exclude)?;
        if let Some(staff) = staff {
            conflict::check_staff(staff, start, end, &self.bookings, now, exclude)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const HOUR: i64 = 60 * 60 * 1000;

    fn day(range: Option<(i64, i64)>) -> DayContext {
        DayContext {
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            window: range.map(|_| DayWindow {
                open: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                close: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            }),
            range,
            rooms: vec![],
            staff: vec![],
            bookings: vec![],
            blocks: vec![],
            settings: VenueSettings::default(),
        }
    }

    fn room_id() -> RecordId {
        RecordId::from_table_key("room", "r1")
    }

    #[test]
    fn closed_dates_reject_every_interval() {
        let day = day(None);
        let result = day.check_interval(&room_id(), None, 0, HOUR, 0, None, false);
        assert_eq!(result, Err(ConflictReason::Closed));
    }

    #[test]
    fn intervals_must_sit_inside_the_window() {
        let day = day(Some((17 * HOUR, 23 * HOUR)));

        // Spills past close
        let result = day.check_interval(&room_id(), None, 22 * HOUR, 24 * HOUR, 0, None, false);
        assert_eq!(result, Err(ConflictReason::OutsideOperatingHours));

        // Inside the window
        assert!(
            day.check_interval(&room_id(), None, 18 * HOUR, 20 * HOUR, 0, None, false)
                .is_ok()
        );
    }

    #[test]
    fn window_check_can_be_skipped_by_pre_validated_callers() {
        let day = day(None);
        assert!(
            day.check_interval(&room_id(), None, 0, HOUR, 0, None, true)
                .is_ok()
        );
    }

    #[test]
    fn blocks_inside_the_window_still_conflict() {
        let mut day = day(Some((17 * HOUR, 23 * HOUR)));
        day.blocks.push(BlockInterval {
            room: room_id(),
            start_at: 18 * HOUR,
            end_at: 20 * HOUR,
        });
        let result = day.check_interval(&room_id(), None, 19 * HOUR, 21 * HOUR, 0, None, false);
        assert_eq!(result, Err(ConflictReason::RoomUnavailable));
    }
}

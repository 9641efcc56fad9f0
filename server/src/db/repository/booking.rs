//! Booking Repository
//!
//! Overlap queries use half-open interval semantics throughout:
//! `start_at < $end AND end_at > $start`, so touching endpoints never match.
//! Expired-but-still-PENDING rows are returned and filtered at read time by
//! the conflict checker; the queries only exclude statuses that can never
//! block.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Booking, ExtraLine};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new booking
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Booking>> {
        let booking: Option<Booking> = self.base.db().select(id.clone()).await?;
        Ok(booking)
    }

    /// Find booking by magic-link token
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE manage_token = $token LIMIT 1")
            .bind(("token", token.to_string()))
            .await?;
        let rows: Vec<Booking> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All potentially blocking bookings intersecting [start, end), any room
    pub async fn find_blocking_in_range(&self, start: i64, end: i64) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE start_at < $end AND end_at > $start \
                 AND status NOT IN ['CANCELLED', 'FAILED']",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Potentially blocking bookings for one room intersecting [start, end)
    pub async fn find_blocking_for_room(
        &self,
        room: &RecordId,
        start: i64,
        end: i64,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE room = $room AND start_at < $end AND end_at > $start \
                 AND status NOT IN ['CANCELLED', 'FAILED'] \
                 AND ($exclude = NONE OR id != $exclude)",
            )
            .bind(("room", room.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("exclude", exclude.cloned()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Potentially blocking bookings for one staff member, across all rooms
    pub async fn find_blocking_for_staff(
        &self,
        staff: &RecordId,
        start: i64,
        end: i64,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE staff_member = $staff AND start_at < $end AND end_at > $start \
                 AND status NOT IN ['CANCELLED', 'FAILED'] \
                 AND ($exclude = NONE OR id != $exclude)",
            )
            .bind(("staff", staff.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("exclude", exclude.cloned()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// PENDING bookings whose TTL has lapsed
    pub async fn find_expired_pending(&self, now: i64) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE status = 'PENDING' AND expires_at != NONE AND expires_at <= $now",
            )
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Update customer contact fields on a booking
    pub async fn update_contact(
        &self,
        id: &RecordId,
        first_name: Option<String>,
        surname: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> RepoResult<Booking> {
        self.base
            .db()
            .query(
                "UPDATE $thing SET first_name = $first_name, surname = $surname, \
                 email = $email, phone = $phone, notes = $notes",
            )
            .bind(("thing", id.clone()))
            .bind(("first_name", first_name))
            .bind(("surname", surname))
            .bind(("email", email))
            .bind(("phone", phone))
            .bind(("notes", notes))
            .await?;
        self.require(id).await
    }

    /// Replace the extras snapshot and the dependent totals
    pub async fn update_extras(
        &self,
        id: &RecordId,
        extras: Vec<ExtraLine>,
        extras_total: i64,
        total_price: i64,
        deposit_amount: i64,
    ) -> RepoResult<Booking> {
        self.base
            .db()
            .query(
                "UPDATE $thing SET extras = $extras, extras_total = $extras_total, \
                 total_price = $total_price, deposit_amount = $deposit_amount",
            )
            .bind(("thing", id.clone()))
            .bind(("extras", extras))
            .bind(("extras_total", extras_total))
            .bind(("total_price", total_price))
            .bind(("deposit_amount", deposit_amount))
            .await?;
        self.require(id).await
    }

    /// PENDING → CONFIRMED; clears the TTL
    pub async fn mark_confirmed(&self, id: &RecordId, confirmed_at: i64) -> RepoResult<Booking> {
        self.base
            .db()
            .query(
                "UPDATE $thing SET status = 'CONFIRMED', confirmed_at = $ts, expires_at = NONE",
            )
            .bind(("thing", id.clone()))
            .bind(("ts", confirmed_at))
            .await?;
        self.require(id).await
    }

    /// Any → CANCELLED; frees the interval
    pub async fn mark_cancelled(&self, id: &RecordId, cancelled_at: i64) -> RepoResult<Booking> {
        self.base
            .db()
            .query("UPDATE $thing SET status = 'CANCELLED', cancelled_at = $ts")
            .bind(("thing", id.clone()))
            .bind(("ts", cancelled_at))
            .await?;
        self.require(id).await
    }

    /// PENDING → FAILED (payment release policy); frees the interval
    pub async fn mark_failed(&self, id: &RecordId, failed_at: i64) -> RepoResult<Booking> {
        self.base
            .db()
            .query("UPDATE $thing SET status = 'FAILED', cancelled_at = $ts")
            .bind(("thing", id.clone()))
            .bind(("ts", failed_at))
            .await?;
        self.require(id).await
    }

    /// Record that the deposit has been taken
    pub async fn mark_deposit_paid(&self, id: &RecordId) -> RepoResult<Booking> {
        self.base
            .db()
            .query("UPDATE $thing SET deposit_paid = true")
            .bind(("thing", id.clone()))
            .await?;
        self.require(id).await
    }

    async fn require(&self, id: &RecordId) -> RepoResult<Booking> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }
}

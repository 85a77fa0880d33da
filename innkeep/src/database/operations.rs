//! Database CRUD operations for bookings, catalog data, and payment
//! attempts.
//!
//! This module implements all reads and writes against the booking store,
//! including the two conditional-commit primitives everything else leans
//! on: [`Database::try_claim_room`] (atomic overlap re-check + insert) and
//! [`Database::transition_status`] (compare-and-swap on booking status).

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::booking::{Booking, BookingNumber, BookingStatus, GuestDetails};
use crate::catalog::{DiscountRule, IndividualRoom, PromoCode, RoomType};
use crate::error::{Error, Result};
use crate::payment::{AttemptStatus, PaymentAttempt, ProviderKind, ProviderReference};
use crate::stay::StayDates;

use super::connection::Database;
use super::schema::INSERT_BOOKING;

/// Converts a `DateTime<Utc>` to unix epoch seconds for database storage.
fn datetime_to_unix_secs(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Converts unix epoch seconds from the database to a `DateTime<Utc>`.
fn unix_secs_to_datetime(secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::ToSqlConversionFailure(
            format!("timestamp {secs} out of range").into(),
        )
    })
}

/// Parses a stored ISO date.
fn parse_date(text: &str) -> rusqlite::Result<NaiveDate> {
    text.parse::<NaiveDate>()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Helper function to deserialize a booking from a database row.
///
/// Expects row fields in this order: `booking_number`, `room_type_id`,
/// `room_id`, `check_in`, `check_out`, `guest_name`, `guests`,
/// `special_requests`, `total_price`, `status`, `provider`,
/// `provider_reference`, `created_at`, `expires_at`.
fn row_to_booking(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    let number: String = row.get(0)?;
    let room_type_id: i64 = row.get(1)?;
    let room_id: i64 = row.get(2)?;
    let check_in: String = row.get(3)?;
    let check_out: String = row.get(4)?;
    let guest_name: String = row.get(5)?;
    let guests: u32 = row.get(6)?;
    let special_requests: Option<String> = row.get(7)?;
    let total_price: i64 = row.get(8)?;
    let status: String = row.get(9)?;
    let provider: Option<String> = row.get(10)?;
    let provider_reference: Option<String> = row.get(11)?;
    let created_secs: i64 = row.get(12)?;
    let expires_secs: i64 = row.get(13)?;

    let wrap = |e: Box<dyn std::error::Error + Send + Sync>| {
        rusqlite::Error::ToSqlConversionFailure(e)
    };

    let number = BookingNumber::new(number).map_err(|e| wrap(Box::new(e)))?;
    let stay = StayDates::new(parse_date(&check_in)?, parse_date(&check_out)?)
        .map_err(|e| wrap(Box::new(e)))?;
    let guest = GuestDetails::new(guest_name, guests, special_requests)
        .map_err(|e| wrap(Box::new(e)))?;
    let status = BookingStatus::parse(&status).map_err(|e| wrap(Box::new(e)))?;

    let provider = match (provider, provider_reference) {
        (Some(kind), Some(reference)) => Some(ProviderReference::new(
            ProviderKind::parse(&kind).map_err(|e| wrap(Box::new(e)))?,
            reference,
        )),
        _ => None,
    };

    Booking::builder(number, room_type_id, room_id, stay, total_price)
        .guest(guest)
        .status(status)
        .provider(provider)
        .created_at(unix_secs_to_datetime(created_secs)?)
        .expires_at(unix_secs_to_datetime(expires_secs)?)
        .build()
        .map_err(|e| wrap(Box::new(e)))
}

/// Helper function to deserialize a payment attempt from a database row.
///
/// Expects row fields in this order: id, `booking_number`, provider,
/// `provider_txn_id`, amount, status, `created_at`.
fn row_to_attempt(row: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentAttempt> {
    let wrap = |e: Box<dyn std::error::Error + Send + Sync>| {
        rusqlite::Error::ToSqlConversionFailure(e)
    };

    let id: i64 = row.get(0)?;
    let booking_number: String = row.get(1)?;
    let provider: String = row.get(2)?;
    let provider_txn_id: String = row.get(3)?;
    let amount: i64 = row.get(4)?;
    let status: String = row.get(5)?;
    let created_secs: i64 = row.get(6)?;

    Ok(PaymentAttempt {
        id: Some(id),
        booking_number: BookingNumber::new(booking_number).map_err(|e| wrap(Box::new(e)))?,
        provider: ProviderKind::parse(&provider).map_err(|e| wrap(Box::new(e)))?,
        provider_txn_id,
        amount,
        status: AttemptStatus::parse(&status).map_err(|e| wrap(Box::new(e)))?,
        created_at: unix_secs_to_datetime(created_secs)?,
    })
}

/// Helper function to deserialize a room from a database row.
fn row_to_room(row: &rusqlite::Row<'_>) -> rusqlite::Result<IndividualRoom> {
    Ok(IndividualRoom {
        id: row.get(0)?,
        room_type_id: row.get(1)?,
        room_number: row.get(2)?,
        floor: row.get(3)?,
        active: row.get(4)?,
    })
}

/// Helper function to deserialize a room type from a database row.
fn row_to_room_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<RoomType> {
    Ok(RoomType {
        id: row.get(0)?,
        name: row.get(1)?,
        nightly_rate: row.get(2)?,
        monthly_rate: row.get(3)?,
        max_guests: row.get(4)?,
        active: row.get(5)?,
    })
}

// SQL statements for booking operations.
//
// Overlap predicates use half-open interval comparison against the holding
// statuses: an existing booking conflicts iff
// `existing.check_in < new.check_out AND new.check_in < existing.check_out`.

const SELECT_BOOKING: &str = r"
    SELECT booking_number, room_type_id, room_id, check_in, check_out,
           guest_name, guests, special_requests, total_price, status,
           provider, provider_reference, created_at, expires_at
    FROM bookings
    WHERE booking_number = ?
";

const LIST_BOOKINGS: &str = r"
    SELECT booking_number, room_type_id, room_id, check_in, check_out,
           guest_name, guests, special_requests, total_price, status,
           provider, provider_reference, created_at, expires_at
    FROM bookings
    ORDER BY booking_number
";

const LIST_BOOKINGS_BY_STATUS: &str = r"
    SELECT booking_number, room_type_id, room_id, check_in, check_out,
           guest_name, guests, special_requests, total_price, status,
           provider, provider_reference, created_at, expires_at
    FROM bookings
    WHERE status = ?
    ORDER BY booking_number
";

const COUNT_ROOM_CONFLICTS: &str = r"
    SELECT COUNT(*)
    FROM bookings
    WHERE room_id = ?1
      AND status IN ('pending_payment', 'confirmed', 'checked_in')
      AND check_in < ?2
      AND ?3 < check_out
";

const CONFLICTING_ROOM_IDS: &str = r"
    SELECT DISTINCT room_id
    FROM bookings
    WHERE room_type_id = ?1
      AND status IN ('pending_payment', 'confirmed', 'checked_in')
      AND check_in < ?2
      AND ?3 < check_out
";

const COUNT_TODAYS_BOOKINGS: &str = r"
    SELECT COUNT(*) FROM bookings WHERE booking_number LIKE ?
";

const UPDATE_STATUS_CAS: &str = r"
    UPDATE bookings
    SET status = ?3
    WHERE booking_number = ?1 AND status = ?2
";

const UPDATE_PROVIDER_REFERENCE: &str = r"
    UPDATE bookings
    SET provider = ?2, provider_reference = ?3
    WHERE booking_number = ?1
";

const SELECT_EXPIRED_HOLDS: &str = r"
    SELECT booking_number, room_type_id, room_id, check_in, check_out,
           guest_name, guests, special_requests, total_price, status,
           provider, provider_reference, created_at, expires_at
    FROM bookings
    WHERE status = 'pending_payment'
      AND expires_at < ?
      AND booking_number NOT IN
          (SELECT booking_number FROM payment_attempts WHERE status = 'succeeded')
    ORDER BY expires_at
";

const INSERT_ATTEMPT: &str = r"
    INSERT INTO payment_attempts
    (booking_number, provider, provider_txn_id, amount, status, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const LIST_ATTEMPTS: &str = r"
    SELECT id, booking_number, provider, provider_txn_id, amount, status, created_at
    FROM payment_attempts
    WHERE booking_number = ?
    ORDER BY id
";

const SELECT_SUCCEEDED_ATTEMPT: &str = r"
    SELECT id, booking_number, provider, provider_txn_id, amount, status, created_at
    FROM payment_attempts
    WHERE booking_number = ? AND status = 'succeeded'
";

const UPDATE_ATTEMPT_STATUS: &str = r"
    UPDATE payment_attempts SET status = ?2 WHERE id = ?1
";

// SQL statements for catalog operations.

const UPSERT_ROOM_TYPE: &str = r"
    INSERT OR REPLACE INTO room_types
    (id, name, nightly_rate, monthly_rate, max_guests, active)
    VALUES (?, ?, ?, ?, ?, ?)
";

const UPSERT_ROOM: &str = r"
    INSERT OR REPLACE INTO rooms
    (id, room_type_id, room_number, floor, active)
    VALUES (?, ?, ?, ?, ?)
";

const UPSERT_PROMO: &str = r"
    INSERT OR REPLACE INTO promo_codes
    (code, discount_kind, discount_value, valid_until)
    VALUES (?, ?, ?, ?)
";

const SELECT_ROOM_TYPE: &str = r"
    SELECT id, name, nightly_rate, monthly_rate, max_guests, active
    FROM room_types WHERE id = ?
";

const SELECT_ROOM_TYPE_BY_NAME: &str = r"
    SELECT id, name, nightly_rate, monthly_rate, max_guests, active
    FROM room_types WHERE name = ?
";

const SELECT_ROOM: &str = r"
    SELECT id, room_type_id, room_number, floor, active
    FROM rooms WHERE id = ?
";

const LIST_ACTIVE_ROOMS: &str = r"
    SELECT id, room_type_id, room_number, floor, active
    FROM rooms
    WHERE room_type_id = ? AND active = 1
    ORDER BY room_number
";

const SELECT_PROMO: &str = r"
    SELECT code, discount_kind, discount_value, valid_until
    FROM promo_codes WHERE code = ?
";

impl Database {
    /// Retrieves a booking by its public number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(booking))` if the booking exists
    /// - `Ok(None)` if the booking doesn't exist
    /// - `Err(_)` if a database error occurs
    pub fn get_booking(conn: &Connection, number: &BookingNumber) -> Result<Option<Booking>> {
        let mut stmt = conn.prepare_cached(SELECT_BOOKING)?;
        match stmt.query_row(params![number.as_str()], row_to_booking) {
            Ok(booking) => Ok(Some(booking)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists bookings, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be deserialized.
    pub fn list_bookings(
        conn: &Connection,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let bookings = match status {
            Some(status) => {
                let mut stmt = conn.prepare(LIST_BOOKINGS_BY_STATUS)?;
                let rows = stmt.query_map(params![status.as_str()], row_to_booking)?;
                rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
            }
            None => {
                let mut stmt = conn.prepare(LIST_BOOKINGS)?;
                let rows = stmt.query_map([], row_to_booking)?;
                rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
            }
        };
        Ok(bookings)
    }

    /// Returns the room ids of the given room type that have a holding
    /// booking overlapping the stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn conflicting_room_ids(
        conn: &Connection,
        room_type_id: i64,
        stay: StayDates,
    ) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare_cached(CONFLICTING_ROOM_IDS)?;
        let ids = stmt
            .query_map(
                params![
                    room_type_id,
                    stay.check_out().to_string(),
                    stay.check_in().to_string(),
                ],
                |row| row.get::<_, i64>(0),
            )?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(ids)
    }

    /// Checks whether a room has any holding booking overlapping the stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn room_has_conflict(conn: &Connection, room_id: i64, stay: StayDates) -> Result<bool> {
        let count: i64 = conn.query_row(
            COUNT_ROOM_CONFLICTS,
            params![
                room_id,
                stay.check_out().to_string(),
                stay.check_in().to_string(),
            ],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Atomically claims a room for a stay, creating the booking.
    ///
    /// Inside one IMMEDIATE transaction this re-checks that the room has no
    /// overlapping holding booking, assigns the next per-day booking number,
    /// and inserts the new booking in `pending_payment` with its hold
    /// expiry. The IMMEDIATE transaction takes the write lock up front, so
    /// concurrent claims serialize and at most one can commit a booking for
    /// an overlapping interval.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleAllocation`] if a conflicting booking already holds
    ///   the room; the caller retries with its next candidate
    /// - Any database error if the transaction fails or the booking cannot
    ///   be constructed
    pub fn try_claim_room(
        &mut self,
        room_type_id: i64,
        room_id: i64,
        stay: StayDates,
        guest: &GuestDetails,
        total_price: i64,
        now: DateTime<Utc>,
        hold: chrono::Duration,
    ) -> Result<Booking> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Re-check within the write transaction: the availability scan ran
        // outside it and may be stale.
        let conflicts: i64 = tx.query_row(
            COUNT_ROOM_CONFLICTS,
            params![
                room_id,
                stay.check_out().to_string(),
                stay.check_in().to_string(),
            ],
            |row| row.get(0),
        )?;
        if conflicts > 0 {
            return Err(Error::StaleAllocation {
                room_id,
                check_in: stay.check_in(),
                check_out: stay.check_out(),
            });
        }

        // Assign the per-day sequence inside the same transaction so it
        // cannot collide with a concurrent claim.
        let today = now.date_naive();
        let prefix = format!("BK-{}-%", today.format("%Y%m%d"));
        let seq: i64 =
            tx.query_row(COUNT_TODAYS_BOOKINGS, params![prefix], |row| row.get(0))?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let number = BookingNumber::generate(today, seq as u32 + 1);

        let booking = Booking::builder(number, room_type_id, room_id, stay, total_price)
            .guest(guest.clone())
            .created_at(now)
            .expires_at(now + hold)
            .build()?;

        tx.execute(
            INSERT_BOOKING,
            params![
                booking.booking_number().as_str(),
                booking.room_type_id(),
                booking.room_id(),
                stay.check_in().to_string(),
                stay.check_out().to_string(),
                booking.guest().name,
                booking.guest().guests,
                booking.guest().special_requests,
                booking.total_price(),
                booking.status().as_str(),
                Option::<String>::None,
                Option::<String>::None,
                datetime_to_unix_secs(booking.created_at()),
                datetime_to_unix_secs(booking.expires_at()),
            ],
        )?;

        tx.commit()?;
        Ok(booking)
    }

    /// Compare-and-swap transition of a booking's status.
    ///
    /// The update only applies while the booking is still in `from`; a
    /// caller that lost a race against another transition sees `false` and
    /// must re-read the booking to decide what happened. This is the same
    /// conditional-commit discipline the allocator uses, so confirmation,
    /// cancellation, and the expiry sweep can all race safely.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if this call performed the transition
    /// - `Ok(false)` if the booking was not in `from` (missing or already
    ///   transitioned)
    pub fn transition_status(
        &mut self,
        number: &BookingNumber,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let rows_affected = tx.execute(
            UPDATE_STATUS_CAS,
            params![number.as_str(), from.as_str(), to.as_str()],
        )?;

        tx.commit()?;
        Ok(rows_affected > 0)
    }

    /// Attaches a payment provider reference to a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the booking was found and updated
    /// - `Ok(false)` if the booking was not found
    pub fn attach_provider_reference(
        &mut self,
        number: &BookingNumber,
        reference: &ProviderReference,
    ) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let rows_affected = tx.execute(
            UPDATE_PROVIDER_REFERENCE,
            params![
                number.as_str(),
                reference.provider.as_str(),
                reference.reference,
            ],
        )?;

        tx.commit()?;
        Ok(rows_affected > 0)
    }

    /// Finds `pending_payment` bookings whose hold deadline has passed and
    /// that have no succeeded payment attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_expired_holds(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<Booking>> {
        let mut stmt = conn.prepare(SELECT_EXPIRED_HOLDS)?;
        let bookings = stmt
            .query_map(params![datetime_to_unix_secs(now)], row_to_booking)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(bookings)
    }

    /// Inserts a payment attempt and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when a second
    /// `succeeded` attempt is inserted for the same booking (rejected by
    /// the partial unique index).
    pub fn insert_payment_attempt(&mut self, attempt: &PaymentAttempt) -> Result<i64> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            INSERT_ATTEMPT,
            params![
                attempt.booking_number.as_str(),
                attempt.provider.as_str(),
                attempt.provider_txn_id,
                attempt.amount,
                attempt.status.as_str(),
                datetime_to_unix_secs(attempt.created_at),
            ],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Updates the status of an existing payment attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the attempt was found and updated
    /// - `Ok(false)` if the attempt was not found
    pub fn update_attempt_status(&mut self, id: i64, status: AttemptStatus) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let rows_affected =
            tx.execute(UPDATE_ATTEMPT_STATUS, params![id, status.as_str()])?;
        tx.commit()?;
        Ok(rows_affected > 0)
    }

    /// Lists all payment attempts for a booking in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_payment_attempts(
        conn: &Connection,
        number: &BookingNumber,
    ) -> Result<Vec<PaymentAttempt>> {
        let mut stmt = conn.prepare(LIST_ATTEMPTS)?;
        let attempts = stmt
            .query_map(params![number.as_str()], row_to_attempt)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(attempts)
    }

    /// Returns the booking's succeeded payment attempt, if any.
    ///
    /// At most one can exist; the partial unique index enforces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn succeeded_attempt(
        conn: &Connection,
        number: &BookingNumber,
    ) -> Result<Option<PaymentAttempt>> {
        let mut stmt = conn.prepare_cached(SELECT_SUCCEEDED_ATTEMPT)?;
        match stmt.query_row(params![number.as_str()], row_to_attempt) {
            Ok(attempt) => Ok(Some(attempt)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates or replaces a room type (catalog seeding).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or insert fails.
    pub fn upsert_room_type(&mut self, room_type: &RoomType) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            UPSERT_ROOM_TYPE,
            params![
                room_type.id,
                room_type.name,
                room_type.nightly_rate,
                room_type.monthly_rate,
                room_type.max_guests,
                room_type.active,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Creates or replaces an individual room (catalog seeding).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or insert fails.
    pub fn upsert_room(&mut self, room: &IndividualRoom) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            UPSERT_ROOM,
            params![
                room.id,
                room.room_type_id,
                room.room_number,
                room.floor,
                room.active,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Creates or replaces a promo code (catalog seeding).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or insert fails.
    pub fn upsert_promo(&mut self, promo: &PromoCode) -> Result<()> {
        let (kind, value) = match promo.rule {
            DiscountRule::Flat(amount) => ("flat", amount),
            DiscountRule::Percent(percent) => ("percent", i64::from(percent)),
        };
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            UPSERT_PROMO,
            params![
                promo.code,
                kind,
                value,
                promo.valid_until.map(|d| d.to_string()),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Retrieves a room type by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_room_type(conn: &Connection, id: i64) -> Result<Option<RoomType>> {
        let mut stmt = conn.prepare_cached(SELECT_ROOM_TYPE)?;
        match stmt.query_row(params![id], row_to_room_type) {
            Ok(room_type) => Ok(Some(room_type)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a room type by its display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_room_type_by_name(conn: &Connection, name: &str) -> Result<Option<RoomType>> {
        let mut stmt = conn.prepare_cached(SELECT_ROOM_TYPE_BY_NAME)?;
        match stmt.query_row(params![name], row_to_room_type) {
            Ok(room_type) => Ok(Some(room_type)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves an individual room by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_room(conn: &Connection, id: i64) -> Result<Option<IndividualRoom>> {
        let mut stmt = conn.prepare_cached(SELECT_ROOM)?;
        match stmt.query_row(params![id], row_to_room) {
            Ok(room) => Ok(Some(room)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the active rooms of a room type, ordered by room number.
    ///
    /// The stable ordering makes allocation deterministic for a fixed
    /// candidate set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_rooms(conn: &Connection, room_type_id: i64) -> Result<Vec<IndividualRoom>> {
        let mut stmt = conn.prepare(LIST_ACTIVE_ROOMS)?;
        let rooms = stmt
            .query_map(params![room_type_id], row_to_room)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(rooms)
    }

    /// Retrieves a promo code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found") or the
    /// stored rule is malformed.
    pub fn get_promo(conn: &Connection, code: &str) -> Result<Option<PromoCode>> {
        let mut stmt = conn.prepare_cached(SELECT_PROMO)?;
        let result = stmt.query_row(params![code], |row| {
            let code: String = row.get(0)?;
            let kind: String = row.get(1)?;
            let value: i64 = row.get(2)?;
            let valid_until: Option<String> = row.get(3)?;
            Ok((code, kind, value, valid_until))
        });

        let (code, kind, value, valid_until) = match result {
            Ok(fields) => fields,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let rule = match kind.as_str() {
            "flat" => DiscountRule::Flat(value),
            "percent" => {
                let percent = u8::try_from(value).map_err(|_| Error::Validation {
                    field: "discount_value".into(),
                    message: format!("percent discount {value} out of range"),
                })?;
                DiscountRule::Percent(percent)
            }
            other => {
                return Err(Error::Validation {
                    field: "discount_kind".into(),
                    message: format!("unknown discount kind '{other}'"),
                })
            }
        };

        let valid_until = valid_until
            .map(|text| {
                text.parse::<NaiveDate>().map_err(|_| Error::Validation {
                    field: "valid_until".into(),
                    message: format!("cannot parse date '{text}'"),
                })
            })
            .transpose()?;

        Ok(Some(PromoCode {
            code,
            rule,
            valid_until,
        }))
    }

    /// Verifies database integrity using PRAGMA `integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns an error if the integrity check fails or detects corruption.
    pub fn verify_integrity(&mut self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        claim_test_booking, create_test_database, seed_test_catalog, test_guest, test_stay,
    };

    #[test]
    fn test_claim_creates_booking() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let booking = db
            .try_claim_room(
                1,
                101,
                test_stay(),
                &test_guest(),
                20000,
                Utc::now(),
                chrono::Duration::minutes(15),
            )
            .expect("claim should succeed on an empty room");

        assert_eq!(booking.status(), BookingStatus::PendingPayment);
        assert_eq!(booking.room_id(), 101);

        let loaded = Database::get_booking(db.connection(), booking.booking_number())
            .unwrap()
            .unwrap();
        assert_eq!(loaded, booking);
    }

    #[test]
    fn test_claim_rejects_overlap() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let first = claim_test_booking(&mut db, 101, test_stay());
        assert_eq!(first.room_id(), 101);

        // Same room, same interval: the re-check must refuse
        let second = db.try_claim_room(
            1,
            101,
            test_stay(),
            &test_guest(),
            20000,
            Utc::now(),
            chrono::Duration::minutes(15),
        );
        assert!(matches!(second, Err(Error::StaleAllocation { room_id: 101, .. })));
    }

    #[test]
    fn test_claim_allows_adjacent_interval() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let d = |day| chrono::NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        claim_test_booking(&mut db, 101, StayDates::new(d(1), d(3)).unwrap());

        // Back-to-back stay starting on the previous checkout date
        let adjacent = db.try_claim_room(
            1,
            101,
            StayDates::new(d(3), d(5)).unwrap(),
            &test_guest(),
            20000,
            Utc::now(),
            chrono::Duration::minutes(15),
        );
        assert!(adjacent.is_ok());
    }

    #[test]
    fn test_claim_ignores_released_bookings() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let booking = claim_test_booking(&mut db, 101, test_stay());
        let number = booking.booking_number().clone();

        // Release the hold
        assert!(db
            .transition_status(&number, BookingStatus::PendingPayment, BookingStatus::Expired)
            .unwrap());

        // The interval is allocatable again
        let again = db.try_claim_room(
            1,
            101,
            test_stay(),
            &test_guest(),
            20000,
            Utc::now(),
            chrono::Duration::minutes(15),
        );
        assert!(again.is_ok());
    }

    #[test]
    fn test_booking_numbers_sequence_per_day() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let d = |day| chrono::NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let a = claim_test_booking(&mut db, 101, StayDates::new(d(1), d(3)).unwrap());
        let b = claim_test_booking(&mut db, 102, StayDates::new(d(1), d(3)).unwrap());

        let suffix =
            |booking: &Booking| booking.booking_number().as_str().rsplit('-').next().unwrap().to_string();
        assert_eq!(suffix(&a), "0001");
        assert_eq!(suffix(&b), "0002");
    }

    #[test]
    fn test_transition_status_cas() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_test_booking(&mut db, 101, test_stay());
        let number = booking.booking_number().clone();

        // Winning transition
        assert!(db
            .transition_status(&number, BookingStatus::PendingPayment, BookingStatus::Confirmed)
            .unwrap());

        // Losing replay of the same transition
        assert!(!db
            .transition_status(&number, BookingStatus::PendingPayment, BookingStatus::Confirmed)
            .unwrap());

        let loaded = Database::get_booking(db.connection(), &number).unwrap().unwrap();
        assert_eq!(loaded.status(), BookingStatus::Confirmed);
    }

    #[test]
    fn test_transition_status_missing_booking() {
        let mut db = create_test_database();
        let number = BookingNumber::new("BK-20260301-0001".to_string()).unwrap();
        assert!(!db
            .transition_status(&number, BookingStatus::PendingPayment, BookingStatus::Confirmed)
            .unwrap());
    }

    #[test]
    fn test_attach_provider_reference() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_test_booking(&mut db, 101, test_stay());
        let number = booking.booking_number().clone();

        let reference = ProviderReference::new(ProviderKind::Session, "cs_123".to_string());
        assert!(db.attach_provider_reference(&number, &reference).unwrap());

        let loaded = Database::get_booking(db.connection(), &number).unwrap().unwrap();
        assert_eq!(loaded.provider(), Some(&reference));
    }

    #[test]
    fn test_find_expired_holds() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let now = Utc::now();
        let d = |day| chrono::NaiveDate::from_ymd_opt(2026, 3, day).unwrap();

        // One hold that lapses after a minute, one that lasts an hour
        db.try_claim_room(
            1,
            101,
            StayDates::new(d(1), d(3)).unwrap(),
            &test_guest(),
            20000,
            now,
            chrono::Duration::minutes(1),
        )
        .unwrap();
        let fresh = db
            .try_claim_room(
                1,
                102,
                StayDates::new(d(1), d(3)).unwrap(),
                &test_guest(),
                20000,
                now,
                chrono::Duration::hours(1),
            )
            .unwrap();

        let expired =
            Database::find_expired_holds(db.connection(), now + chrono::Duration::minutes(5))
                .unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].room_id(), 101);
        assert_ne!(expired[0].booking_number(), fresh.booking_number());
    }

    #[test]
    fn test_expired_holds_skip_paid_bookings() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let now = Utc::now();
        let booking = db
            .try_claim_room(
                1,
                101,
                test_stay(),
                &test_guest(),
                20000,
                now,
                chrono::Duration::minutes(1),
            )
            .unwrap();

        // A succeeded attempt exists even though the status is still pending
        db.insert_payment_attempt(&PaymentAttempt {
            id: None,
            booking_number: booking.booking_number().clone(),
            provider: ProviderKind::Session,
            provider_txn_id: "pi_1".to_string(),
            amount: 20000,
            status: AttemptStatus::Succeeded,
            created_at: now,
        })
        .unwrap();

        let expired =
            Database::find_expired_holds(db.connection(), now + chrono::Duration::minutes(5))
                .unwrap();
        assert!(expired.is_empty());
    }

    #[test]
    fn test_payment_attempt_round_trip() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_test_booking(&mut db, 101, test_stay());

        let attempt = PaymentAttempt {
            id: None,
            booking_number: booking.booking_number().clone(),
            provider: ProviderKind::Charge,
            provider_txn_id: "ch_1".to_string(),
            amount: 20000,
            status: AttemptStatus::Created,
            created_at: Utc::now(),
        };
        let id = db.insert_payment_attempt(&attempt).unwrap();

        let attempts =
            Database::list_payment_attempts(db.connection(), booking.booking_number()).unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].id, Some(id));
        assert_eq!(attempts[0].provider, ProviderKind::Charge);
        assert_eq!(attempts[0].status, AttemptStatus::Created);

        assert!(db.update_attempt_status(id, AttemptStatus::Succeeded).unwrap());
        let succeeded = Database::succeeded_attempt(db.connection(), booking.booking_number())
            .unwrap()
            .unwrap();
        assert_eq!(succeeded.id, Some(id));
    }

    #[test]
    fn test_second_succeeded_attempt_rejected() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_test_booking(&mut db, 101, test_stay());

        let mut attempt = PaymentAttempt {
            id: None,
            booking_number: booking.booking_number().clone(),
            provider: ProviderKind::Session,
            provider_txn_id: "pi_1".to_string(),
            amount: 20000,
            status: AttemptStatus::Succeeded,
            created_at: Utc::now(),
        };
        db.insert_payment_attempt(&attempt).unwrap();

        attempt.provider_txn_id = "pi_2".to_string();
        assert!(db.insert_payment_attempt(&attempt).is_err());
    }

    #[test]
    fn test_catalog_reads() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let by_id = Database::get_room_type(db.connection(), 1).unwrap().unwrap();
        assert_eq!(by_id.name, "Deluxe");

        let by_name = Database::get_room_type_by_name(db.connection(), "Deluxe")
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, 1);

        assert!(Database::get_room_type(db.connection(), 99).unwrap().is_none());

        let room = Database::get_room(db.connection(), 101).unwrap().unwrap();
        assert_eq!(room.room_number, "101");

        let rooms = Database::list_active_rooms(db.connection(), 1).unwrap();
        assert_eq!(rooms.len(), 2);
        // Ordered by room number for deterministic allocation
        assert_eq!(rooms[0].room_number, "101");
        assert_eq!(rooms[1].room_number, "102");
    }

    #[test]
    fn test_inactive_rooms_excluded() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        db.upsert_room(&IndividualRoom {
            id: 103,
            room_type_id: 1,
            room_number: "103".to_string(),
            floor: 1,
            active: false,
        })
        .unwrap();

        let rooms = Database::list_active_rooms(db.connection(), 1).unwrap();
        assert_eq!(rooms.len(), 2);
    }

    #[test]
    fn test_promo_round_trip() {
        let mut db = create_test_database();

        db.upsert_promo(&PromoCode {
            code: "SPRING10".to_string(),
            rule: DiscountRule::Percent(10),
            valid_until: chrono::NaiveDate::from_ymd_opt(2026, 3, 31),
        })
        .unwrap();
        db.upsert_promo(&PromoCode {
            code: "TAKE5".to_string(),
            rule: DiscountRule::Flat(500),
            valid_until: None,
        })
        .unwrap();

        let spring = Database::get_promo(db.connection(), "SPRING10").unwrap().unwrap();
        assert_eq!(spring.rule, DiscountRule::Percent(10));
        assert!(spring.valid_until.is_some());

        let take5 = Database::get_promo(db.connection(), "TAKE5").unwrap().unwrap();
        assert_eq!(take5.rule, DiscountRule::Flat(500));
        assert_eq!(take5.valid_until, None);

        assert!(Database::get_promo(db.connection(), "NOPE").unwrap().is_none());
    }

    #[test]
    fn test_list_bookings_filtered() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        let d = |day| chrono::NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let a = claim_test_booking(&mut db, 101, StayDates::new(d(1), d(3)).unwrap());
        claim_test_booking(&mut db, 102, StayDates::new(d(1), d(3)).unwrap());

        db.transition_status(
            a.booking_number(),
            BookingStatus::PendingPayment,
            BookingStatus::Confirmed,
        )
        .unwrap();

        let all = Database::list_bookings(db.connection(), None).unwrap();
        assert_eq!(all.len(), 2);

        let confirmed =
            Database::list_bookings(db.connection(), Some(BookingStatus::Confirmed)).unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].booking_number(), a.booking_number());
    }

    #[test]
    fn test_conflicting_room_ids() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);

        claim_test_booking(&mut db, 101, test_stay());

        let conflicts = Database::conflicting_room_ids(db.connection(), 1, test_stay()).unwrap();
        assert_eq!(conflicts, vec![101]);

        assert!(Database::room_has_conflict(db.connection(), 101, test_stay()).unwrap());
        assert!(!Database::room_has_conflict(db.connection(), 102, test_stay()).unwrap());
    }

    #[test]
    fn test_verify_integrity() {
        let mut db = create_test_database();
        db.verify_integrity().unwrap();
    }
}

//! Guest-facing booking lookup.
//!
//! This is the read path external collaborators use to serve confirmation
//! pages and "find my booking" flows: a booking number in, a full snapshot
//! out. Snapshots join in the room and room type so callers never need the
//! catalog.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingNumber, BookingStatus};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::payment::ProviderKind;

/// A complete, read-only view of one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    /// The public booking number.
    pub booking_number: String,
    /// Display name of the booked room type.
    pub room_type: String,
    /// The assigned room's number.
    pub room_number: String,
    /// The assigned room's floor.
    pub floor: i32,
    /// Check-in date.
    pub check_in: NaiveDate,
    /// Check-out date (exclusive).
    pub check_out: NaiveDate,
    /// Number of nights.
    pub nights: u32,
    /// The guest's name.
    pub guest_name: String,
    /// Number of guests.
    pub guests: u32,
    /// Optional special requests.
    pub special_requests: Option<String>,
    /// The frozen total price in minor units.
    pub total_price: i64,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Payment provider, if payment has been initiated.
    pub provider: Option<ProviderKind>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the unpaid hold lapses.
    pub expires_at: DateTime<Utc>,
}

/// Looks up a booking by its public number.
///
/// # Errors
///
/// Returns an error if the underlying queries fail or the booking's
/// catalog rows are missing.
///
/// # Returns
///
/// - `Ok(Some(snapshot))` if the booking exists
/// - `Ok(None)` if it does not
///
/// # Examples
///
/// ```no_run
/// use innkeep::database::{Database, DatabaseConfig};
/// use innkeep::lookup::lookup_booking;
/// use innkeep::BookingNumber;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let number = BookingNumber::new("BK-20260301-0001".to_string()).unwrap();
///
/// match lookup_booking(db.connection(), &number).unwrap() {
///     Some(snapshot) => println!("room {} ({})", snapshot.room_number, snapshot.status),
///     None => println!("not found"),
/// }
/// ```
pub fn lookup_booking(
    conn: &Connection,
    number: &BookingNumber,
) -> Result<Option<BookingSnapshot>> {
    match Database::get_booking(conn, number)? {
        Some(booking) => Ok(Some(snapshot_for(conn, &booking)?)),
        None => Ok(None),
    }
}

/// Lists booking snapshots, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the underlying queries fail.
pub fn list_snapshots(
    conn: &Connection,
    status: Option<BookingStatus>,
) -> Result<Vec<BookingSnapshot>> {
    Database::list_bookings(conn, status)?
        .iter()
        .map(|booking| snapshot_for(conn, booking))
        .collect()
}

/// Builds the snapshot for a loaded booking.
fn snapshot_for(conn: &Connection, booking: &Booking) -> Result<BookingSnapshot> {
    let room = Database::get_room(conn, booking.room_id())?.ok_or_else(|| Error::NotFound {
        resource: format!("room {}", booking.room_id()),
    })?;
    let room_type =
        Database::get_room_type(conn, booking.room_type_id())?.ok_or_else(|| Error::NotFound {
            resource: format!("room type {}", booking.room_type_id()),
        })?;

    Ok(BookingSnapshot {
        booking_number: booking.booking_number().as_str().to_string(),
        room_type: room_type.name,
        room_number: room.room_number,
        floor: room.floor,
        check_in: booking.stay().check_in(),
        check_out: booking.stay().check_out(),
        nights: booking.stay().nights(),
        guest_name: booking.guest().name.clone(),
        guests: booking.guest().guests,
        special_requests: booking.guest().special_requests.clone(),
        total_price: booking.total_price(),
        status: booking.status(),
        provider: booking.provider().map(|r| r.provider),
        created_at: booking.created_at(),
        expires_at: booking.expires_at(),
    })
}

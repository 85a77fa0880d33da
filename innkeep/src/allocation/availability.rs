//! Availability calculation over booking records.
//!
//! Pure read path: given a room type and a stay, determine which individual
//! rooms have no conflicting holding booking. The result is ordered by room
//! number so allocation is deterministic for a fixed candidate set.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::catalog::IndividualRoom;
use crate::database::Database;
use crate::error::Result;
use crate::stay::StayDates;

/// Returns the rooms of the given room type available for the stay.
///
/// A room qualifies if it is active and has zero overlapping bookings in
/// the holding statuses (`pending_payment`, `confirmed`, `checked_in`),
/// using half-open interval comparison. Back-to-back stays therefore do not
/// conflict.
///
/// This is a pure lookup with no side effects; the allocator re-checks the
/// winning candidate inside its claim transaction because this answer may
/// be stale by the time the claim runs.
///
/// # Errors
///
/// Returns an error if the underlying queries fail.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use innkeep::allocation::find_available;
/// use innkeep::database::{Database, DatabaseConfig};
/// use innkeep::StayDates;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let stay = StayDates::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
/// ).unwrap();
///
/// let candidates = find_available(db.connection(), 1, stay).unwrap();
/// for room in candidates {
///     println!("room {} is free", room.room_number);
/// }
/// ```
pub fn find_available(
    conn: &Connection,
    room_type_id: i64,
    stay: StayDates,
) -> Result<Vec<IndividualRoom>> {
    let rooms = Database::list_active_rooms(conn, room_type_id)?;
    let conflicting: HashSet<i64> = Database::conflicting_room_ids(conn, room_type_id, stay)?
        .into_iter()
        .collect();

    Ok(rooms
        .into_iter()
        .filter(|room| !conflicting.contains(&room.id))
        .collect())
}

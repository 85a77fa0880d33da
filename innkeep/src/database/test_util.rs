//! Shared test utilities for database unit tests.
//!
//! This module provides helper functions used across multiple database test
//! modules.

use chrono::{NaiveDate, Utc};
use tempfile::tempdir;

use crate::booking::{Booking, GuestDetails};
use crate::catalog::{IndividualRoom, RoomType};
use crate::database::{Database, DatabaseConfig};
use crate::stay::StayDates;

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::new(path);
    let db = Database::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Seeds the standard test catalog: room type 1 "Deluxe" with rooms 101
/// and 102.
///
/// # Panics
///
/// Panics if seeding fails.
pub fn seed_test_catalog(db: &mut Database) {
    db.upsert_room_type(&RoomType {
        id: 1,
        name: "Deluxe".to_string(),
        nightly_rate: 10000,
        monthly_rate: None,
        max_guests: 3,
        active: true,
    })
    .unwrap();
    for (id, number) in [(101, "101"), (102, "102")] {
        db.upsert_room(&IndividualRoom {
            id,
            room_type_id: 1,
            room_number: number.to_string(),
            floor: 1,
            active: true,
        })
        .unwrap();
    }
}

/// Returns the standard test stay, 2026-03-01 to 2026-03-03.
///
/// # Panics
///
/// Panics if the constant dates are invalid, which cannot happen.
#[must_use]
pub fn test_stay() -> StayDates {
    StayDates::new(
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
    )
    .unwrap()
}

/// Returns standard test guest details.
///
/// # Panics
///
/// Panics if the constant details are invalid, which cannot happen.
#[must_use]
pub fn test_guest() -> GuestDetails {
    GuestDetails::new("Ada Lovelace".to_string(), 2, None).unwrap()
}

/// Claims a room for the given stay with standard test values.
///
/// # Panics
///
/// Panics if the claim fails or loses; tests using this helper expect the
/// room to be free.
pub fn claim_test_booking(db: &mut Database, room_id: i64, stay: StayDates) -> Booking {
    db.try_claim_room(
        1,
        room_id,
        stay,
        &test_guest(),
        20000,
        Utc::now(),
        chrono::Duration::minutes(15),
    )
    .expect("test room should be free")
}

//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;

use innkeep::database::{Database, DatabaseConfig};
use innkeep::{
    Booking, GuestDetails, IndividualRoom, InitiateOutcome, ProviderClient, ProviderKind,
    ProviderPaymentStatus, Result, RoomType, StayDates,
};

/// A temporary database file shared by several connections.
pub struct TestStore {
    pub path: PathBuf,
    // Held so the directory outlives the test
    _dir: TempDir,
}

impl TestStore {
    /// Creates a fresh store and initializes its schema.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("innkeep.db");
        // Opening once initializes the schema
        let _ = Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { path, _dir: dir }
    }

    /// Opens a new connection to the store.
    pub fn open(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).unwrap()
    }
}

/// Seeds the standard catalog: "Deluxe" (id 1) with rooms 101 and 102, and
/// "Single" (id 2) with room 201 only.
pub fn seed_catalog(db: &mut Database) {
    db.upsert_room_type(&RoomType {
        id: 1,
        name: "Deluxe".to_string(),
        nightly_rate: 10000,
        monthly_rate: None,
        max_guests: 3,
        active: true,
    })
    .unwrap();
    db.upsert_room_type(&RoomType {
        id: 2,
        name: "Single".to_string(),
        nightly_rate: 6000,
        monthly_rate: None,
        max_guests: 1,
        active: true,
    })
    .unwrap();

    for (id, type_id, number) in [(101, 1, "101"), (102, 1, "102"), (201, 2, "201")] {
        db.upsert_room(&IndividualRoom {
            id,
            room_type_id: type_id,
            room_number: number.to_string(),
            floor: 1,
            active: true,
        })
        .unwrap();
    }
}

/// March 2026 date shorthand.
pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

/// The standard test stay, 2026-03-01 to 2026-03-03.
pub fn stay() -> StayDates {
    StayDates::new(d(1), d(3)).unwrap()
}

/// Standard guest details.
pub fn guest() -> GuestDetails {
    GuestDetails::new("Ada Lovelace".to_string(), 2, None).unwrap()
}

/// A deterministic stand-in for the session-based provider.
///
/// Initiation hands out `cs-<booking number>` references; confirmation
/// recognizes exactly those references and reports them paid at the
/// configured amount.
pub struct StubProvider {
    pub amount: i64,
}

impl ProviderClient for StubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Session
    }

    fn initiate(&self, booking: &Booking) -> Result<InitiateOutcome> {
        let session_id = format!("cs-{}", booking.booking_number());
        Ok(InitiateOutcome::Redirect {
            redirect_url: format!("https://pay.example/s/{session_id}"),
            session_id,
        })
    }

    fn confirm(&self, reference: &str) -> Result<ProviderPaymentStatus> {
        if reference.starts_with("cs-") {
            Ok(ProviderPaymentStatus::Paid {
                amount: self.amount,
                transaction_id: format!("pi-{reference}"),
            })
        } else {
            Ok(ProviderPaymentStatus::Unknown)
        }
    }
}

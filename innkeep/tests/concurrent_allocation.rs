//! Concurrency tests for the allocator's atomic claim.
//!
//! These tests race real threads against one database file, each with its
//! own connection, to verify the core guarantee: at most one successful
//! allocation per room per overlapping interval, no matter how requests
//! interleave.

mod common;

use std::thread;

use chrono::{DateTime, Utc};

use common::{d, guest, seed_catalog, TestStore};
use innkeep::allocation::{AllocationRequest, Allocator};
use innkeep::config::BookingConfig;
use innkeep::database::Database;
use innkeep::{BookingStatus, Error, ExpirySweep, StayDates};

fn now() -> DateTime<Utc> {
    "2026-02-20T12:00:00Z".parse().unwrap()
}

fn request(room_type_id: i64) -> AllocationRequest {
    AllocationRequest {
        room_type_id,
        stay: StayDates::new(d(1), d(3)).unwrap(),
        guest: guest(),
        total_price: 20000,
    }
}

#[test]
fn exactly_one_winner_for_a_single_room() {
    // Room type "Single" has exactly one room. N concurrent requests for
    // the same interval: exactly 1 succeeds, N-1 fail with NoAvailability.
    let store = TestStore::new();
    {
        let mut db = store.open();
        seed_catalog(&mut db);
    }

    const THREADS: usize = 8;
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let path = store.path.clone();
            thread::spawn(move || {
                let mut db =
                    Database::open(innkeep::DatabaseConfig::new(path)).unwrap();
                let allocator = Allocator::new(BookingConfig::default());
                allocator.allocate(&mut db, &request(2), now())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let no_availability = results
        .iter()
        .filter(|r| matches!(r, Err(Error::NoAvailability { .. })))
        .count();

    assert_eq!(successes, 1, "exactly one thread may win the room");
    assert_eq!(no_availability, THREADS - 1);
}

#[test]
fn winners_bounded_by_room_count() {
    // Two Deluxe rooms, five racing requests: exactly two winners, on
    // distinct rooms.
    let store = TestStore::new();
    {
        let mut db = store.open();
        seed_catalog(&mut db);
    }

    const THREADS: usize = 5;
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let path = store.path.clone();
            thread::spawn(move || {
                let mut db =
                    Database::open(innkeep::DatabaseConfig::new(path)).unwrap();
                let allocator = Allocator::new(BookingConfig::default());
                allocator.allocate(&mut db, &request(1), now())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.into_iter().filter_map(Result::ok).collect();

    assert_eq!(winners.len(), 2);
    assert_ne!(winners[0].room_id(), winners[1].room_id());
    assert_ne!(winners[0].booking_number(), winners[1].booking_number());
}

#[test]
fn sweep_races_safely_with_itself() {
    // Two sweeps over the same expired holds: every hold expires exactly
    // once and both passes complete without error.
    let store = TestStore::new();
    let claim_time = now();
    {
        let mut db = store.open();
        seed_catalog(&mut db);
        for room_id in [101, 102] {
            db.try_claim_room(
                1,
                room_id,
                StayDates::new(d(1), d(3)).unwrap(),
                &guest(),
                20000,
                claim_time,
                chrono::Duration::minutes(1),
            )
            .unwrap();
        }
    }

    let sweep_time = claim_time + chrono::Duration::minutes(10);
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path = store.path.clone();
            thread::spawn(move || {
                let mut db =
                    Database::open(innkeep::DatabaseConfig::new(path)).unwrap();
                ExpirySweep::run(&mut db, sweep_time, false).unwrap()
            })
        })
        .collect();

    let total_expired: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap().expired_count)
        .sum();
    assert_eq!(total_expired, 2, "each hold expires exactly once");

    let db = store.open();
    let expired =
        Database::list_bookings(db.connection(), Some(BookingStatus::Expired)).unwrap();
    assert_eq!(expired.len(), 2);
}

#[test]
fn released_room_is_reclaimed_after_concurrent_race() {
    // A winner that cancels frees the room for a later request, even after
    // a burst of contention.
    let store = TestStore::new();
    {
        let mut db = store.open();
        seed_catalog(&mut db);
    }

    let mut db = store.open();
    let allocator = Allocator::new(BookingConfig::default());
    let winner = allocator.allocate(&mut db, &request(2), now()).unwrap();
    assert!(matches!(
        allocator.allocate(&mut db, &request(2), now()),
        Err(Error::NoAvailability { .. })
    ));

    innkeep::cancel(&mut db, winner.booking_number()).unwrap();

    let second = allocator.allocate(&mut db, &request(2), now()).unwrap();
    assert_eq!(second.room_id(), 201);
}

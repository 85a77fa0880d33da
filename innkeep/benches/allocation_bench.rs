//! Benchmarks for the hot read paths: availability scanning and pricing.

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

use innkeep::allocation::find_available;
use innkeep::database::{Database, DatabaseConfig};
use innkeep::pricing::quote;
use innkeep::{DiscountRule, GuestDetails, IndividualRoom, PromoCode, RoomType, StayDates};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

/// Builds a database with one room type, 50 rooms, and a booking on every
/// other room.
fn seeded_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.db");
    std::mem::forget(dir);

    let mut db = Database::open(DatabaseConfig::new(path)).unwrap();
    db.upsert_room_type(&RoomType {
        id: 1,
        name: "Deluxe".to_string(),
        nightly_rate: 10000,
        monthly_rate: None,
        max_guests: 3,
        active: true,
    })
    .unwrap();

    let guest = GuestDetails::new("Bench Guest".to_string(), 2, None).unwrap();
    for i in 0..50 {
        let room_id = 100 + i;
        db.upsert_room(&IndividualRoom {
            id: room_id,
            room_type_id: 1,
            room_number: format!("{room_id}"),
            floor: 1,
            active: true,
        })
        .unwrap();

        if i % 2 == 0 {
            db.try_claim_room(
                1,
                room_id,
                StayDates::new(d(1), d(5)).unwrap(),
                &guest,
                40000,
                Utc::now(),
                chrono::Duration::minutes(15),
            )
            .unwrap()
            .unwrap();
        }
    }
    db
}

fn bench_find_available(c: &mut Criterion) {
    let db = seeded_database();
    let stay = StayDates::new(d(3), d(6)).unwrap();

    c.bench_function("find_available_50_rooms", |b| {
        b.iter(|| {
            let rooms = find_available(db.connection(), black_box(1), black_box(stay)).unwrap();
            black_box(rooms)
        });
    });
}

fn bench_quote(c: &mut Criterion) {
    let deluxe = RoomType {
        id: 1,
        name: "Deluxe".to_string(),
        nightly_rate: 10000,
        monthly_rate: None,
        max_guests: 3,
        active: true,
    };
    let stay = StayDates::new(d(1), d(8)).unwrap();
    let promo = PromoCode {
        code: "SPRING10".to_string(),
        rule: DiscountRule::Percent(10),
        valid_until: None,
    };

    c.bench_function("quote_with_promo", |b| {
        b.iter(|| black_box(quote(black_box(&deluxe), black_box(stay), Some(&promo))));
    });
}

criterion_group!(benches, bench_find_available, bench_quote);
criterion_main!(benches);

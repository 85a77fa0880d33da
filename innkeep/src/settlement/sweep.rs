//! Expiry sweep for unpaid holds.
//!
//! The sweep releases rooms held by `pending_payment` bookings whose hold
//! deadline has passed and that have no succeeded payment attempt. Each
//! release goes through the same status compare-and-swap as confirmation,
//! so the sweep is safe to run concurrently with itself and with
//! confirmation attempts: for any one booking, exactly one of them wins.
//!
//! A dry-run mode reports what would expire without applying anything.

use chrono::{DateTime, Utc};

use crate::booking::{Booking, BookingStatus};
use crate::database::Database;
use crate::error::Result;

/// Result of an expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of bookings expired (or that would expire in dry-run mode).
    pub expired_count: usize,
    /// The affected bookings.
    pub expired_bookings: Vec<Booking>,
}

/// The periodic expiry sweep.
pub struct ExpirySweep;

impl ExpirySweep {
    /// Runs one sweep pass at the given instant.
    ///
    /// # Arguments
    ///
    /// * `db` - Database to operate on
    /// * `now` - The sweep's notion of the current instant
    /// * `dry_run` - If true, report what would expire without applying
    ///
    /// # Errors
    ///
    /// Returns an error if database operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::Utc;
    /// use innkeep::database::{Database, DatabaseConfig};
    /// use innkeep::settlement::ExpirySweep;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
    ///
    /// // Preview
    /// let preview = ExpirySweep::run(&mut db, Utc::now(), true).unwrap();
    /// println!("would expire {} holds", preview.expired_count);
    ///
    /// // Apply
    /// let result = ExpirySweep::run(&mut db, Utc::now(), false).unwrap();
    /// println!("expired {} holds", result.expired_count);
    /// ```
    pub fn run(db: &mut Database, now: DateTime<Utc>, dry_run: bool) -> Result<SweepResult> {
        let candidates = Database::find_expired_holds(db.connection(), now)?;

        if dry_run {
            return Ok(SweepResult {
                expired_count: candidates.len(),
                expired_bookings: candidates,
            });
        }

        let mut expired = Vec::new();
        for booking in candidates {
            // CAS per booking: a confirmation that committed since the scan
            // wins and the sweep skips the booking
            let won = db.transition_status(
                booking.booking_number(),
                BookingStatus::PendingPayment,
                BookingStatus::Expired,
            )?;
            if won {
                log::debug!(
                    "expired {}, room {} released",
                    booking.booking_number(),
                    booking.room_id()
                );
                if let Some(updated) =
                    Database::get_booking(db.connection(), booking.booking_number())?
                {
                    expired.push(updated);
                }
            }
        }

        Ok(SweepResult {
            expired_count: expired.len(),
            expired_bookings: expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, seed_test_catalog, test_guest, test_stay,
    };
    use crate::payment::{AttemptStatus, PaymentAttempt, ProviderKind};

    fn claim_with_hold(db: &mut Database, room_id: i64, minutes: i64) -> Booking {
        db.try_claim_room(
            1,
            room_id,
            test_stay(),
            &test_guest(),
            20000,
            Utc::now(),
            chrono::Duration::minutes(minutes),
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_empty_database() {
        let mut db = create_test_database();
        let result = ExpirySweep::run(&mut db, Utc::now(), false).unwrap();
        assert_eq!(result.expired_count, 0);
    }

    #[test]
    fn test_sweep_expires_lapsed_hold() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_with_hold(&mut db, 101, 1);

        let later = Utc::now() + chrono::Duration::minutes(5);
        let result = ExpirySweep::run(&mut db, later, false).unwrap();

        assert_eq!(result.expired_count, 1);
        assert_eq!(result.expired_bookings[0].status(), BookingStatus::Expired);

        let loaded = Database::get_booking(db.connection(), booking.booking_number())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status(), BookingStatus::Expired);
    }

    #[test]
    fn test_sweep_releases_room_for_reallocation() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        claim_with_hold(&mut db, 101, 1);

        let later = Utc::now() + chrono::Duration::minutes(5);
        ExpirySweep::run(&mut db, later, false).unwrap();

        // The same room and interval can be claimed again
        let again = db.try_claim_room(
            1,
            101,
            test_stay(),
            &test_guest(),
            20000,
            later,
            chrono::Duration::minutes(15),
        );
        assert!(again.is_ok());
    }

    #[test]
    fn test_sweep_spares_fresh_holds() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        claim_with_hold(&mut db, 101, 60);

        let result = ExpirySweep::run(&mut db, Utc::now(), false).unwrap();
        assert_eq!(result.expired_count, 0);
    }

    #[test]
    fn test_sweep_spares_confirmed_bookings() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_with_hold(&mut db, 101, 1);
        db.transition_status(
            booking.booking_number(),
            BookingStatus::PendingPayment,
            BookingStatus::Confirmed,
        )
        .unwrap();

        let later = Utc::now() + chrono::Duration::minutes(5);
        let result = ExpirySweep::run(&mut db, later, false).unwrap();
        assert_eq!(result.expired_count, 0);

        let loaded = Database::get_booking(db.connection(), booking.booking_number())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status(), BookingStatus::Confirmed);
    }

    #[test]
    fn test_sweep_spares_paid_but_untransitioned_holds() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_with_hold(&mut db, 101, 1);

        // A succeeded attempt exists; the sweep must not expire the booking
        // even though its status is still pending
        db.insert_payment_attempt(&PaymentAttempt {
            id: None,
            booking_number: booking.booking_number().clone(),
            provider: ProviderKind::Session,
            provider_txn_id: "pi_1".to_string(),
            amount: 20000,
            status: AttemptStatus::Succeeded,
            created_at: Utc::now(),
        })
        .unwrap();

        let later = Utc::now() + chrono::Duration::minutes(5);
        let result = ExpirySweep::run(&mut db, later, false).unwrap();
        assert_eq!(result.expired_count, 0);
    }

    #[test]
    fn test_sweep_dry_run_changes_nothing() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        let booking = claim_with_hold(&mut db, 101, 1);

        let later = Utc::now() + chrono::Duration::minutes(5);
        let preview = ExpirySweep::run(&mut db, later, true).unwrap();
        assert_eq!(preview.expired_count, 1);

        let loaded = Database::get_booking(db.connection(), booking.booking_number())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status(), BookingStatus::PendingPayment);
    }

    #[test]
    fn test_sweep_is_reentrant() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        claim_with_hold(&mut db, 101, 1);

        let later = Utc::now() + chrono::Duration::minutes(5);
        let first = ExpirySweep::run(&mut db, later, false).unwrap();
        assert_eq!(first.expired_count, 1);

        // Running again finds nothing left to do
        let second = ExpirySweep::run(&mut db, later, false).unwrap();
        assert_eq!(second.expired_count, 0);
    }

    #[test]
    fn test_sweep_handles_mixed_holds() {
        let mut db = create_test_database();
        seed_test_catalog(&mut db);
        claim_with_hold(&mut db, 101, 1);
        claim_with_hold(&mut db, 102, 60);

        let later = Utc::now() + chrono::Duration::minutes(5);
        let result = ExpirySweep::run(&mut db, later, false).unwrap();
        assert_eq!(result.expired_count, 1);
        assert_eq!(result.expired_bookings[0].room_id(), 101);
    }
}

//! The transactional allocation core.
//!
//! The allocator turns a validated stay request into a booking holding one
//! individual room. Candidates come from the availability scan; the claim
//! itself is a conditional insert that re-checks for conflicts inside one
//! write transaction, so concurrent requests for the same room type and
//! interval can never both take the same room. A lost claim retries against
//! the next candidate; only when every candidate is exhausted does the
//! request fail with `NoAvailability`.

use chrono::{DateTime, Utc};

use crate::booking::{Booking, GuestDetails};
use crate::config::BookingConfig;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::stay::StayDates;

use super::availability::find_available;

/// A validated allocation request.
///
/// The total price comes from the quote the guest accepted; the allocator
/// freezes it into the booking without recomputing it.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// The requested room type.
    pub room_type_id: i64,
    /// The requested stay.
    pub stay: StayDates,
    /// Guest details for the booking.
    pub guest: GuestDetails,
    /// The accepted quote total, in minor units.
    pub total_price: i64,
}

/// Allocates rooms to stay requests.
///
/// # Examples
///
/// ```no_run
/// use chrono::Utc;
/// use innkeep::allocation::{AllocationRequest, Allocator};
/// use innkeep::config::BookingConfig;
/// use innkeep::database::{Database, DatabaseConfig};
/// use innkeep::{GuestDetails, StayDates};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let allocator = Allocator::new(BookingConfig::default());
///
/// let request = AllocationRequest {
///     room_type_id: 1,
///     stay: StayDates::new(
///         chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///         chrono::NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
///     ).unwrap(),
///     guest: GuestDetails::new("Ada Lovelace".to_string(), 2, None).unwrap(),
///     total_price: 20000,
/// };
///
/// let booking = allocator.allocate(&mut db, &request, Utc::now()).unwrap();
/// println!("assigned room {}", booking.room_id());
/// ```
#[derive(Debug, Clone)]
pub struct Allocator {
    config: BookingConfig,
}

impl Allocator {
    /// Creates an allocator with the given booking configuration.
    #[must_use]
    pub const fn new(config: BookingConfig) -> Self {
        Self { config }
    }

    /// Allocates a room for the request, creating a `pending_payment`
    /// booking with a hold expiry of now plus the configured hold duration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDateRange`] if the stay is in the past or beyond
    ///   the booking horizon
    /// - [`Error::NotFound`] if the room type does not exist or is inactive
    /// - [`Error::Validation`] if the guest count exceeds the room type's
    ///   capacity
    /// - [`Error::NoAvailability`] if no candidate room can be claimed
    pub fn allocate(
        &self,
        db: &mut Database,
        request: &AllocationRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        self.validate_dates(request.stay, now)?;

        let room_type = Database::get_room_type(db.connection(), request.room_type_id)?
            .filter(|rt| rt.active)
            .ok_or_else(|| Error::NotFound {
                resource: format!("room type {}", request.room_type_id),
            })?;

        if request.guest.guests > room_type.max_guests {
            return Err(Error::Validation {
                field: "guests".into(),
                message: format!(
                    "{} guests exceed the {} limit of {}",
                    request.guest.guests, room_type.name, room_type.max_guests
                ),
            });
        }

        let candidates = find_available(db.connection(), request.room_type_id, request.stay)?;

        for candidate in &candidates {
            let claimed = db.try_claim_room(
                request.room_type_id,
                candidate.id,
                request.stay,
                &request.guest,
                request.total_price,
                now,
                self.config.hold_duration(),
            );

            match claimed {
                Ok(booking) => {
                    log::debug!(
                        "allocated room {} to {} for {}",
                        candidate.room_number,
                        booking.booking_number(),
                        request.stay
                    );
                    return Ok(booking);
                }
                Err(Error::StaleAllocation { .. }) => {
                    // Lost the claim race; the next candidate may still be free
                    log::debug!(
                        "room {} claimed concurrently for {}, trying next candidate",
                        candidate.room_number,
                        request.stay
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Err(Error::NoAvailability {
            room_type_id: request.room_type_id,
            check_in: request.stay.check_in(),
            check_out: request.stay.check_out(),
        })
    }

    /// Rejects stays in the past or beyond the booking horizon.
    fn validate_dates(&self, stay: StayDates, now: DateTime<Utc>) -> Result<()> {
        let today = now.date_naive();
        if stay.check_in() < today {
            return Err(Error::InvalidDateRange {
                check_in: stay.check_in(),
                check_out: stay.check_out(),
                reason: "check-in date is in the past".to_string(),
            });
        }

        let horizon = today + chrono::Duration::days(self.config.horizon_days);
        if stay.check_out() > horizon {
            return Err(Error::InvalidDateRange {
                check_in: stay.check_in(),
                check_out: stay.check_out(),
                reason: format!(
                    "stay ends beyond the booking horizon of {} days",
                    self.config.horizon_days
                ),
            });
        }

        Ok(())
    }
}

//! The settlement state machine.
//!
//! This module owns every booking status transition. Confirmations consume
//! the payment gateway's authoritative answer and commit through the same
//! compare-and-swap primitive the allocator uses, so a confirmation racing
//! a cancellation or the expiry sweep has exactly one winner and the loser
//! observes it. A booking that already left `pending_payment` can never be
//! resurrected by a late confirmation.

pub mod sweep;

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::booking::{Booking, BookingNumber, BookingStatus};
use crate::database::Database;
use crate::error::{Error, Result, VerificationFailureReason};
use crate::payment::{
    AttemptStatus, InitiateOutcome, PaymentAttempt, ProviderClient, ProviderPaymentStatus,
    ProviderReference,
};

pub use sweep::{ExpirySweep, SweepResult};

/// Bounded retries for provider confirmation round-trips.
const CONFIRM_ATTEMPTS: u32 = 3;

/// Initial backoff between confirmation retries; doubles per attempt.
const CONFIRM_BACKOFF: Duration = Duration::from_millis(500);

/// Outcome of a successful confirmation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// This call verified the payment and transitioned the booking.
    Confirmed(Booking),
    /// The booking was already confirmed; the duplicate confirmation was
    /// re-verified and no side effects ran again.
    AlreadyConfirmed(Booking),
    /// The provider reports the payment as still in progress; the booking
    /// stays in `pending_payment`.
    Pending(Booking),
}

impl ConfirmOutcome {
    /// Returns the booking in its post-call state.
    #[must_use]
    pub const fn booking(&self) -> &Booking {
        match self {
            Self::Confirmed(b) | Self::AlreadyConfirmed(b) | Self::Pending(b) => b,
        }
    }
}

/// Initiates payment for a `pending_payment` booking.
///
/// Creates the provider-side session or charge for the booking's frozen
/// total, records the initiation as a `created` payment attempt, and
/// attaches the provider reference to the booking for later verification.
///
/// # Errors
///
/// - [`Error::NotFound`] if the booking does not exist
/// - [`Error::InvalidTransition`] if the booking is not awaiting payment
/// - [`Error::ProviderUnavailable`] if the provider cannot be reached
pub fn initiate_payment(
    db: &mut Database,
    provider: &dyn ProviderClient,
    number: &BookingNumber,
    now: DateTime<Utc>,
) -> Result<InitiateOutcome> {
    let booking = load_booking(db, number)?;
    if booking.status() != BookingStatus::PendingPayment {
        return Err(invalid_transition(&booking, BookingStatus::Confirmed));
    }

    let outcome = provider.initiate(&booking)?;
    let reference = ProviderReference::new(provider.kind(), outcome.reference().to_string());
    db.attach_provider_reference(number, &reference)?;
    db.insert_payment_attempt(&PaymentAttempt {
        id: None,
        booking_number: number.clone(),
        provider: provider.kind(),
        provider_txn_id: outcome.reference().to_string(),
        amount: booking.total_price(),
        status: AttemptStatus::Created,
        created_at: now,
    })?;

    log::debug!(
        "initiated {} payment for {}",
        provider.kind(),
        number
    );
    Ok(outcome)
}

/// Confirms payment for a booking against the provider's authoritative
/// record.
///
/// The caller's `reference` (typically lifted from a return URL or webhook)
/// is untrusted: it must match the reference recorded at initiation, and
/// the provider is always re-queried for the payment's real status and
/// amount before any transition. The transition itself is a
/// compare-and-swap, so duplicate confirmations and races against
/// cancellation or expiry resolve to exactly one winner.
///
/// Calling this twice with the same valid reference is safe: the second
/// call re-verifies and reports [`ConfirmOutcome::AlreadyConfirmed`]
/// without creating another succeeded attempt or re-running side effects.
///
/// # Errors
///
/// - [`Error::NotFound`] if the booking does not exist
/// - [`Error::PaymentVerificationFailed`] if the reference, provider
///   status, or amount do not corroborate the confirmation; the booking
///   stays in `pending_payment`
/// - [`Error::InvalidTransition`] if the booking already expired or was
///   cancelled (a late confirmation never resurrects it)
/// - [`Error::ProviderUnavailable`] if the provider stayed unreachable
///   across bounded retries
pub fn confirm_payment(
    db: &mut Database,
    provider: &dyn ProviderClient,
    number: &BookingNumber,
    reference: &str,
    now: DateTime<Utc>,
) -> Result<ConfirmOutcome> {
    let booking = load_booking(db, number)?;

    match booking.status() {
        BookingStatus::PendingPayment => {
            verify_reference(&booking, reference)?;
            let status = confirm_with_retry(provider, reference)?;
            settle_pending(db, provider, booking, reference, status, now)
        }
        BookingStatus::Confirmed => {
            // Duplicate confirmation (e.g. webhook and return URL both
            // fired): re-verify, then succeed without new side effects.
            verify_reference(&booking, reference)?;
            let status = confirm_with_retry(provider, reference)?;
            verify_paid(&booking, &status)?;
            log::debug!("duplicate confirmation for {} re-verified", number);
            Ok(ConfirmOutcome::AlreadyConfirmed(booking))
        }
        _ => Err(invalid_transition(&booking, BookingStatus::Confirmed)),
    }
}

/// Settles a `pending_payment` booking given the provider's answer.
fn settle_pending(
    db: &mut Database,
    provider: &dyn ProviderClient,
    booking: Booking,
    reference: &str,
    status: ProviderPaymentStatus,
    now: DateTime<Utc>,
) -> Result<ConfirmOutcome> {
    let number = booking.booking_number().clone();

    match status {
        ProviderPaymentStatus::Paid {
            amount,
            transaction_id,
        } => {
            if amount != booking.total_price() {
                record_attempt(db, &booking, provider, &transaction_id, AttemptStatus::Failed, now)?;
                return Err(Error::PaymentVerificationFailed {
                    booking_number: number.as_str().to_string(),
                    reason: VerificationFailureReason::AmountMismatch {
                        expected: booking.total_price(),
                        reported: amount,
                    },
                });
            }

            // Transition first, then record the succeeded attempt: only the
            // CAS winner writes it, so the one-success index always holds
            // and a lost race leaves no stray success on a dead booking.
            if db.transition_status(&number, BookingStatus::PendingPayment, BookingStatus::Confirmed)? {
                record_attempt(db, &booking, provider, &transaction_id, AttemptStatus::Succeeded, now)?;
                let updated = load_booking(db, &number)?;
                log::debug!("confirmed {} via {}", number, provider.kind());
                return Ok(ConfirmOutcome::Confirmed(updated));
            }

            // Lost the race: another path transitioned the booking first
            let current = load_booking(db, &number)?;
            match current.status() {
                BookingStatus::Confirmed => Ok(ConfirmOutcome::AlreadyConfirmed(current)),
                _ => Err(invalid_transition(&current, BookingStatus::Confirmed)),
            }
        }
        ProviderPaymentStatus::Declined { reason } => {
            record_attempt(db, &booking, provider, reference, AttemptStatus::Failed, now)?;
            log::debug!("provider declined payment for {}: {}", number, reason);
            Err(Error::PaymentVerificationFailed {
                booking_number: number.as_str().to_string(),
                reason: VerificationFailureReason::ProviderDeclined,
            })
        }
        ProviderPaymentStatus::Pending => Ok(ConfirmOutcome::Pending(booking)),
        ProviderPaymentStatus::Unknown => Err(Error::PaymentVerificationFailed {
            booking_number: number.as_str().to_string(),
            reason: VerificationFailureReason::UnknownReference,
        }),
    }
}

/// Checks a guest in.
///
/// Date-gated: not permitted before the booking's check-in date.
///
/// # Errors
///
/// - [`Error::NotFound`] if the booking does not exist
/// - [`Error::Validation`] if check-in has not opened yet
/// - [`Error::InvalidTransition`] if the booking is not `confirmed`
pub fn check_in(db: &mut Database, number: &BookingNumber, today: NaiveDate) -> Result<Booking> {
    let booking = load_booking(db, number)?;
    if booking.status() != BookingStatus::Confirmed {
        return Err(invalid_transition(&booking, BookingStatus::CheckedIn));
    }
    if today < booking.stay().check_in() {
        return Err(Error::Validation {
            field: "check_in".into(),
            message: format!(
                "check-in for {number} opens on {}",
                booking.stay().check_in()
            ),
        });
    }

    if db.transition_status(number, BookingStatus::Confirmed, BookingStatus::CheckedIn)? {
        load_booking(db, number)
    } else {
        let current = load_booking(db, number)?;
        Err(invalid_transition(&current, BookingStatus::CheckedIn))
    }
}

/// Checks a guest out, closing the stay.
///
/// # Errors
///
/// - [`Error::NotFound`] if the booking does not exist
/// - [`Error::InvalidTransition`] if the booking is not `checked_in`
pub fn check_out(db: &mut Database, number: &BookingNumber) -> Result<Booking> {
    if db.transition_status(number, BookingStatus::CheckedIn, BookingStatus::CheckedOut)? {
        load_booking(db, number)
    } else {
        let current = load_booking(db, number)?;
        Err(invalid_transition(&current, BookingStatus::CheckedOut))
    }
}

/// Cancels a booking, releasing its held room.
///
/// Always permitted before check-in, from either `pending_payment` or
/// `confirmed`.
///
/// # Errors
///
/// - [`Error::NotFound`] if the booking does not exist
/// - [`Error::InvalidTransition`] if the booking's status does not permit
///   cancellation
pub fn cancel(db: &mut Database, number: &BookingNumber) -> Result<Booking> {
    let booking = load_booking(db, number)?;
    let from = match booking.status() {
        status @ (BookingStatus::PendingPayment | BookingStatus::Confirmed) => status,
        _ => return Err(invalid_transition(&booking, BookingStatus::Cancelled)),
    };

    if db.transition_status(number, from, BookingStatus::Cancelled)? {
        log::debug!("cancelled {}, room {} released", number, booking.room_id());
        load_booking(db, number)
    } else {
        let current = load_booking(db, number)?;
        Err(invalid_transition(&current, BookingStatus::Cancelled))
    }
}

/// Loads a booking or reports it missing.
fn load_booking(db: &Database, number: &BookingNumber) -> Result<Booking> {
    Database::get_booking(db.connection(), number)?.ok_or_else(|| Error::NotFound {
        resource: format!("booking {number}"),
    })
}

/// Builds the `InvalidTransition` error naming both states.
fn invalid_transition(booking: &Booking, attempted: BookingStatus) -> Error {
    Error::InvalidTransition {
        booking_number: booking.booking_number().as_str().to_string(),
        current: booking.status().as_str().to_string(),
        attempted: attempted.as_str().to_string(),
    }
}

/// Rejects a caller-supplied reference that does not match the reference
/// recorded when payment was initiated.
fn verify_reference(booking: &Booking, reference: &str) -> Result<()> {
    match booking.provider() {
        Some(recorded) if recorded.reference == reference => Ok(()),
        Some(_) => Err(Error::PaymentVerificationFailed {
            booking_number: booking.booking_number().as_str().to_string(),
            reason: VerificationFailureReason::ReferenceMismatch,
        }),
        // No initiation recorded: the provider re-query is the sole judge
        None => Ok(()),
    }
}

/// Verifies a provider answer corroborates a completed payment of the
/// booking's frozen total.
fn verify_paid(booking: &Booking, status: &ProviderPaymentStatus) -> Result<()> {
    let number = booking.booking_number().as_str().to_string();
    match status {
        ProviderPaymentStatus::Paid { amount, .. } if *amount == booking.total_price() => Ok(()),
        ProviderPaymentStatus::Paid { amount, .. } => Err(Error::PaymentVerificationFailed {
            booking_number: number,
            reason: VerificationFailureReason::AmountMismatch {
                expected: booking.total_price(),
                reported: *amount,
            },
        }),
        ProviderPaymentStatus::Declined { .. } => Err(Error::PaymentVerificationFailed {
            booking_number: number,
            reason: VerificationFailureReason::ProviderDeclined,
        }),
        ProviderPaymentStatus::Pending | ProviderPaymentStatus::Unknown => {
            Err(Error::PaymentVerificationFailed {
                booking_number: number,
                reason: VerificationFailureReason::UnknownReference,
            })
        }
    }
}

/// Records a payment attempt for audit.
fn record_attempt(
    db: &mut Database,
    booking: &Booking,
    provider: &dyn ProviderClient,
    transaction_id: &str,
    status: AttemptStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    db.insert_payment_attempt(&PaymentAttempt {
        id: None,
        booking_number: booking.booking_number().clone(),
        provider: provider.kind(),
        provider_txn_id: transaction_id.to_string(),
        amount: booking.total_price(),
        status,
        created_at: now,
    })?;
    Ok(())
}

/// Re-queries the provider with bounded retries and exponential backoff.
///
/// Only transport failures are retried; a definitive provider answer
/// (including "unknown reference") returns immediately. A confirmation is
/// never fabricated on timeout.
fn confirm_with_retry(
    provider: &dyn ProviderClient,
    reference: &str,
) -> Result<ProviderPaymentStatus> {
    let mut delay = CONFIRM_BACKOFF;
    for attempt in 1..=CONFIRM_ATTEMPTS {
        match provider.confirm(reference) {
            Ok(status) => return Ok(status),
            Err(err @ Error::ProviderUnavailable { .. }) => {
                if attempt == CONFIRM_ATTEMPTS {
                    return Err(err);
                }
                log::debug!("provider confirm attempt {attempt} failed, retrying: {err}");
                thread::sleep(delay);
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
    // The loop always returns on its final iteration
    unreachable!("confirm retry loop exited without returning")
}

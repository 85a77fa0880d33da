//! Booking types for tracking room reservations.
//!
//! This module provides the central [`Booking`] entity, its public
//! [`BookingNumber`] identifier, the [`BookingStatus`] lifecycle states,
//! and builder patterns for construction.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::payment::ProviderReference;
use crate::stay::StayDates;

/// Default hold duration applied when a builder does not set an explicit
/// expiry. The allocator always overrides this from configuration.
const DEFAULT_HOLD_MINUTES: i64 = 15;

/// A public, human-readable booking identifier.
///
/// Booking numbers use the format `BK-YYYYMMDD-NNNN`: a fixed prefix, the
/// creation date, and a per-day sequence. The format is opaque to the
/// engine's logic beyond uniqueness; the database primary key backs global
/// uniqueness.
///
/// # Examples
///
/// ```
/// use innkeep::BookingNumber;
///
/// let number = BookingNumber::new("BK-20260301-0001".to_string()).unwrap();
/// assert_eq!(number.as_str(), "BK-20260301-0001");
///
/// // Invalid formats are rejected
/// assert!(BookingNumber::new("20260301".to_string()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingNumber(String);

impl BookingNumber {
    /// Creates a booking number from an existing string, validating the
    /// `BK-YYYYMMDD-NNNN` format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match the expected format.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let mut parts = value.split('-');
        let prefix = parts.next();
        let date = parts.next();
        let seq = parts.next();
        let valid = matches!((prefix, date, seq, parts.next()), (Some("BK"), Some(d), Some(s), None)
            if d.len() == 8
                && d.chars().all(|c| c.is_ascii_digit())
                && s.len() >= 4
                && s.chars().all(|c| c.is_ascii_digit()));
        if !valid {
            return Err(ValidationError {
                field: "booking_number".into(),
                message: format!("'{value}' does not match BK-YYYYMMDD-NNNN"),
            });
        }
        Ok(Self(value))
    }

    /// Generates a booking number for the given creation date and
    /// per-day sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use innkeep::BookingNumber;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let number = BookingNumber::generate(date, 42);
    /// assert_eq!(number.as_str(), "BK-20260301-0042");
    /// ```
    #[must_use]
    pub fn generate(date: NaiveDate, sequence: u32) -> Self {
        Self(format!("BK-{}-{sequence:04}", date.format("%Y%m%d")))
    }

    /// Returns the booking number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a booking.
///
/// The state machine is:
/// `pending_payment -> confirmed -> checked_in -> checked_out`, with
/// `pending_payment -> expired` and
/// `{pending_payment, confirmed} -> cancelled` as terminal side branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Room held, awaiting payment confirmation.
    PendingPayment,
    /// Payment verified; the stay is guaranteed.
    Confirmed,
    /// The guest has arrived and occupies the room.
    CheckedIn,
    /// The stay is complete.
    CheckedOut,
    /// The unpaid hold lapsed; the room is released.
    Expired,
    /// Explicitly cancelled before check-in; the room is released.
    Cancelled,
}

impl BookingStatus {
    /// Returns the canonical lowercase name used in storage and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending_payment" => Ok(Self::PendingPayment),
            "confirmed" => Ok(Self::Confirmed),
            "checked_in" => Ok(Self::CheckedIn),
            "checked_out" => Ok(Self::CheckedOut),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown booking status '{s}'"),
            }),
        }
    }

    /// Whether a booking in this status holds its room against other
    /// allocations for the same interval.
    #[must_use]
    pub const fn holds_room(&self) -> bool {
        matches!(self, Self::PendingPayment | Self::Confirmed | Self::CheckedIn)
    }

    /// Whether this status is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Expired | Self::Cancelled)
    }

    /// Whether the state machine permits a direct transition to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::BookingStatus;
    ///
    /// assert!(BookingStatus::PendingPayment.can_transition_to(BookingStatus::Confirmed));
    /// assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    /// assert!(!BookingStatus::Expired.can_transition_to(BookingStatus::Confirmed));
    /// assert!(!BookingStatus::PendingPayment.can_transition_to(BookingStatus::CheckedIn));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingPayment, Self::Confirmed)
                | (Self::PendingPayment, Self::Expired)
                | (Self::PendingPayment, Self::Cancelled)
                | (Self::Confirmed, Self::CheckedIn)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::CheckedIn, Self::CheckedOut)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guest information attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    /// The guest's name.
    pub name: String,
    /// Number of guests staying.
    pub guests: u32,
    /// Optional free-text special requests.
    pub special_requests: Option<String>,
}

impl GuestDetails {
    /// Creates guest details, trimming whitespace and validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming or the guest
    /// count is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::GuestDetails;
    ///
    /// let guest = GuestDetails::new("  Ada Lovelace ".to_string(), 2, None).unwrap();
    /// assert_eq!(guest.name, "Ada Lovelace");
    ///
    /// assert!(GuestDetails::new("   ".to_string(), 2, None).is_err());
    /// assert!(GuestDetails::new("Ada".to_string(), 0, None).is_err());
    /// ```
    pub fn new(
        name: String,
        guests: u32,
        special_requests: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError {
                field: "guest_name".into(),
                message: "guest name must be non-empty after trimming whitespace".into(),
            });
        }
        if guests == 0 {
            return Err(ValidationError {
                field: "guests".into(),
                message: "guest count must be at least 1".into(),
            });
        }
        let special_requests = special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            name,
            guests,
            special_requests,
        })
    }
}

/// A room booking with its full lifecycle state.
///
/// Bookings are created by the allocator in `pending_payment` with a held
/// room and an expiry deadline, and are mutated only through the settlement
/// state machine's conditional transitions. The total price is frozen at
/// creation and never recomputed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::{Booking, BookingNumber, GuestDetails, StayDates};
///
/// let stay = StayDates::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
/// ).unwrap();
/// let guest = GuestDetails::new("Ada Lovelace".to_string(), 2, None).unwrap();
///
/// let booking = Booking::builder(BookingNumber::generate(stay.check_in(), 1), 1, 101, stay, 20000)
///     .guest(guest)
///     .build()
///     .unwrap();
/// assert_eq!(booking.total_price(), 20000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    booking_number: BookingNumber,
    room_type_id: i64,
    room_id: i64,
    stay: StayDates,
    guest: GuestDetails,
    total_price: i64,
    status: BookingStatus,
    provider: Option<ProviderReference>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new booking builder.
    ///
    /// The total price is a required argument: it comes from an accepted
    /// quote and is frozen into the booking.
    #[must_use]
    pub fn builder(
        booking_number: BookingNumber,
        room_type_id: i64,
        room_id: i64,
        stay: StayDates,
        total_price: i64,
    ) -> BookingBuilder {
        BookingBuilder {
            booking_number,
            room_type_id,
            room_id,
            stay,
            total_price,
            guest: None,
            status: BookingStatus::PendingPayment,
            provider: None,
            created_at: None,
            expires_at: None,
        }
    }

    /// Returns the public booking number.
    #[must_use]
    pub const fn booking_number(&self) -> &BookingNumber {
        &self.booking_number
    }

    /// Returns the room type this booking was made against.
    #[must_use]
    pub const fn room_type_id(&self) -> i64 {
        self.room_type_id
    }

    /// Returns the individual room assigned at allocation time.
    #[must_use]
    pub const fn room_id(&self) -> i64 {
        self.room_id
    }

    /// Returns the stay date range.
    #[must_use]
    pub const fn stay(&self) -> StayDates {
        self.stay
    }

    /// Returns the guest details.
    #[must_use]
    pub const fn guest(&self) -> &GuestDetails {
        &self.guest
    }

    /// Returns the frozen total price in minor units.
    #[must_use]
    pub const fn total_price(&self) -> i64 {
        self.total_price
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns the payment provider reference, if one has been attached.
    #[must_use]
    pub const fn provider(&self) -> Option<&ProviderReference> {
        self.provider.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the deadline after which an unpaid hold may be released.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the unpaid hold has lapsed at the given instant.
    ///
    /// Only meaningful for `pending_payment` bookings; the expiry sweep
    /// checks the status separately.
    #[must_use]
    pub fn hold_lapsed(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Builder for creating [`Booking`] instances.
#[derive(Debug)]
pub struct BookingBuilder {
    booking_number: BookingNumber,
    room_type_id: i64,
    room_id: i64,
    stay: StayDates,
    total_price: i64,
    guest: Option<GuestDetails>,
    status: BookingStatus,
    provider: Option<ProviderReference>,
    created_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl BookingBuilder {
    /// Sets the guest details.
    #[must_use]
    pub fn guest(mut self, guest: GuestDetails) -> Self {
        self.guest = Some(guest);
        self
    }

    /// Sets the lifecycle status. Defaults to `pending_payment`.
    #[must_use]
    pub const fn status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches a payment provider reference.
    #[must_use]
    pub fn provider(mut self, provider: Option<ProviderReference>) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the creation timestamp. Defaults to now.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the hold expiry deadline.
    ///
    /// Defaults to fifteen minutes after creation; the allocator always
    /// sets this explicitly from configuration.
    #[must_use]
    pub const fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Builds the booking.
    ///
    /// # Errors
    ///
    /// Returns an error if guest details are missing or the total price is
    /// negative.
    pub fn build(self) -> Result<Booking, ValidationError> {
        let Some(guest) = self.guest else {
            return Err(ValidationError {
                field: "guest".into(),
                message: "guest details are required".into(),
            });
        };

        if self.total_price < 0 {
            return Err(ValidationError {
                field: "total_price".into(),
                message: "total price must not be negative".into(),
            });
        }

        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let expires_at = self
            .expires_at
            .unwrap_or(created_at + Duration::minutes(DEFAULT_HOLD_MINUTES));

        Ok(Booking {
            booking_number: self.booking_number,
            room_type_id: self.room_type_id,
            room_id: self.room_id,
            stay: self.stay,
            guest,
            total_price: self.total_price,
            status: self.status,
            provider: self.provider,
            created_at,
            expires_at,
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

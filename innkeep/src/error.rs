//! Error types for the innkeep library.
//!
//! This module provides a comprehensive error hierarchy for all operations
//! in the innkeep library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use chrono::NaiveDate;

use thiserror::Error;

/// Result type alias for operations that may fail with an innkeep error.
///
/// # Examples
///
/// ```
/// use innkeep::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the innkeep library.
///
/// This enum encompasses all possible error conditions that can occur
/// during booking allocation and payment settlement operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid stay date range was provided.
    #[error("invalid date range {check_in}..{check_out}: {reason}")]
    InvalidDateRange {
        /// The requested check-in date.
        check_in: NaiveDate,
        /// The requested check-out date.
        check_out: NaiveDate,
        /// The reason the range is invalid.
        reason: String,
    },

    /// No individual room satisfies the requested stay.
    #[error("no availability for room type {room_type_id} over {check_in}..{check_out}")]
    NoAvailability {
        /// The requested room type.
        room_type_id: i64,
        /// The requested check-in date.
        check_in: NaiveDate,
        /// The requested check-out date.
        check_out: NaiveDate,
    },

    /// A payment confirmation could not be corroborated by the provider.
    #[error("payment verification failed for booking {booking_number}: {reason}")]
    PaymentVerificationFailed {
        /// The booking whose confirmation failed verification.
        booking_number: String,
        /// Why the confirmation was rejected.
        reason: VerificationFailureReason,
    },

    /// A payment provider could not be reached or timed out.
    #[error("payment provider '{provider}' unavailable: {details}")]
    ProviderUnavailable {
        /// The provider that was unreachable.
        provider: String,
        /// Details about the failure.
        details: String,
    },

    /// A lifecycle action was requested against a booking whose current
    /// status does not permit it.
    #[error("invalid transition for booking {booking_number}: {current} -> {attempted}")]
    InvalidTransition {
        /// The booking the action was requested against.
        booking_number: String,
        /// The booking's current status.
        current: String,
        /// The status the action attempted to reach.
        attempted: String,
    },

    /// An atomic room claim lost a race against a concurrent allocation.
    ///
    /// The allocator retries against the next candidate internally; this
    /// error only surfaces from the claim primitive itself.
    #[error("room {room_id} was claimed concurrently for {check_in}..{check_out}")]
    StaleAllocation {
        /// The room whose claim was lost.
        room_id: i64,
        /// The contested check-in date.
        check_in: NaiveDate,
        /// The contested check-out date.
        check_out: NaiveDate,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// Reason a payment confirmation was rejected during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailureReason {
    /// The provider reported an amount different from the booking total.
    AmountMismatch {
        /// The booking's frozen total, in minor units.
        expected: i64,
        /// The amount the provider reported, in minor units.
        reported: i64,
    },
    /// The provider does not recognize the supplied reference.
    UnknownReference,
    /// The provider reports the payment as declined or failed.
    ProviderDeclined,
    /// The supplied reference does not match the booking's recorded attempt.
    ReferenceMismatch,
}

impl std::fmt::Display for VerificationFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmountMismatch { expected, reported } => {
                write!(f, "amount mismatch (expected {expected}, provider reported {reported})")
            }
            Self::UnknownReference => write!(f, "provider does not recognize the reference"),
            Self::ProviderDeclined => write!(f, "provider reports the payment as declined"),
            Self::ReferenceMismatch => {
                write!(f, "reference does not match the recorded payment attempt")
            }
        }
    }
}

// Additional conversions for better ergonomics

impl From<crate::booking::ValidationError> for Error {
    fn from(err: crate::booking::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the error is recoverable by the guest picking different
    /// dates or a different room type.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::Error;
    /// use chrono::NaiveDate;
    ///
    /// let err = Error::NoAvailability {
    ///     room_type_id: 1,
    ///     check_in: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    ///     check_out: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
    /// };
    /// assert!(err.is_no_availability());
    /// ```
    #[must_use]
    pub fn is_no_availability(&self) -> bool {
        matches!(self, Self::NoAvailability { .. })
    }

    /// Check if the error indicates a transient provider failure the
    /// caller may retry.
    #[must_use]
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }

    /// Check if the error is a rejected lifecycle transition.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

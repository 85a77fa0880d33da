//! Payment gateway abstraction.
//!
//! This module provides a uniform interface over the two supported payment
//! provider flows: a session-based provider (the guest is redirected to a
//! hosted page and the engine later verifies a session identifier) and a
//! charge-based provider (the engine receives a charge identifier from a
//! client-side widget). Provider-specific request and response shapes are
//! isolated inside the per-provider clients; everything else in the engine
//! works against [`ProviderClient`] and the closed [`PaymentGateway`] enum.
//!
//! The correctness-critical rule lives here: `confirm` always re-queries the
//! provider's authoritative status. Return-URL parameters are untrusted
//! input and are never taken as proof of payment.

mod charge;
mod gateway;
mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingNumber, ValidationError};

pub use charge::ChargeProvider;
pub use gateway::PaymentGateway;
pub use session::SessionProvider;

/// The two supported payment provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Hosted-page provider verified by session identifier.
    Session,
    /// Widget provider verified by charge identifier.
    Charge,
}

impl ProviderKind {
    /// Returns the canonical lowercase name used in storage and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Charge => "charge",
        }
    }

    /// Parses a provider kind from its canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known provider.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "session" => Ok(Self::Session),
            "charge" => Ok(Self::Charge),
            _ => Err(ValidationError {
                field: "provider".into(),
                message: format!("unknown payment provider '{s}'"),
            }),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider-side reference attached to a booking: which provider, and the
/// session or charge identifier on that provider's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReference {
    /// The provider the reference belongs to.
    pub provider: ProviderKind,
    /// The provider-side session or charge identifier.
    pub reference: String,
}

impl ProviderReference {
    /// Creates a new provider reference.
    #[must_use]
    pub const fn new(provider: ProviderKind, reference: String) -> Self {
        Self {
            provider,
            reference,
        }
    }
}

/// Status of a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// The session or charge was initiated with the provider.
    Created,
    /// The provider corroborated a successful payment.
    Succeeded,
    /// The provider reported the payment as failed or declined.
    Failed,
}

impl AttemptStatus {
    /// Returns the canonical lowercase name used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parses an attempt status from its canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "created" => Ok(Self::Created),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            _ => Err(ValidationError {
                field: "attempt_status".into(),
                message: format!("unknown attempt status '{s}'"),
            }),
        }
    }
}

/// One gateway round-trip associated with a booking.
///
/// A booking may accumulate several attempts across retries, but at most one
/// may be `succeeded`; the database enforces that with a partial unique
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// Row identifier, absent until the attempt is persisted.
    pub id: Option<i64>,
    /// The booking this attempt belongs to.
    pub booking_number: BookingNumber,
    /// The provider the attempt went through.
    pub provider: ProviderKind,
    /// The provider-side transaction identifier.
    pub provider_txn_id: String,
    /// The amount requested, in minor units.
    pub amount: i64,
    /// Current status of the attempt.
    pub status: AttemptStatus,
    /// When the attempt was created.
    pub created_at: DateTime<Utc>,
}

/// Result of initiating payment with a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiateOutcome {
    /// Session-based flow: redirect the guest to the hosted page.
    Redirect {
        /// The provider-side session identifier to verify later.
        session_id: String,
        /// The hosted page URL to send the guest to.
        redirect_url: String,
    },
    /// Charge-based flow: hand the client token to the payment widget.
    ClientCharge {
        /// The provider-side charge identifier to verify later.
        charge_id: String,
        /// Token the client-side widget needs to complete the charge.
        client_token: String,
    },
}

impl InitiateOutcome {
    /// Returns the provider-side reference the engine must verify later.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Redirect { session_id, .. } => session_id,
            Self::ClientCharge { charge_id, .. } => charge_id,
        }
    }
}

/// The provider's authoritative answer when a reference is re-queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderPaymentStatus {
    /// The provider holds a completed payment for this reference.
    Paid {
        /// The amount the provider actually collected, in minor units.
        amount: i64,
        /// The provider's transaction identifier for the completed payment.
        transaction_id: String,
    },
    /// The provider reports the payment as declined or failed.
    Declined {
        /// Provider-supplied failure description.
        reason: String,
    },
    /// The payment has not completed yet.
    Pending,
    /// The provider does not recognize the reference.
    Unknown,
}

/// Capability interface shared by both provider variants.
///
/// `confirm` must query the provider's authoritative record for the
/// reference; implementations never trust caller-supplied claims about the
/// payment's outcome.
#[cfg_attr(test, mockall::automock)]
pub trait ProviderClient {
    /// Which provider variant this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Initiates payment for a booking, creating a provider-side session or
    /// charge for the booking's frozen total.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ProviderUnavailable`] if the provider cannot
    /// be reached or times out.
    fn initiate(&self, booking: &crate::booking::Booking)
        -> crate::error::Result<InitiateOutcome>;

    /// Re-queries the provider's authoritative status for a reference.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ProviderUnavailable`] if the provider cannot
    /// be reached or times out. A reference the provider does not know is
    /// NOT an error; it is reported as [`ProviderPaymentStatus::Unknown`]
    /// so the caller can fail verification with full context.
    fn confirm(&self, reference: &str) -> crate::error::Result<ProviderPaymentStatus>;
}

#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # innkeep
//!
//! A reservation allocation and payment settlement engine for room
//! inventory.
//!
//! The engine turns a guest's date-range request into a guaranteed,
//! non-overlapping assignment of a physical room, tracks the booking
//! through payment and stay, and reconciles payment confirmations with
//! external providers.
//!
//! ## Core Types
//!
//! - [`StayDates`]: validated half-open stay ranges
//! - [`Booking`], [`BookingNumber`], [`BookingStatus`]: the booking entity
//!   and its lifecycle
//! - [`RoomType`] and [`IndividualRoom`]: the externally-owned catalog
//! - [`Allocator`]: the transactional allocation core
//! - [`PaymentGateway`]: the closed set of payment providers
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use innkeep::StayDates;
//!
//! // Stay ranges are half-open: back-to-back stays do not overlap
//! let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
//! let first = StayDates::new(d(5), d(10)).unwrap();
//! let next = StayDates::new(d(10), d(12)).unwrap();
//! assert_eq!(first.nights(), 5);
//! assert!(!first.overlaps(&next));
//! ```

pub mod allocation;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod output;
pub mod payment;
pub mod pricing;
pub mod settlement;
pub mod stay;

// Re-export key types at crate root for convenience
pub use allocation::{find_available, AllocationRequest, Allocator};
pub use booking::{Booking, BookingNumber, BookingStatus, GuestDetails};
pub use catalog::{DiscountRule, IndividualRoom, PromoCode, RoomType};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result, VerificationFailureReason};
pub use logging::{init_logger, LogLevel, Logger};
pub use lookup::{list_snapshots, lookup_booking, BookingSnapshot};
pub use output::OutputFormat;
pub use payment::{
    AttemptStatus, InitiateOutcome, PaymentAttempt, PaymentGateway, ProviderClient, ProviderKind,
    ProviderPaymentStatus, ProviderReference,
};
pub use pricing::{quote, Quote};
pub use settlement::{
    cancel, check_in, check_out, confirm_payment, initiate_payment, ConfirmOutcome, ExpirySweep,
    SweepResult,
};
pub use stay::StayDates;

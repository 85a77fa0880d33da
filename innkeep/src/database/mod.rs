//! Database layer for persistent storage of bookings and catalog data.
//!
//! This module provides a SQLite-based storage layer for the booking
//! engine, including connection management, schema versioning, CRUD
//! operations, and the conditional-commit primitives the allocator and
//! settlement state machine rely on.
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::database::{Database, DatabaseConfig};
//! use innkeep::BookingNumber;
//!
//! // Open a database
//! let config = DatabaseConfig::new("/tmp/innkeep.db");
//! let db = Database::open(config).unwrap();
//!
//! // Look up a booking
//! let number = BookingNumber::new("BK-20260301-0001".to_string()).unwrap();
//! let booking = Database::get_booking(db.connection(), &number).unwrap();
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

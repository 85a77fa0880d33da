//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and database
//! - `seed`: Load catalog data from a file
//! - `quote`: Price a prospective stay
//! - `book`: Allocate a room and create a booking
//! - `confirm`: Verify payment and settle a booking
//! - `lookup`: Look up a booking by number
//! - `list`: List bookings with optional status filter
//! - `check_in` / `check_out` / `cancel`: Lifecycle actions
//! - `sweep`: Expire lapsed unpaid holds
//! - `show_data_dir`: Show the resolved data directory
//! - `validate`: Validate a configuration file
//! - `completions`: Generate shell completion scripts

pub mod book;
pub mod cancel;
pub mod check_in;
pub mod check_out;
pub mod completions;
pub mod confirm;
pub mod init;
pub mod list;
pub mod lookup;
pub mod quote;
pub mod seed;
pub mod show_data_dir;
pub mod sweep;
pub mod validate;

pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use check_in::CheckInCommand;
pub use check_out::CheckOutCommand;
pub use completions::CompletionsCommand;
pub use confirm::ConfirmCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use lookup::LookupCommand;
pub use quote::QuoteCommand;
pub use seed::SeedCommand;
pub use show_data_dir::ShowDataDirCommand;
pub use sweep::SweepCommand;
pub use validate::ValidateCommand;

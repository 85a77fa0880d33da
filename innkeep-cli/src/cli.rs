//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    BookCommand, CancelCommand, CheckInCommand, CheckOutCommand, CompletionsCommand,
    ConfirmCommand, InitCommand, ListCommand, LookupCommand, QuoteCommand, SeedCommand,
    ShowDataDirCommand, SweepCommand, ValidateCommand,
};

/// Command-line tool for the innkeep booking engine.
#[derive(Parser)]
#[command(name = "innkeep")]
#[command(version, about = "Manage room bookings and payment settlement", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "INNKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "INNKEEP_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "INNKEEP_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the innkeep data directory and database
    Init(InitCommand),

    /// Load room types, rooms, and promo codes from a catalog file
    Seed(SeedCommand),

    /// Quote a stay
    Quote(QuoteCommand),

    /// Create a booking
    Book(BookCommand),

    /// Confirm payment for a booking
    Confirm(ConfirmCommand),

    /// Look up a booking by its number
    Lookup(LookupCommand),

    /// List bookings
    List(ListCommand),

    /// Check a guest in
    CheckIn(CheckInCommand),

    /// Check a guest out
    CheckOut(CheckOutCommand),

    /// Cancel a booking
    Cancel(CancelCommand),

    /// Expire lapsed unpaid holds
    Sweep(SweepCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

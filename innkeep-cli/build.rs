//! Build script for innkeep-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("innkeep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage room bookings and payment settlement")
        .long_about(
            "Command-line tool for the innkeep reservation allocation and payment settlement engine",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("INNKEEP_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("INNKEEP_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("INNKEEP_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the innkeep data directory and database"),
            Command::new("seed")
                .about("Load room types, rooms, and promo codes from a catalog file"),
            Command::new("quote")
                .about("Quote a stay")
                .long_about("Compute nights, rate, discount, and total for a prospective stay"),
            Command::new("book")
                .about("Create a booking")
                .long_about("Quote, allocate a room, and optionally initiate payment"),
            Command::new("confirm")
                .about("Confirm payment for a booking")
                .long_about("Verify a provider reference and settle the booking"),
            Command::new("lookup")
                .about("Look up a booking by its number"),
            Command::new("list")
                .about("List bookings")
                .long_about("Display bookings, optionally filtered by status"),
            Command::new("check-in")
                .about("Check a guest in"),
            Command::new("check-out")
                .about("Check a guest out"),
            Command::new("cancel")
                .about("Cancel a booking"),
            Command::new("sweep")
                .about("Expire lapsed unpaid holds")
                .long_about("Release rooms held by unpaid bookings past their deadline"),
            Command::new("show-data-dir")
                .about("Show the resolved data directory path"),
            Command::new("validate")
                .about("Validate a configuration file"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    // Generate main innkeep.1 man page
    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("innkeep.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the innkeep booking engine.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the room types table.
///
/// Room types are catalog entries owned by external management tooling;
/// the engine reads them for candidate selection and pricing.
pub const CREATE_ROOM_TYPES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        nightly_rate INTEGER NOT NULL,
        monthly_rate INTEGER,
        max_guests INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the rooms table.
///
/// Each row is one physical room belonging to exactly one room type.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY,
        room_type_id INTEGER NOT NULL REFERENCES room_types(id),
        room_number TEXT NOT NULL UNIQUE,
        floor INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the promo codes table.
pub const CREATE_PROMO_CODES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS promo_codes (
        code TEXT PRIMARY KEY NOT NULL,
        discount_kind TEXT NOT NULL,
        discount_value INTEGER NOT NULL,
        valid_until TEXT
    )";

/// SQL statement to create the bookings table.
///
/// Stay dates are stored as ISO-8601 text so lexicographic comparison in
/// SQL matches date comparison; timestamps are unix seconds. The primary
/// key backs global uniqueness of booking numbers.
pub const CREATE_BOOKINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS bookings (
        booking_number TEXT PRIMARY KEY NOT NULL,
        room_type_id INTEGER NOT NULL REFERENCES room_types(id),
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        guest_name TEXT NOT NULL,
        guests INTEGER NOT NULL,
        special_requests TEXT,
        total_price INTEGER NOT NULL,
        status TEXT NOT NULL,
        provider TEXT,
        provider_reference TEXT,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )";

/// SQL statement to create the payment attempts table.
pub const CREATE_PAYMENT_ATTEMPTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS payment_attempts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_number TEXT NOT NULL REFERENCES bookings(booking_number),
        provider TEXT NOT NULL,
        provider_txn_id TEXT NOT NULL,
        amount INTEGER NOT NULL,
        status TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create an index over a room's holding bookings.
///
/// This index speeds up the overlap checks at the core of allocation.
pub const CREATE_BOOKINGS_ROOM_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_room ON bookings(room_id, status)";

/// SQL statement to create an index on booking status.
///
/// This index speeds up filtered lists and the expiry sweep's scan.
pub const CREATE_BOOKINGS_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)";

/// SQL statement to create an index on hold expiry deadlines.
pub const CREATE_BOOKINGS_EXPIRES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_expires ON bookings(expires_at)";

/// SQL statement to create an index on a booking's payment attempts.
pub const CREATE_ATTEMPTS_BOOKING_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_attempts_booking ON payment_attempts(booking_number)";

/// SQL statement enforcing at most one succeeded attempt per booking.
///
/// The partial unique index makes the "at most one succeeded
/// `PaymentAttempt`" invariant a database guarantee rather than an
/// application convention.
pub const CREATE_ATTEMPTS_ONE_SUCCESS_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_attempts_one_success
    ON payment_attempts(booking_number) WHERE status = 'succeeded'";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a booking.
pub const INSERT_BOOKING: &str = r"
    INSERT INTO bookings
    (booking_number, room_type_id, room_id, check_in, check_out,
     guest_name, guests, special_requests, total_price, status,
     provider, provider_reference, created_at, expires_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

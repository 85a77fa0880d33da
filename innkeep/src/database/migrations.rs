//! Database schema management and migrations.
//!
//! This module handles database schema initialization, version checking,
//! and migrations.

use rusqlite::Connection;

use crate::error::Result;

use super::schema::{
    CREATE_ATTEMPTS_BOOKING_INDEX, CREATE_ATTEMPTS_ONE_SUCCESS_INDEX, CREATE_BOOKINGS_EXPIRES_INDEX,
    CREATE_BOOKINGS_ROOM_INDEX, CREATE_BOOKINGS_STATUS_INDEX, CREATE_BOOKINGS_TABLE,
    CREATE_METADATA_TABLE, CREATE_PAYMENT_ATTEMPTS_TABLE, CREATE_PROMO_CODES_TABLE,
    CREATE_ROOMS_TABLE, CREATE_ROOM_TYPES_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// This function creates all tables, indices, and metadata for a fresh
/// database. It should only be called on a database that has not been
/// initialized yet.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use innkeep::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Create tables
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_ROOM_TYPES_TABLE, [])?;
    conn.execute(CREATE_ROOMS_TABLE, [])?;
    conn.execute(CREATE_PROMO_CODES_TABLE, [])?;
    conn.execute(CREATE_BOOKINGS_TABLE, [])?;
    conn.execute(CREATE_PAYMENT_ATTEMPTS_TABLE, [])?;

    // Create indices
    conn.execute(CREATE_BOOKINGS_ROOM_INDEX, [])?;
    conn.execute(CREATE_BOOKINGS_STATUS_INDEX, [])?;
    conn.execute(CREATE_BOOKINGS_EXPIRES_INDEX, [])?;
    conn.execute(CREATE_ATTEMPTS_BOOKING_INDEX, [])?;
    conn.execute(CREATE_ATTEMPTS_ONE_SUCCESS_INDEX, [])?;

    // Set initial schema version
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than
/// "no rows returned" (which indicates version 0).
///
/// # Returns
///
/// - `Ok(0)` if the metadata table doesn't exist or has no version
/// - `Ok(version)` if a version is found
/// - `Err(_)` if a database error occurs
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            // Database exists but no schema - needs initialization
            Ok(0)
        }
        Err(e) => {
            // Check if it's a "no such table" error
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    // Table doesn't exist yet
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// This function:
/// 1. Checks the current schema version
/// 2. If version is 0, initializes the schema
/// 3. If version is older than current, returns an error (migrations needed)
/// 4. If version is newer than current, returns an error (client too old)
/// 5. If version matches, returns success
///
/// # Errors
///
/// Returns an error if:
/// - Schema version is incompatible (too old or too new)
/// - Schema initialization fails
/// - Database queries fail
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use innkeep::database::migrations::check_schema_compatibility;
///
/// let conn = Connection::open_in_memory().unwrap();
/// check_schema_compatibility(&conn).unwrap();
/// ```
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database, initialize it
        initialize_schema(conn)?;
    } else if version < CURRENT_SCHEMA_VERSION {
        // Database is older than current version
        // In the future, we would apply migrations here
        return Err(crate::error::Error::Validation {
            field: "schema_version".into(),
            message: format!(
                "Database schema version {version} is older than client version {CURRENT_SCHEMA_VERSION}. Migration not yet implemented."
            ),
        });
    } else if version > CURRENT_SCHEMA_VERSION {
        // Database is newer than client can handle
        return Err(crate::error::Error::Validation {
            field: "schema_version".into(),
            message: format!(
                "Database schema version {version} is newer than client version {CURRENT_SCHEMA_VERSION}. Please upgrade innkeep."
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Verify metadata table exists and has version
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);

        // Verify core tables exist
        for table in ["room_types", "rooms", "promo_codes", "bookings", "payment_attempts"] {
            let count: i32 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 0);
    }

    #[test]
    fn test_get_schema_version_initialized() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_fresh_database() {
        let conn = create_test_connection();

        // Should initialize the schema
        check_schema_compatibility(&conn).unwrap();

        // Verify it was initialized
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_current_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Should succeed with current version
        check_schema_compatibility(&conn).unwrap();
    }

    #[test]
    fn test_check_schema_compatibility_newer_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Manually set a newer version
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        // Should fail with version too new
        let result = check_schema_compatibility(&conn);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("newer than client"));
    }

    #[test]
    fn test_one_success_index_enforced() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO room_types (id, name, nightly_rate, max_guests) VALUES (1, 'Deluxe', 10000, 2)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO rooms (id, room_type_id, room_number, floor) VALUES (101, 1, '101', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO bookings (booking_number, room_type_id, room_id, check_in, check_out,
             guest_name, guests, total_price, status, created_at, expires_at)
             VALUES ('BK-20260301-0001', 1, 101, '2026-03-01', '2026-03-03',
             'Ada', 2, 20000, 'pending_payment', 0, 900)",
            [],
        )
        .unwrap();

        let insert_attempt = "INSERT INTO payment_attempts
            (booking_number, provider, provider_txn_id, amount, status, created_at)
            VALUES ('BK-20260301-0001', 'session', ?, 20000, 'succeeded', 0)";

        conn.execute(insert_attempt, ["txn_1"]).unwrap();
        // A second succeeded attempt for the same booking must be rejected
        let result = conn.execute(insert_attempt, ["txn_2"]);
        assert!(result.is_err());

        // Failed attempts are not restricted
        conn.execute(
            "INSERT INTO payment_attempts
             (booking_number, provider, provider_txn_id, amount, status, created_at)
             VALUES ('BK-20260301-0001', 'session', 'txn_3', 20000, 'failed', 0)",
            [],
        )
        .unwrap();
    }
}

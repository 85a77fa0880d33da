//! Output formatter implementations.

use crate::error::Result;
use crate::lookup::BookingSnapshot;
use crate::pricing::Quote;

use super::OutputFormat;

/// Formats an amount in minor units as a decimal string.
fn format_amount(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Formats a quote for display.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use innkeep::output::{format_quote, OutputFormat};
/// use innkeep::pricing::Quote;
///
/// let quote = Quote { nights: 2, nightly_rate: 10000, discount: 0, total: 20000 };
/// let text = format_quote(&quote, OutputFormat::Human).unwrap();
/// assert!(text.contains("200.00"));
/// ```
pub fn format_quote(quote: &Quote, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(quote)
            .map_err(|e| crate::error::Error::Validation {
                field: "quote".into(),
                message: format!("cannot serialize quote: {e}"),
            })?),
        OutputFormat::Human => {
            let mut lines = vec![format!(
                "{} night(s) x {} = {}",
                quote.nights,
                format_amount(quote.nightly_rate),
                format_amount(quote.nightly_rate * i64::from(quote.nights)),
            )];
            if quote.discount > 0 {
                lines.push(format!("discount  -{}", format_amount(quote.discount)));
            }
            lines.push(format!("total     {}", format_amount(quote.total)));
            Ok(lines.join("\n"))
        }
    }
}

/// Formats a booking snapshot for display.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_snapshot(snapshot: &BookingSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)
            .map_err(|e| crate::error::Error::Validation {
                field: "booking".into(),
                message: format!("cannot serialize booking: {e}"),
            })?),
        OutputFormat::Human => {
            let mut lines = vec![
                format!("Booking   {}", snapshot.booking_number),
                format!("Status    {}", snapshot.status),
                format!(
                    "Room      {} ({}, floor {})",
                    snapshot.room_number, snapshot.room_type, snapshot.floor
                ),
                format!(
                    "Stay      {} to {} ({} night(s))",
                    snapshot.check_in, snapshot.check_out, snapshot.nights
                ),
                format!(
                    "Guest     {} ({} guest(s))",
                    snapshot.guest_name, snapshot.guests
                ),
                format!("Total     {}", format_amount(snapshot.total_price)),
            ];
            if let Some(requests) = &snapshot.special_requests {
                lines.push(format!("Requests  {requests}"));
            }
            if let Some(provider) = snapshot.provider {
                lines.push(format!("Provider  {provider}"));
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Formats a list of booking snapshots.
///
/// The human form is a compact one-line-per-booking table; JSON is the
/// full snapshot array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_snapshot_list(
    snapshots: &[BookingSnapshot],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshots)
            .map_err(|e| crate::error::Error::Validation {
                field: "bookings".into(),
                message: format!("cannot serialize bookings: {e}"),
            })?),
        OutputFormat::Human => {
            if snapshots.is_empty() {
                return Ok("no bookings".to_string());
            }
            let lines: Vec<String> = snapshots
                .iter()
                .map(|s| {
                    format!(
                        "{}  {:>15}  room {:>4}  {} to {}  {}",
                        s.booking_number,
                        s.status.to_string(),
                        s.room_number,
                        s.check_in,
                        s.check_out,
                        format_amount(s.total_price),
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

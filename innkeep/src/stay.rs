//! Stay date range types with half-open interval semantics.
//!
//! This module provides the [`StayDates`] type, the validated date range a
//! booking occupies. Ranges are half-open: the check-out date is exclusive,
//! so a stay ending on a given date and another starting that same date do
//! not overlap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error type for invalid stay date ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStayError {
    /// The requested check-in date.
    pub check_in: NaiveDate,
    /// The requested check-out date.
    pub check_out: NaiveDate,
    /// The reason the range is invalid.
    pub reason: String,
}

impl std::fmt::Display for InvalidStayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid date range {}..{}: {}",
            self.check_in, self.check_out, self.reason
        )
    }
}

impl std::error::Error for InvalidStayError {}

impl From<InvalidStayError> for crate::error::Error {
    fn from(err: InvalidStayError) -> Self {
        Self::InvalidDateRange {
            check_in: err.check_in,
            check_out: err.check_out,
            reason: err.reason,
        }
    }
}

/// A validated stay date range `[check_in, check_out)`.
///
/// The range is always at least one night: construction rejects
/// `check_out <= check_in`, so zero-night and inverted ranges cannot exist.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::StayDates;
///
/// let check_in = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let check_out = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
/// let stay = StayDates::new(check_in, check_out).unwrap();
/// assert_eq!(stay.nights(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Creates a new stay date range.
    ///
    /// # Errors
    ///
    /// Returns an error if `check_out` is not strictly after `check_in`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use innkeep::StayDates;
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let next = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    ///
    /// // Valid one-night stay
    /// assert!(StayDates::new(day, next).is_ok());
    ///
    /// // Invalid: zero nights
    /// assert!(StayDates::new(day, day).is_err());
    ///
    /// // Invalid: inverted range
    /// assert!(StayDates::new(next, day).is_err());
    /// ```
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, InvalidStayError> {
        if check_out <= check_in {
            return Err(InvalidStayError {
                check_in,
                check_out,
                reason: "check-out must be after check-in".to_string(),
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Returns the check-in date.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Returns the check-out date (exclusive).
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Returns the number of nights in the stay.
    ///
    /// Always at least 1 by construction.
    #[must_use]
    pub fn nights(&self) -> u32 {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let nights = (self.check_out - self.check_in).num_days() as u32;
        nights
    }

    /// Tests whether two stays overlap, using half-open semantics.
    ///
    /// A stay ending on the day another begins is not an overlap, so
    /// back-to-back stays on the same room are allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use innkeep::StayDates;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
    ///
    /// let first = StayDates::new(d(5), d(10)).unwrap();
    /// let adjacent = StayDates::new(d(10), d(12)).unwrap();
    /// let conflicting = StayDates::new(d(9), d(11)).unwrap();
    ///
    /// assert!(!first.overlaps(&adjacent));
    /// assert!(first.overlaps(&conflicting));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

impl std::fmt::Display for StayDates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.check_in, self.check_out)
    }
}

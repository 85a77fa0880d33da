//! Deterministic stay pricing.
//!
//! The pricing engine computes a quote from a room type, a stay range, and
//! an optional promo code. It is a pure function: no clock, no storage, no
//! side effects. The computed total is frozen into the booking at allocation
//! time and never recomputed afterwards, even if catalog rates change.

use serde::{Deserialize, Serialize};

use crate::catalog::{DiscountRule, PromoCode, RoomType};
use crate::stay::StayDates;

/// A price breakdown for a prospective stay.
///
/// All amounts are in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Number of nights priced.
    pub nights: u32,
    /// Rate per night at quote time.
    pub nightly_rate: i64,
    /// Discount applied, already resolved from the promo code.
    pub discount: i64,
    /// Final total: `nightly_rate * nights - discount`, floored at zero.
    pub total: i64,
}

/// Computes a quote for a stay.
///
/// The promo argument is the already-resolved promo code record, if the
/// guest supplied a code that exists; pass `None` for no code or an unknown
/// code. A promo that is expired on the check-in date is ignored, not an
/// error: a missing discount never fails the quote.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::pricing::quote;
/// use innkeep::{RoomType, StayDates};
///
/// let deluxe = RoomType {
///     id: 1,
///     name: "Deluxe".to_string(),
///     nightly_rate: 10000,
///     monthly_rate: None,
///     max_guests: 3,
///     active: true,
/// };
/// let stay = StayDates::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
/// ).unwrap();
///
/// let q = quote(&deluxe, stay, None);
/// assert_eq!(q.nights, 2);
/// assert_eq!(q.total, 20000);
/// ```
#[must_use]
pub fn quote(room_type: &RoomType, stay: StayDates, promo: Option<&PromoCode>) -> Quote {
    let nights = stay.nights();
    let nightly_rate = room_type.nightly_rate;
    let subtotal = nightly_rate * i64::from(nights);

    let discount = promo
        .filter(|p| p.is_valid_on(stay.check_in()))
        .map_or(0, |p| resolve_discount(p.rule, subtotal));

    // Clamp the discount so the total never goes negative
    let discount = discount.min(subtotal);

    Quote {
        nights,
        nightly_rate,
        discount,
        total: subtotal - discount,
    }
}

/// Resolves a discount rule against a subtotal.
fn resolve_discount(rule: DiscountRule, subtotal: i64) -> i64 {
    match rule {
        DiscountRule::Flat(amount) => amount.max(0),
        DiscountRule::Percent(percent) => {
            let percent = i64::from(percent.min(100));
            subtotal * percent / 100
        }
    }
}

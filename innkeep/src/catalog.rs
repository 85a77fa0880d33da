//! Catalog read models: room types, individual rooms, and promo codes.
//!
//! The catalog is owned by external management tooling; the engine only
//! reads it to select allocation candidates and resolve prices. These types
//! are therefore plain read models with no mutation logic of their own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A sellable category of room with shared pricing and capacity.
///
/// # Examples
///
/// ```
/// use innkeep::RoomType;
///
/// let deluxe = RoomType {
///     id: 1,
///     name: "Deluxe".to_string(),
///     nightly_rate: 10000,
///     monthly_rate: Some(250_000),
///     max_guests: 3,
///     active: true,
/// };
/// assert_eq!(deluxe.nightly_rate, 10000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Catalog identifier.
    pub id: i64,
    /// Display name, unique within the catalog.
    pub name: String,
    /// Price per night in minor units.
    pub nightly_rate: i64,
    /// Optional monthly price in minor units.
    pub monthly_rate: Option<i64>,
    /// Maximum number of guests a room of this type accommodates.
    pub max_guests: u32,
    /// Whether the type is currently sellable.
    pub active: bool,
}

/// One physical, separately assignable unit belonging to a room type.
///
/// Every active room belongs to exactly one room type; the engine reads
/// rooms only to select allocation candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRoom {
    /// Catalog identifier.
    pub id: i64,
    /// The owning room type.
    pub room_type_id: i64,
    /// Human-facing room number, unique within the property.
    pub room_number: String,
    /// Floor the room is on.
    pub floor: i32,
    /// Whether the room is available for allocation at all.
    pub active: bool,
}

/// Discount rule attached to a promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountRule {
    /// A flat amount off the total, in minor units.
    Flat(i64),
    /// A percentage off the total, 0..=100.
    Percent(u8),
}

/// A promo code with its discount rule and optional expiry.
///
/// Promo codes are resolved by the pricing engine; unknown or expired codes
/// are ignored rather than failing a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// The code guests enter, matched case-sensitively.
    pub code: String,
    /// The discount this code grants.
    pub rule: DiscountRule,
    /// Last date (inclusive) the code is valid, if limited.
    pub valid_until: Option<NaiveDate>,
}

impl PromoCode {
    /// Whether the code is usable on the given date.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use innkeep::{DiscountRule, PromoCode};
    ///
    /// let promo = PromoCode {
    ///     code: "SPRING10".to_string(),
    ///     rule: DiscountRule::Percent(10),
    ///     valid_until: NaiveDate::from_ymd_opt(2026, 3, 31),
    /// };
    /// assert!(promo.is_valid_on(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
    /// assert!(!promo.is_valid_on(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    /// ```
    #[must_use]
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        match self.valid_until {
            Some(until) => date <= until,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_promo_without_expiry_always_valid() {
        let promo = PromoCode {
            code: "FOREVER".to_string(),
            rule: DiscountRule::Flat(500),
            valid_until: None,
        };
        assert!(promo.is_valid_on(d(2026, 1, 1)));
        assert!(promo.is_valid_on(d(2099, 12, 31)));
    }

    #[test]
    fn test_promo_expiry_inclusive() {
        let promo = PromoCode {
            code: "SPRING10".to_string(),
            rule: DiscountRule::Percent(10),
            valid_until: Some(d(2026, 3, 31)),
        };
        assert!(promo.is_valid_on(d(2026, 3, 30)));
        assert!(promo.is_valid_on(d(2026, 3, 31)));
        assert!(!promo.is_valid_on(d(2026, 4, 1)));
    }

    #[test]
    fn test_room_type_serde() {
        let deluxe = RoomType {
            id: 1,
            name: "Deluxe".to_string(),
            nightly_rate: 10000,
            monthly_rate: None,
            max_guests: 3,
            active: true,
        };
        let json = serde_json::to_string(&deluxe).unwrap();
        let back: RoomType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deluxe);
    }

    #[test]
    fn test_discount_rule_serde() {
        let flat: DiscountRule = serde_json::from_str(r#"{"flat":500}"#).unwrap();
        assert_eq!(flat, DiscountRule::Flat(500));
        let percent: DiscountRule = serde_json::from_str(r#"{"percent":10}"#).unwrap();
        assert_eq!(percent, DiscountRule::Percent(10));
    }
}

//! Core domain types for the orderflow library.
//!
//! All types use smart constructors to ensure validity at construction time,
//! following the "parse, don't validate" principle. Once a value exists it is
//! guaranteed valid and no further checks are needed downstream.

use chrono::Utc;
use nutype::nutype;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque identity of a persisted product.
///
/// Identities are assigned by the product store when a product is first
/// persisted. Unsaved products carry no identity at all (see
/// [`NewProduct`](crate::product::NewProduct)).
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Into,
    Serialize,
    Deserialize
))]
pub struct ProductId(u32);

/// Opaque identity of a persisted order, assigned by the order store.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Into,
    Serialize,
    Deserialize
))]
pub struct OrderId(u32);

/// Human-facing unique order identifier, distinct from the internal identity.
///
/// Format: `ORD-` + UTC timestamp (`yyyyMMddHHmmssfff`) + `-` + 8 uppercase
/// hex characters. External consumers parse this format, so it must be
/// reproduced exactly.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, regex = r"^ORD-[0-9]{17}-[0-9A-F]{8}$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generates a fresh order number from the current UTC time and a random
    /// hex suffix.
    ///
    /// The random suffix makes collisions between numbers generated within
    /// the same millisecond overwhelmingly unlikely; the store still treats
    /// the number as a unique key and reports collisions explicitly.
    pub fn generate() -> Self {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S%3f");
        let uuid = Uuid::new_v4().simple().to_string().to_uppercase();
        Self::try_new(format!("ORD-{timestamp}-{}", &uuid[..8]))
            .expect("generated order number matches the canonical format")
    }
}

/// Product display name. Trimmed, non-empty, at most 100 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductName(String);

/// Product description. Trimmed, non-empty, at most 500 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 500),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductDescription(String);

/// Customer name attached to an order. Trimmed, non-empty, at most 100
/// characters. Orders may omit the customer name entirely.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CustomerName(String);

/// Customer email address with basic format validation, at most 255
/// characters. Orders may omit the email entirely.
#[nutype(
    sanitize(trim),
    validate(
        not_empty,
        len_char_max = 255,
        regex = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CustomerEmail(String);

/// Requested quantity for an order line. Always greater than zero.
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct Quantity(u32);

impl Quantity {
    /// Adds two quantities, returning `None` on arithmetic overflow.
    ///
    /// Used when a repeated product line is merged into an existing one.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.into_inner()
            .checked_add(other.into_inner())
            .and_then(|value| Self::try_new(value).ok())
    }
}

/// Errors produced when constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount was negative.
    #[error("money amount cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount carried more than two decimal places.
    #[error("money amount cannot have more than 2 decimal places: {0}")]
    TooPrecise(Decimal),
    /// The amount exceeded [`Money::MAX_AMOUNT`].
    #[error("money amount {amount} exceeds maximum {max}", amount = .0, max = Money::MAX_AMOUNT)]
    TooLarge(Decimal),
}

/// Monetary amount backed by [`Decimal`] for precise arithmetic.
///
/// Always non-negative with at most two decimal places, capped at
/// [`Money::MAX_AMOUNT`]. The cap keeps every unit-price times quantity
/// product well inside `Decimal` range, so arithmetic on valid values
/// cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Maximum money amount (100 million).
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Creates a money value, rejecting negative, over-precise, or
    /// over-large amounts.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() {
            return Err(MoneyError::Negative(amount));
        }
        if amount.scale() > 2 {
            return Err(MoneyError::TooPrecise(amount));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(MoneyError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// The zero amount.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Creates a money value from whole cents, avoiding floating point.
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Returns the underlying decimal amount.
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Converts the amount to whole cents, saturating at `u64::MAX` for
    /// totals too large to represent.
    pub fn to_cents(&self) -> u64 {
        (self.0.saturating_mul(Decimal::ONE_HUNDRED))
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Multiplies a unit price by an ordered quantity.
    ///
    /// The result keeps the two-decimal scale and stays non-negative. The
    /// [`Money::MAX_AMOUNT`] cap on unit prices bounds the product far below
    /// `Decimal` range, so this cannot overflow; a line total may still
    /// exceed the per-amount cap.
    pub fn multiply(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(u32::from(quantity))))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, money| acc.saturating_add(money.0)))
    }
}

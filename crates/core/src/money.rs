//! Currency amounts and point-earning rates.
//!
//! Both are decimal value objects. Converting currency into points always
//! truncates toward zero at zero decimal places: a member never receives (or
//! loses) a fractional point that was rounded up.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Non-negative currency amount (e.g. an order's final price or a refund).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "money amount must not be negative (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl ValueObject for Money {}

/// Points earned per currency unit spent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PointRate(Decimal);

impl PointRate {
    pub fn new(rate: Decimal) -> Result<Self, DomainError> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(DomainError::validation(format!(
                "point rate must not be negative (got {rate})"
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whole points earned for `amount` at this rate.
    ///
    /// `rate × amount`, truncated toward zero. Never rounds half-up:
    /// rate 1 and amount 99.9 yields 99.
    pub fn points_for(&self, amount: Money) -> Result<i64, DomainError> {
        let product = self
            .0
            .checked_mul(amount.amount())
            .ok_or_else(|| DomainError::overflow("rate × amount"))?;

        product
            .trunc()
            .to_i64()
            .ok_or_else(|| DomainError::overflow(format!("{product} points")))
    }
}

impl core::fmt::Display for PointRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for PointRate {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PointRate> for Decimal {
    fn from(value: PointRate) -> Self {
        value.0
    }
}

impl ValueObject for PointRate {}

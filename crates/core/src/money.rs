//! Money - decimal wrapper for monetary amounts
//!
//! Transaction amounts are ordinarily non-negative, but a reimbursement is a
//! negative-amount twin of an original transaction (§4.6), so unlike a plain
//! ledger amount this type does not reject negative values at construction.
//! Card limits (`credit_limit`, `remaining_limit`) use `NonNegative` instead,
//! which does enforce the invariant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
}

/// A monetary amount. May be negative (reimbursements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn negate(&self) -> Self {
        Self(-self.0)
    }

    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(amount: Money) -> Self {
        amount.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A non-negative decimal, used for card limits.
///
/// # Invariant
/// The inner value is always >= 0, enforced by the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct NonNegative(Decimal);

impl NonNegative {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value < Decimal::ZERO {
            Err(MoneyError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// # Safety (by convention, not unsafe code)
    /// Caller must ensure `value` is non-negative (e.g. values already
    /// validated by a previous commit).
    #[inline]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    pub fn checked_sub(&self, other: &Money) -> Option<NonNegative> {
        let result = self.0.checked_sub(other.0)?;
        if result < Decimal::ZERO {
            None
        } else {
            Some(NonNegative(result))
        }
    }

    pub fn checked_add(&self, other: &Money) -> Option<NonNegative> {
        let result = self.0.checked_add(other.0)?;
        if result < Decimal::ZERO {
            None
        } else {
            Some(NonNegative(result))
        }
    }
}

impl fmt::Display for NonNegative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for NonNegative {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonNegative> for Decimal {
    fn from(value: NonNegative) -> Self {
        value.0
    }
}

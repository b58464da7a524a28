//! Integer monetary amounts and permille rates.
//!
//! Amounts are never negative. Everything that multiplies and then divides
//! goes through `engine::fixed_point` so truncation matches the remote system.

use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Non-negative quantity of a single currency in its smallest unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: u128) -> Self {
        Amount(value)
    }

    pub const fn get(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Sum of `amounts`, with overflow reported as `InvalidInput`.
    pub fn checked_sum<I>(amounts: I) -> Result<Amount, CalcError>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts.into_iter().try_fold(Amount::ZERO, |acc, a| {
            acc.checked_add(a).ok_or_else(|| {
                CalcError::invalid(format!("{} + {} overflows an amount", acc, a))
            })
        })
    }

    /// Subtract, or None if the result would go below zero.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// Absolute distance between two amounts.
    pub fn abs_diff(self, rhs: Amount) -> Amount {
        Amount(self.0.abs_diff(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(value.into())
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    /// # Panics
    /// Panics on overflow. Calculators on remote input use `checked_sum`.
    fn add(self, rhs: Amount) -> Amount {
        Amount(
            self.0
                .checked_add(rhs.0)
                .expect("amount addition overflowed"),
        )
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;

    /// # Panics
    /// Panics if `rhs > self`. Amounts never go negative; use `checked_sub`
    /// when the ordering is not already known.
    fn sub(self, rhs: Amount) -> Amount {
        Amount(
            self.0
                .checked_sub(rhs.0)
                .expect("amount subtraction went below zero"),
        )
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

/// Rate in parts per thousand. Annualized unless stated otherwise.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Permille(u32);

impl Permille {
    pub const ZERO: Permille = Permille(0);
    /// 1000‰, i.e. 100%.
    pub const HUNDRED_PERCENT: Permille = Permille(1000);

    pub const fn new(value: u32) -> Self {
        Permille(value)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Widened for use as a multiplier.
    pub fn as_u128(&self) -> u128 {
        self.0.into()
    }

    /// The complement to 100%, or None above 100%.
    pub fn complement(&self) -> Option<Permille> {
        Self::HUNDRED_PERCENT.0.checked_sub(self.0).map(Permille)
    }
}

impl fmt::Display for Permille {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}‰", self.0)
    }
}

//! Percent values backed by rust_decimal.
//!
//! Used for utilization and rate-curve parameters, where the reference
//! model divides before scaling back to permille.

use crate::domain::Permille;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A percentage on the 0..=100 scale.
///
/// Serializes to a JSON number, like the rest of the numeric domain types.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Percent(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);
    pub const ONE: Percent = Percent(Decimal::ONE);
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);

    pub fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Convert a permille rate, e.g. 700‰ becomes 70%.
    pub fn from_permille(value: Permille) -> Self {
        Percent(Decimal::from(value.get()) / Decimal::TEN)
    }

    /// Get the underlying Decimal.
    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl FromStr for Percent {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Percent)
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

impl From<u32> for Percent {
    fn from(value: u32) -> Self {
        Percent(Decimal::from(value))
    }
}

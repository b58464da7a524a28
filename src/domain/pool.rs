//! Liquidity pool observations and share prices.

use crate::domain::Amount;
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// Exchange rate between pool shares and the pool's currency.
///
/// Read as `numerator` shares per `denominator` currency units.
/// The denominator is always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRatio {
    numerator: Amount,
    denominator: Amount,
}

impl PriceRatio {
    /// One share per currency unit.
    pub const ONE: PriceRatio = PriceRatio {
        numerator: Amount::new(1),
        denominator: Amount::new(1),
    };

    pub fn new(numerator: Amount, denominator: Amount) -> Result<Self, CalcError> {
        if denominator.is_zero() {
            return Err(CalcError::invalid("price denominator must be positive"));
        }
        Ok(PriceRatio {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> Amount {
        self.numerator
    }

    pub fn denominator(&self) -> Amount {
        self.denominator
    }
}

/// One observed state of a lending pool. Immutable once captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolSnapshot {
    pub principal_due: Amount,
    pub interest_due: Amount,
    pub available_liquidity: Amount,
    pub total_shares: Amount,
}

impl LiquidityPoolSnapshot {
    /// Everything the pool owns: cash on hand plus what borrowers owe.
    pub fn total_value(&self) -> Result<Amount, CalcError> {
        Amount::checked_sum([
            self.available_liquidity,
            self.principal_due,
            self.interest_due,
        ])
    }

    /// Shares issued per currency unit of pool value.
    ///
    /// An empty pool (no shares or no value) prices at 1:1.
    pub fn share_price(&self) -> Result<PriceRatio, CalcError> {
        let total_value = self.total_value()?;
        if self.total_shares.is_zero() || total_value.is_zero() {
            return Ok(PriceRatio::ONE);
        }
        Ok(PriceRatio {
            numerator: self.total_shares,
            denominator: total_value,
        })
    }
}

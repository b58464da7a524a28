//! Conversion between pool currency and pool shares.
//!
//! `to_shares` and `to_currency` are not exact inverses: each truncates, so a
//! round trip may lose one unit while a share is worth at least one currency
//! unit (pool value never drops below the shares issued). Compare round trips
//! with `within_one_unit`, never with equality.

use crate::domain::{Amount, LiquidityPoolSnapshot, PriceRatio};
use crate::engine::fixed_point::multiply_then_divide;
use crate::error::CalcError;

/// ⌊amount · numerator / denominator⌋
pub fn to_shares(amount: Amount, price: PriceRatio) -> Result<Amount, CalcError> {
    multiply_then_divide(amount, price.numerator().get(), price.denominator().get())
}

/// ⌊shares · denominator / numerator⌋
///
/// # Errors
/// `InvalidInput` for a price with a zero numerator (worthless shares).
pub fn to_currency(shares: Amount, price: PriceRatio) -> Result<Amount, CalcError> {
    if price.numerator().is_zero() {
        return Err(CalcError::invalid("cannot price shares at a zero ratio"));
    }
    multiply_then_divide(shares, price.denominator().get(), price.numerator().get())
}

/// Shares a deposit of `amount` should mint against the pool as it was
/// before the deposit.
pub fn expected_deposit_shares(
    pool: &LiquidityPoolSnapshot,
    amount: Amount,
) -> Result<Amount, CalcError> {
    to_shares(amount, pool.share_price()?)
}

/// Currency a withdrawal of `shares` should pay out against the pool as it
/// was before the withdrawal.
///
/// # Errors
/// `InvalidInput` if more shares are burned than exist, or if the payout
/// exceeds the available liquidity.
pub fn expected_withdraw_amount(
    pool: &LiquidityPoolSnapshot,
    shares: Amount,
) -> Result<Amount, CalcError> {
    if shares > pool.total_shares {
        return Err(CalcError::invalid(format!(
            "withdrawing {} shares of {} issued",
            shares, pool.total_shares
        )));
    }
    let amount = to_currency(shares, pool.share_price()?)?;
    if amount > pool.available_liquidity {
        return Err(CalcError::invalid(format!(
            "payout {} exceeds available liquidity {}",
            amount, pool.available_liquidity
        )));
    }
    Ok(amount)
}

/// True if `observed` is `expected` or one unit either side of it.
pub fn within_one_unit(observed: Amount, expected: Amount) -> bool {
    observed.abs_diff(expected) <= Amount::new(1)
}

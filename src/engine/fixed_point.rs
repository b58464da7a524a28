//! Integer multiply-then-divide with 256-bit intermediates.
//!
//! Every calculator goes through here so results truncate toward zero the
//! same way the remote system does. Nothing ever rounds up.

use crate::domain::Amount;
use crate::error::CalcError;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for intermediate products.
    pub struct U256(4);
}

/// ⌊a·b/c⌋ without intermediate overflow.
pub fn multiply_then_divide(a: Amount, b: u128, c: u128) -> Result<Amount, CalcError> {
    mul_div(a.get(), b, c).map(Amount::new)
}

/// ⌊a·b·c/d⌋ with a single combined numerator, so no intermediate truncation.
pub fn multiply_then_divide_wide(
    a: Amount,
    b: u128,
    c: u128,
    d: u128,
) -> Result<Amount, CalcError> {
    if d == 0 {
        return Err(CalcError::invalid("division by zero"));
    }
    let numerator = U256::from(a.get())
        .checked_mul(U256::from(b))
        .and_then(|n| n.checked_mul(U256::from(c)))
        .ok_or_else(|| CalcError::invalid("intermediate product overflow"))?;
    narrow(numerator / U256::from(d)).map(Amount::new)
}

/// Raw ⌊a·b/c⌋ for callers working below the Amount layer.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, CalcError> {
    if c == 0 {
        return Err(CalcError::invalid("division by zero"));
    }
    // u128 * u128 always fits in 256 bits.
    let numerator = U256::from(a) * U256::from(b);
    narrow(numerator / U256::from(c))
}

/// ⌊a·b·c / (d·e)⌋ with both products held at full width.
pub fn mul_div_product(a: u128, b: u128, c: u128, d: u128, e: u128) -> Result<u128, CalcError> {
    let denominator = U256::from(d) * U256::from(e);
    if denominator.is_zero() {
        return Err(CalcError::invalid("division by zero"));
    }
    let numerator = U256::from(a)
        .checked_mul(U256::from(b))
        .and_then(|n| n.checked_mul(U256::from(c)))
        .ok_or_else(|| CalcError::invalid("intermediate product overflow"))?;
    narrow(numerator / denominator)
}

fn narrow(value: U256) -> Result<u128, CalcError> {
    if value > U256::from(u128::MAX) {
        return Err(CalcError::invalid("result does not fit in 128 bits"));
    }
    Ok(value.as_u128())
}

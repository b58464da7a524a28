//! Borrow capacity from down payment and liability ratios.
//!
//! LTV is the loan as a share of the whole position (loan + down payment);
//! LTD is the loan as a share of the down payment alone.

use crate::domain::{Amount, LiquidityPoolSnapshot, Percent, Permille};
use crate::engine::fixed_point::{mul_div, multiply_then_divide};
use crate::engine::utilization::{borrow_rate, pool_utilization, RateCurve};
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// ⌊downpayment · ltv / (1000 − ltv)⌋
pub fn borrow_from_ltv(downpayment: Amount, ltv: Permille) -> Result<Amount, CalcError> {
    let remainder = ltv_remainder(ltv)?;
    multiply_then_divide(downpayment, ltv.as_u128(), remainder.as_u128())
}

/// ⌊downpayment · ltd / 1000⌋
pub fn borrow_from_ltd(downpayment: Amount, ltd: Permille) -> Result<Amount, CalcError> {
    multiply_then_divide(
        downpayment,
        ltd.as_u128(),
        Permille::HUNDRED_PERCENT.as_u128(),
    )
}

/// ⌊1000 · ltv / (1000 − ltv)⌋
pub fn ltv_to_ltd(ltv: Permille) -> Result<Permille, CalcError> {
    let remainder = ltv_remainder(ltv)?;
    let ltd = mul_div(
        Permille::HUNDRED_PERCENT.as_u128(),
        ltv.as_u128(),
        remainder.as_u128(),
    )?;
    u32::try_from(ltd)
        .map(Permille::new)
        .map_err(|_| CalcError::invalid(format!("LTD for {} does not fit a permille", ltv)))
}

/// Amount the protocol should lend for `downpayment`.
///
/// With a leverage cap, the lesser of the LTD-capped and LTV-derived amounts;
/// without one, the LTV-derived amount.
pub fn expected_borrow(
    downpayment: Amount,
    initial_liability: Permille,
    max_ltd: Option<Permille>,
) -> Result<Amount, CalcError> {
    let from_ltv = borrow_from_ltv(downpayment, initial_liability)?;
    match max_ltd {
        Some(cap) => Ok(from_ltv.min(borrow_from_ltd(downpayment, cap)?)),
        None => Ok(from_ltv),
    }
}

fn ltv_remainder(ltv: Permille) -> Result<Permille, CalcError> {
    match ltv.complement() {
        Some(remainder) if remainder.get() > 0 => Ok(remainder),
        _ => Err(CalcError::invalid(format!("LTV {} must be below 100%", ltv))),
    }
}

/// What a quote for a new lease should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCheck {
    pub borrow: Amount,
    /// Down payment plus borrow.
    pub total: Amount,
    /// Pool utilization once the borrow is lent out, for reporting.
    pub utilization: Percent,
    pub annual_interest_rate: Permille,
}

impl QuoteCheck {
    /// Recompute a quote from the pool state captured before the lease opens.
    ///
    /// # Errors
    /// `InvalidInput` if the pool cannot cover the borrow or the ratios are
    /// out of range.
    pub fn compute(
        downpayment: Amount,
        initial_liability: Permille,
        max_ltd: Option<Permille>,
        pool: &LiquidityPoolSnapshot,
        curve: &RateCurve,
    ) -> Result<Self, CalcError> {
        let borrow = expected_borrow(downpayment, initial_liability, max_ltd)?;
        let ratio = pool_utilization(pool, borrow)?;
        let annual_interest_rate = borrow_rate(&ratio, curve)?;
        let utilization = ratio.percent()?;
        tracing::debug!(
            "Quote: downpayment {} borrow {} utilization {} rate {}",
            downpayment,
            borrow,
            utilization,
            annual_interest_rate
        );
        Ok(Self {
            borrow,
            total: downpayment + borrow,
            utilization,
            annual_interest_rate,
        })
    }
}

//! Pool utilization and the utilization-driven borrow rate.
//!
//! Utilization is carried as the exact pair (liability, total value) so the
//! rate curve can be evaluated in one integer division. `Percent` is only
//! the reported form.

use crate::domain::{Amount, LiquidityPoolSnapshot, Percent, Permille};
use crate::engine::fixed_point::{mul_div, mul_div_product};
use crate::error::CalcError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept when reporting utilization as a percentage.
const PERCENT_SCALE: u32 = 18;

/// Lent-out liability over total pool value.
///
/// Equality compares the stored pair, so 1/2 and 2/4 are different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilization {
    liability: Amount,
    total: Amount,
}

impl Utilization {
    /// # Errors
    /// `InvalidInput` if the liability exceeds the total.
    pub fn new(liability: Amount, total: Amount) -> Result<Self, CalcError> {
        if liability > total {
            return Err(CalcError::invalid(format!(
                "liability {} exceeds pool value {}",
                liability, total
            )));
        }
        Ok(Self { liability, total })
    }

    pub fn liability(&self) -> Amount {
        self.liability
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// `liability / total < 1%`. An empty pool counts as idle.
    pub fn is_below_one_percent(&self) -> Result<bool, CalcError> {
        if self.total.is_zero() {
            return Ok(true);
        }
        Ok(mul_div(self.liability.get(), 100, self.total.get())? < 1)
    }

    /// Utilization as a percentage, truncated to 18 decimal places.
    pub fn percent(&self) -> Result<Percent, CalcError> {
        if self.total.is_zero() {
            return Ok(Percent::ZERO);
        }
        let scaled = mul_div(
            self.liability.get(),
            100 * 10u128.pow(PERCENT_SCALE),
            self.total.get(),
        )?;
        i128::try_from(scaled)
            .ok()
            .and_then(|mantissa| {
                Decimal::try_from_i128_with_scale(mantissa, PERCENT_SCALE).ok()
            })
            .map(Percent::new)
            .ok_or_else(|| CalcError::invalid("utilization out of decimal range"))
    }
}

/// Utilization once `pending_borrow` is taken, as an exact ratio.
///
/// liability = interest_due + pending_borrow + principal_due
/// total = liability + (pool_liquidity − pending_borrow)
///
/// # Errors
/// `InvalidInput` if the pool cannot cover `pending_borrow` (the quote
/// should already have failed upstream) or the sums overflow.
pub fn utilization_ratio(
    principal_due: Amount,
    pending_borrow: Amount,
    interest_due: Amount,
    pool_liquidity: Amount,
) -> Result<Utilization, CalcError> {
    let free_liquidity = pool_liquidity.checked_sub(pending_borrow).ok_or_else(|| {
        CalcError::invalid(format!(
            "pool liquidity {} does not cover pending borrow {}",
            pool_liquidity, pending_borrow
        ))
    })?;
    let liability = Amount::checked_sum([interest_due, pending_borrow, principal_due])?;
    let total = Amount::checked_sum([liability, free_liquidity])?;
    Utilization::new(liability, total)
}

/// Share of pool value that is lent out once `pending_borrow` is taken,
/// as a percentage in [0, 100]. An empty pool with nothing owed is 0%.
pub fn utilization(
    principal_due: Amount,
    pending_borrow: Amount,
    interest_due: Amount,
    pool_liquidity: Amount,
) -> Result<Percent, CalcError> {
    utilization_ratio(principal_due, pending_borrow, interest_due, pool_liquidity)?.percent()
}

/// Utilization of a captured pool state if `pending_borrow` were lent now.
pub fn pool_utilization(
    pool: &LiquidityPoolSnapshot,
    pending_borrow: Amount,
) -> Result<Utilization, CalcError> {
    utilization_ratio(
        pool.principal_due,
        pending_borrow,
        pool.interest_due,
        pool.available_liquidity,
    )
}

/// Piecewise-linear borrow rate curve anchored at the optimal utilization.
///
/// Pools configure all three points in permille.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCurve {
    optimal_utilization: Permille,
    base_rate: Permille,
    addon_rate: Permille,
}

impl RateCurve {
    pub fn from_permille(
        optimal_utilization: Permille,
        base_rate: Permille,
        addon_rate: Permille,
    ) -> Result<Self, CalcError> {
        if optimal_utilization == Permille::ZERO {
            return Err(CalcError::invalid("optimal utilization must be positive"));
        }
        Ok(Self {
            optimal_utilization,
            base_rate,
            addon_rate,
        })
    }

    pub fn optimal_utilization(&self) -> Percent {
        Percent::from_permille(self.optimal_utilization)
    }

    pub fn base_rate(&self) -> Percent {
        Percent::from_permille(self.base_rate)
    }

    pub fn addon_rate(&self) -> Percent {
        Percent::from_permille(self.addon_rate)
    }
}

/// Annual borrow rate in permille at the given utilization.
///
/// Below 1% utilization the base rate applies unchanged. Otherwise
/// ⌊(base + (utilization / optimal) · addon) · 10⌋, which in permille is
/// base‰ + ⌊1000 · liability · addon‰ / (total · optimal‰)⌋.
pub fn borrow_rate(utilization: &Utilization, curve: &RateCurve) -> Result<Permille, CalcError> {
    if utilization.is_below_one_percent()? {
        return Ok(curve.base_rate);
    }
    let addon = mul_div_product(
        utilization.liability.get(),
        Permille::HUNDRED_PERCENT.as_u128(),
        curve.addon_rate.as_u128(),
        utilization.total.get(),
        curve.optimal_utilization.as_u128(),
    )?;
    u32::try_from(addon)
        .ok()
        .and_then(|addon| curve.base_rate.get().checked_add(addon))
        .map(Permille::new)
        .ok_or_else(|| {
            CalcError::invalid(format!(
                "borrow rate with addon {}‰ does not fit a permille",
                addon
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn a(v: u128) -> Amount {
        Amount::new(v)
    }

    fn p(v: u32) -> Permille {
        Permille::new(v)
    }

    fn ratio(liability: u128, total: u128) -> Utilization {
        Utilization::new(a(liability), a(total)).unwrap()
    }

    fn curve() -> RateCurve {
        RateCurve::from_permille(p(700), p(120), p(20)).unwrap()
    }

    #[test]
    fn test_pending_borrow_on_idle_pool() {
        let u = utilization(a(0), a(1000), a(0), a(10_000)).unwrap();
        assert_eq!(u, Percent::from(10));
    }

    #[test]
    fn test_counts_interest_and_principal() {
        // liability 500, free 500
        let u = utilization(a(300), a(0), a(200), a(500)).unwrap();
        assert_eq!(u, Percent::from(50));
    }

    #[test]
    fn test_fully_borrowed_pool_is_hundred() {
        let u = utilization(a(100), a(50), a(0), a(50)).unwrap();
        assert_eq!(u, Percent::HUNDRED);
    }

    #[test]
    fn test_empty_pool_is_zero() {
        let u = utilization(a(0), a(0), a(0), a(0)).unwrap();
        assert_eq!(u, Percent::ZERO);
    }

    #[test]
    fn test_repeating_fraction_truncates() {
        let u = utilization(a(5), a(0), a(0), a(1)).unwrap();
        assert_eq!(u, Percent::from_str("83.333333333333333333").unwrap());
    }

    #[test]
    fn test_borrow_above_liquidity_is_invalid() {
        let result = utilization(a(0), a(11), a(0), a(10));
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_overflowing_sums_are_invalid() {
        let result = utilization(a(u128::MAX), a(0), a(1), a(0));
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));

        let result = utilization(a(u128::MAX), a(0), a(0), a(1));
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_utilization_at_amount_limit() {
        let u = utilization(a(u128::MAX), a(0), a(0), a(0)).unwrap();
        assert_eq!(u, Percent::HUNDRED);
    }

    #[test]
    fn test_pool_utilization_reads_snapshot() {
        let pool = LiquidityPoolSnapshot {
            principal_due: a(0),
            interest_due: a(0),
            available_liquidity: a(10_000),
            total_shares: a(10_000),
        };
        let u = pool_utilization(&pool, a(1000)).unwrap();
        assert_eq!(u, ratio(1000, 10_000));
        assert_eq!(u.percent().unwrap(), Percent::from(10));
    }

    #[test]
    fn test_ratio_rejects_liability_above_total() {
        assert!(Utilization::new(a(2), a(1)).is_err());
    }

    #[test]
    fn test_borrow_rate_below_one_percent_is_base() {
        assert_eq!(borrow_rate(&ratio(99, 10_000), &curve()).unwrap(), p(120));
        assert_eq!(borrow_rate(&ratio(0, 10_000), &curve()).unwrap(), p(120));
        assert_eq!(borrow_rate(&ratio(0, 0), &curve()).unwrap(), p(120));
    }

    #[test]
    fn test_borrow_rate_at_one_percent_uses_curve() {
        // 120 + ⌊1000·1·20 / (100·700)⌋ = 120
        assert_eq!(borrow_rate(&ratio(1, 100), &curve()).unwrap(), p(120));
        let steep = RateCurve::from_permille(p(10), p(0), p(100)).unwrap();
        assert_eq!(borrow_rate(&ratio(1, 100), &steep).unwrap(), p(100));
    }

    #[test]
    fn test_borrow_rate_at_optimal_adds_full_addon() {
        assert_eq!(borrow_rate(&ratio(7, 10), &curve()).unwrap(), p(140));
    }

    #[test]
    fn test_borrow_rate_truncates() {
        // (12 + 10/70·2)·10 = 122.857...
        assert_eq!(borrow_rate(&ratio(1, 10), &curve()).unwrap(), p(122));
    }

    #[test]
    fn test_borrow_rate_exact_on_repeating_utilization() {
        // 83.33...% on a 50% / 10% / 15% curve is exactly 350‰.
        let u = utilization_ratio(a(5), a(0), a(0), a(1)).unwrap();
        let curve = RateCurve::from_permille(p(500), p(100), p(150)).unwrap();
        assert_eq!(borrow_rate(&u, &curve).unwrap(), p(350));
    }

    #[test]
    fn test_borrow_rate_non_decreasing() {
        let c = curve();
        let mut last = Permille::ZERO;
        for liability in 0..=1000 {
            let rate = borrow_rate(&ratio(liability, 1000), &c).unwrap();
            assert!(rate >= last, "rate dropped at {}/1000", liability);
            last = rate;
        }
    }

    #[test]
    fn test_curve_rejects_zero_optimal() {
        let result = RateCurve::from_permille(Permille::ZERO, p(10), p(10));
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));
    }
}

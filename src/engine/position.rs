//! Expected dues, repayments and liquidation outcomes for a single position.

use crate::domain::{Amount, Permille, Position, TimeNs};
use crate::engine::fixed_point::mul_div;
use crate::engine::interest::split_due_window;
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// What a position owes at a point in time, split into tranches.
///
/// Field order is the order a repayment settles them in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDues {
    pub overdue_margin: Amount,
    pub overdue_interest: Amount,
    pub due_margin: Amount,
    pub due_interest: Amount,
    pub principal: Amount,
}

impl PositionDues {
    /// Interest and margin only, without principal.
    pub fn interest_total(&self) -> Result<Amount, CalcError> {
        Amount::checked_sum([
            self.overdue_margin,
            self.overdue_interest,
            self.due_margin,
            self.due_interest,
        ])
    }

    pub fn total(&self) -> Result<Amount, CalcError> {
        Amount::checked_sum([self.interest_total()?, self.principal])
    }

    pub fn is_settled(&self) -> bool {
        *self == PositionDues::default()
    }

    fn tranches(&self) -> [Amount; 5] {
        [
            self.overdue_margin,
            self.overdue_interest,
            self.due_margin,
            self.due_interest,
            self.principal,
        ]
    }
}

/// Recompute dues for `position` at `now`.
///
/// Anything unpaid for longer than `due_period_nanos` is overdue; loan
/// interest and margin accrue separately over both windows.
pub fn position_dues(
    position: &Position,
    now: TimeNs,
    due_period_nanos: u64,
) -> Result<PositionDues, CalcError> {
    let window = split_due_window(position.interest_paid_until, now, due_period_nanos)?;
    let principal = position.principal;

    Ok(PositionDues {
        overdue_margin: window.overdue(principal, position.margin_rate).interest()?,
        overdue_interest: window
            .overdue(principal, position.annual_interest_rate)
            .interest()?,
        due_margin: window.current(principal, position.margin_rate).interest()?,
        due_interest: window
            .current(principal, position.annual_interest_rate)
            .interest()?,
        principal,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentOutcome {
    /// Some dues remain; the lease stays `Opened`.
    Partial,
    /// Everything is covered; the lease moves to `Paid`.
    Full,
}

/// Full when `payment` covers every tranche.
pub fn repayment_outcome(dues: &PositionDues, payment: Amount) -> RepaymentOutcome {
    let covered = dues
        .tranches()
        .into_iter()
        .try_fold(payment, |left, owed| left.checked_sub(owed));
    match covered {
        Some(_) => RepaymentOutcome::Full,
        None => RepaymentOutcome::Partial,
    }
}

/// Dues left after a payment, and any overpayment returned as change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentApplication {
    pub remaining: PositionDues,
    pub change: Amount,
    pub outcome: RepaymentOutcome,
}

/// Settle tranches in order: overdue margin, overdue interest, due margin,
/// due interest, principal.
pub fn apply_payment(dues: &PositionDues, payment: Amount) -> PaymentApplication {
    let mut left = payment;
    let mut settle = |owed: Amount| -> Amount {
        let paid = owed.min(left);
        left = left - paid;
        owed - paid
    };

    let remaining = PositionDues {
        overdue_margin: settle(dues.overdue_margin),
        overdue_interest: settle(dues.overdue_interest),
        due_margin: settle(dues.due_margin),
        due_interest: settle(dues.due_interest),
        principal: settle(dues.principal),
    };
    let outcome = if remaining.is_settled() {
        RepaymentOutcome::Full
    } else {
        RepaymentOutcome::Partial
    };

    PaymentApplication {
        remaining,
        change: left,
        outcome,
    }
}

/// Loan-to-value: ⌊1000 · total_due / asset_value⌋.
///
/// # Errors
/// `InvalidInput` for a worthless position or a ratio too large for a permille.
pub fn ltv(total_due: Amount, asset_value: Amount) -> Result<Permille, CalcError> {
    if asset_value.is_zero() {
        return Err(CalcError::invalid("asset value must be positive"));
    }
    let ratio = mul_div(
        total_due.get(),
        Permille::HUNDRED_PERCENT.as_u128(),
        asset_value.get(),
    )?;
    u32::try_from(ratio)
        .map(Permille::new)
        .map_err(|_| CalcError::invalid(format!("LTV {} out of range", ratio)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidationKind {
    /// Principal reduced; the lease stays `Opened`.
    Partial,
    /// Position consumed; the lease ends `Liquidated`.
    Full,
}

/// A liquidation is full when what would remain falls below the minimum asset floor.
pub fn classify_liquidation(remaining_asset: Amount, min_asset: Amount) -> LiquidationKind {
    if remaining_asset < min_asset || remaining_asset.is_zero() {
        LiquidationKind::Full
    } else {
        LiquidationKind::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeaseId, LeaseState, NANOS_PER_YEAR};

    fn a(v: u128) -> Amount {
        Amount::new(v)
    }

    fn position(paid_until: u64) -> Position {
        Position {
            id: LeaseId::new("lease-1"),
            principal: a(1_000_000),
            asset: a(2_000_000),
            annual_interest_rate: Permille::new(100),
            margin_rate: Permille::new(30),
            interest_paid_until: TimeNs::new(paid_until),
            state: LeaseState::Opened { in_progress: false },
            close_policy: None,
        }
    }

    #[test]
    fn test_dues_all_current_within_due_period() {
        let dues =
            position_dues(&position(0), TimeNs::new(NANOS_PER_YEAR), NANOS_PER_YEAR).unwrap();
        assert_eq!(dues.overdue_interest, Amount::ZERO);
        assert_eq!(dues.overdue_margin, Amount::ZERO);
        assert_eq!(dues.due_interest, a(100_000));
        assert_eq!(dues.due_margin, a(30_000));
        assert_eq!(dues.total().unwrap(), a(1_130_000));
    }

    #[test]
    fn test_dues_split_into_overdue() {
        // Two years unpaid with a one-year due period.
        let dues =
            position_dues(&position(0), TimeNs::new(2 * NANOS_PER_YEAR), NANOS_PER_YEAR).unwrap();
        assert_eq!(dues.overdue_interest, a(100_000));
        assert_eq!(dues.overdue_margin, a(30_000));
        assert_eq!(dues.due_interest, a(100_000));
        assert_eq!(dues.due_margin, a(30_000));
        assert_eq!(dues.interest_total().unwrap(), a(260_000));
    }

    #[test]
    fn test_dues_reject_now_before_paid_until() {
        let result = position_dues(&position(100), TimeNs::new(50), NANOS_PER_YEAR);
        assert!(matches!(result, Err(CalcError::InvalidTimeWindow { .. })));
    }

    #[test]
    fn test_apply_payment_order() {
        let dues = PositionDues {
            overdue_margin: a(10),
            overdue_interest: a(20),
            due_margin: a(30),
            due_interest: a(40),
            principal: a(100),
        };
        let applied = apply_payment(&dues, a(45));
        assert_eq!(applied.remaining.overdue_margin, a(0));
        assert_eq!(applied.remaining.overdue_interest, a(0));
        assert_eq!(applied.remaining.due_margin, a(15));
        assert_eq!(applied.remaining.due_interest, a(40));
        assert_eq!(applied.remaining.principal, a(100));
        assert_eq!(applied.change, a(0));
        assert_eq!(applied.outcome, RepaymentOutcome::Partial);
    }

    #[test]
    fn test_full_repayment_returns_change() {
        let dues = PositionDues {
            principal: a(100),
            due_interest: a(5),
            ..Default::default()
        };
        let applied = apply_payment(&dues, a(110));
        assert!(applied.remaining.is_settled());
        assert_eq!(applied.change, a(5));
        assert_eq!(applied.outcome, RepaymentOutcome::Full);
        assert_eq!(repayment_outcome(&dues, a(105)), RepaymentOutcome::Full);
        assert_eq!(repayment_outcome(&dues, a(104)), RepaymentOutcome::Partial);
    }

    #[test]
    fn test_dues_near_amount_limit() {
        let dues = PositionDues {
            due_interest: a(1),
            principal: a(u128::MAX),
            ..Default::default()
        };
        assert!(matches!(dues.total(), Err(CalcError::InvalidInput(_))));
        assert_eq!(dues.interest_total().unwrap(), a(1));

        let applied = apply_payment(&dues, a(u128::MAX));
        assert_eq!(applied.outcome, RepaymentOutcome::Partial);
        assert_eq!(applied.remaining.principal, a(1));
        assert_eq!(repayment_outcome(&dues, a(u128::MAX)), RepaymentOutcome::Partial);
    }

    #[test]
    fn test_ltv() {
        assert_eq!(ltv(a(600), a(1000)).unwrap(), Permille::new(600));
        assert_eq!(ltv(a(1), a(3)).unwrap(), Permille::new(333));
        assert!(ltv(a(1), a(0)).is_err());
    }

    #[test]
    fn test_classify_liquidation() {
        assert_eq!(classify_liquidation(a(500), a(100)), LiquidationKind::Partial);
        assert_eq!(classify_liquidation(a(100), a(100)), LiquidationKind::Partial);
        assert_eq!(classify_liquidation(a(99), a(100)), LiquidationKind::Full);
        assert_eq!(classify_liquidation(a(0), a(0)), LiquidationKind::Full);
    }
}

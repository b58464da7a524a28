//! Simple (non-compounding) interest accrual over nanosecond windows.

use crate::domain::{Amount, Permille, TimeNs, NANOS_PER_YEAR};
use crate::engine::fixed_point::multiply_then_divide_wide;
use crate::error::CalcError;

/// Interest owed on `principal` at `annual_rate` between `from` and `to`.
///
/// ⌊principal · rate · (to − from) / (1000 · NANOS_PER_YEAR)⌋
///
/// # Errors
/// `InvalidTimeWindow` if `to < from`. Interest is never negative.
pub fn accrue(
    principal: Amount,
    annual_rate: Permille,
    from: TimeNs,
    to: TimeNs,
) -> Result<Amount, CalcError> {
    let elapsed = to
        .checked_since(from)
        .ok_or(CalcError::InvalidTimeWindow { from, to })?;
    if elapsed == 0 {
        return Ok(Amount::ZERO);
    }

    multiply_then_divide_wide(
        principal,
        annual_rate.as_u128(),
        elapsed.into(),
        Permille::HUNDRED_PERCENT.as_u128() * u128::from(NANOS_PER_YEAR),
    )
}

/// A single accrual window. Built per calculation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestPeriod {
    pub principal: Amount,
    pub rate: Permille,
    pub from: TimeNs,
    pub to: TimeNs,
}

impl InterestPeriod {
    pub fn interest(&self) -> Result<Amount, CalcError> {
        accrue(self.principal, self.rate, self.from, self.to)
    }
}

/// The unpaid time range split at the due boundary.
///
/// Interest older than one due period is overdue; the rest is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    pub last_paid: TimeNs,
    pub boundary: TimeNs,
    pub now: TimeNs,
}

impl DueWindow {
    pub fn overdue(&self, principal: Amount, rate: Permille) -> InterestPeriod {
        InterestPeriod {
            principal,
            rate,
            from: self.last_paid,
            to: self.boundary,
        }
    }

    pub fn current(&self, principal: Amount, rate: Permille) -> InterestPeriod {
        InterestPeriod {
            principal,
            rate,
            from: self.boundary,
            to: self.now,
        }
    }
}

/// Split `[last_paid, now]` at `max(last_paid, now − due_period)`.
pub fn split_due_window(
    last_paid: TimeNs,
    now: TimeNs,
    due_period_nanos: u64,
) -> Result<DueWindow, CalcError> {
    if now < last_paid {
        return Err(CalcError::InvalidTimeWindow {
            from: last_paid,
            to: now,
        });
    }
    let boundary = last_paid.max(now.saturating_sub_nanos(due_period_nanos));
    Ok(DueWindow {
        last_paid,
        boundary,
        now,
    })
}

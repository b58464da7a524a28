//! The leveraged position under test.

use crate::domain::{Amount, LeaseId, LeaseState, Permille, TimeNs};
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// A leveraged position as last observed.
///
/// Created when a leverage request is accepted; changed by repayments,
/// closes and liquidations. The model never mutates it on the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: LeaseId,
    /// Borrowed amount still owed, in the pool currency.
    pub principal: Amount,
    /// Collateral held, in asset units.
    pub asset: Amount,
    /// Annual loan interest owed to the pool.
    pub annual_interest_rate: Permille,
    /// Annual margin interest owed on top of the loan rate.
    pub margin_rate: Permille,
    /// Interest is settled up to this instant.
    pub interest_paid_until: TimeNs,
    pub state: LeaseState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_policy: Option<ClosePolicy>,
}

/// Which close-policy threshold fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseTrigger {
    StopLoss,
    TakeProfit,
}

/// Automatic close thresholds, as loan-to-value levels.
///
/// Stop-loss fires once LTV reaches it; take-profit fires once LTV drops below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Permille>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Permille>,
}

impl ClosePolicy {
    /// A policy is only accepted if it would not fire at the current LTV.
    pub fn validate(&self, current_ltv: Permille) -> Result<(), CalcError> {
        if let Some(sl) = self.stop_loss {
            if sl <= current_ltv {
                return Err(CalcError::invalid(format!(
                    "stop loss {} must be above current LTV {}",
                    sl, current_ltv
                )));
            }
            if sl > Permille::HUNDRED_PERCENT {
                return Err(CalcError::invalid(format!("stop loss {} exceeds 100%", sl)));
            }
        }
        if let Some(tp) = self.take_profit {
            if tp >= current_ltv {
                return Err(CalcError::invalid(format!(
                    "take profit {} must be below current LTV {}",
                    tp, current_ltv
                )));
            }
        }
        Ok(())
    }

    pub fn triggered(&self, ltv: Permille) -> Option<CloseTrigger> {
        if self.stop_loss.is_some_and(|sl| ltv >= sl) {
            return Some(CloseTrigger::StopLoss);
        }
        if self.take_profit.is_some_and(|tp| ltv < tp) {
            return Some(CloseTrigger::TakeProfit);
        }
        None
    }
}

/// One poll result for a lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseSnapshot {
    pub lease: LeaseId,
    pub state: LeaseState,
    pub principal_due: Amount,
    pub asset: Amount,
    pub observed_at: TimeNs,
}

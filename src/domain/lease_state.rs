//! Lifecycle states of a leveraged position.
//!
//! The remote system moves a lease forward through these states; this model
//! only observes them. A state may repeat (`Opened -> Opened` after a partial
//! liquidation) but never moves backwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of the opening workflow, in the order the remote system runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningPhase {
    /// Interchain account is being set up.
    OpenIcaAccount,
    /// Down payment and loan are being transferred out.
    TransferOut,
    /// Asset is being bought on the remote DEX.
    BuyAsset,
    /// Transfer of the bought asset back has been initiated.
    TransferInInit,
    /// Transfer of the bought asset back has finished.
    TransferInFinish,
}

impl fmt::Display for OpeningPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpeningPhase::OpenIcaAccount => "open_ica_account",
            OpeningPhase::TransferOut => "transfer_out",
            OpeningPhase::BuyAsset => "buy_asset",
            OpeningPhase::TransferInInit => "transfer_in_init",
            OpeningPhase::TransferInFinish => "transfer_in_finish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseState {
    Opening { phase: OpeningPhase },
    Opened { in_progress: bool },
    Paid { in_progress: bool },
    Closed,
    Liquidated,
}

/// A state observed after a state it can never follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regression {
    pub previous: LeaseState,
    pub observed: LeaseState,
}

impl fmt::Display for Regression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} observed after {}", self.observed, self.previous)
    }
}

impl LeaseState {
    /// No further change is expected after a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaseState::Closed | LeaseState::Liquidated)
    }

    /// True while the remote system still has an operation in flight.
    ///
    /// Opening is in flight by definition until the lease is `Opened`.
    pub fn in_progress(&self) -> bool {
        match self {
            LeaseState::Opening { .. } => true,
            LeaseState::Opened { in_progress } | LeaseState::Paid { in_progress } => *in_progress,
            LeaseState::Closed | LeaseState::Liquidated => false,
        }
    }

    /// Stable means idle or terminal: nothing more will happen without a new action.
    pub fn is_stable(&self) -> bool {
        self.is_terminal() || !self.in_progress()
    }

    fn rank(&self) -> u8 {
        match self {
            LeaseState::Opening { .. } => 0,
            LeaseState::Opened { .. } => 1,
            LeaseState::Paid { .. } => 2,
            LeaseState::Closed | LeaseState::Liquidated => 3,
        }
    }

    /// Check that `self` may be observed after `previous`.
    ///
    /// Rejects going back to an earlier state or opening phase, and any
    /// change at all once a terminal state has been seen.
    pub fn check_follows(&self, previous: &LeaseState) -> Result<(), Regression> {
        let regression = Regression {
            previous: *previous,
            observed: *self,
        };

        if previous.is_terminal() {
            return if self == previous {
                Ok(())
            } else {
                Err(regression)
            };
        }

        match (previous, self) {
            (LeaseState::Opening { phase: prev }, LeaseState::Opening { phase: next })
                if next < prev =>
            {
                Err(regression)
            }
            _ if self.rank() < previous.rank() => Err(regression),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LeaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseState::Opening { phase } => write!(f, "opening({})", phase),
            LeaseState::Opened { in_progress } => write!(f, "opened(in_progress={})", in_progress),
            LeaseState::Paid { in_progress } => write!(f, "paid(in_progress={})", in_progress),
            LeaseState::Closed => f.write_str("closed"),
            LeaseState::Liquidated => f.write_str("liquidated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening(phase: OpeningPhase) -> LeaseState {
        LeaseState::Opening { phase }
    }

    #[test]
    fn test_opening_phases_are_ordered() {
        assert!(OpeningPhase::OpenIcaAccount < OpeningPhase::TransferOut);
        assert!(OpeningPhase::TransferOut < OpeningPhase::BuyAsset);
        assert!(OpeningPhase::BuyAsset < OpeningPhase::TransferInInit);
        assert!(OpeningPhase::TransferInInit < OpeningPhase::TransferInFinish);
    }

    #[test]
    fn test_stability() {
        assert!(!opening(OpeningPhase::BuyAsset).is_stable());
        assert!(!LeaseState::Opened { in_progress: true }.is_stable());
        assert!(LeaseState::Opened { in_progress: false }.is_stable());
        assert!(!LeaseState::Paid { in_progress: true }.is_stable());
        assert!(LeaseState::Closed.is_stable());
        assert!(LeaseState::Liquidated.is_stable());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        let path = [
            opening(OpeningPhase::OpenIcaAccount),
            opening(OpeningPhase::BuyAsset),
            opening(OpeningPhase::TransferInFinish),
            LeaseState::Opened { in_progress: true },
            LeaseState::Opened { in_progress: false },
            LeaseState::Paid { in_progress: false },
            LeaseState::Closed,
        ];
        for pair in path.windows(2) {
            assert_eq!(pair[1].check_follows(&pair[0]), Ok(()));
        }
    }

    #[test]
    fn test_repeated_state_allowed() {
        let opened = LeaseState::Opened { in_progress: false };
        assert!(opened.check_follows(&opened).is_ok());
        assert!(LeaseState::Opened { in_progress: true }
            .check_follows(&opened)
            .is_ok());
        assert!(LeaseState::Closed.check_follows(&LeaseState::Closed).is_ok());
    }

    #[test]
    fn test_subphase_regression_rejected() {
        let err = opening(OpeningPhase::TransferOut)
            .check_follows(&opening(OpeningPhase::BuyAsset))
            .unwrap_err();
        assert_eq!(err.previous, opening(OpeningPhase::BuyAsset));
        assert_eq!(err.observed, opening(OpeningPhase::TransferOut));
    }

    #[test]
    fn test_rank_regression_rejected() {
        let paid = LeaseState::Paid { in_progress: false };
        let opened = LeaseState::Opened { in_progress: false };
        assert!(opened.check_follows(&paid).is_err());
        assert!(opening(OpeningPhase::BuyAsset).check_follows(&opened).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(LeaseState::Liquidated.check_follows(&LeaseState::Closed).is_err());
        assert!(LeaseState::Closed.check_follows(&LeaseState::Liquidated).is_err());
        assert!(LeaseState::Opened { in_progress: false }
            .check_follows(&LeaseState::Liquidated)
            .is_err());
    }

    #[test]
    fn test_liquidation_from_opened_allowed() {
        let opened = LeaseState::Opened { in_progress: false };
        assert!(LeaseState::Liquidated.check_follows(&opened).is_ok());
    }

    #[test]
    fn test_json_external_tagging() {
        let state: LeaseState =
            serde_json::from_str(r#"{"opened":{"in_progress":false}}"#).unwrap();
        assert_eq!(state, LeaseState::Opened { in_progress: false });

        let state: LeaseState =
            serde_json::from_str(r#"{"opening":{"phase":"buy_asset"}}"#).unwrap();
        assert_eq!(state, opening(OpeningPhase::BuyAsset));

        let json = serde_json::to_string(&LeaseState::Closed).unwrap();
        assert_eq!(json, r#""closed""#);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            opening(OpeningPhase::TransferInInit).to_string(),
            "opening(transfer_in_init)"
        );
        assert_eq!(LeaseState::Liquidated.to_string(), "liquidated");
    }
}

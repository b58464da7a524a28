//! Domain types for the lease verification model.
//!
//! This module provides:
//! - Integer amounts and permille rates (no floating point anywhere)
//! - Nanosecond timestamps and lease identifiers
//! - Pool snapshots and share prices
//! - The lease lifecycle state machine and position records

pub mod amount;
pub mod lease_state;
pub mod percent;
pub mod pool;
pub mod position;
pub mod primitives;

pub use amount::{Amount, Permille};
pub use lease_state::{LeaseState, OpeningPhase, Regression};
pub use percent::Percent;
pub use pool::{LiquidityPoolSnapshot, PriceRatio};
pub use position::{ClosePolicy, CloseTrigger, LeaseSnapshot, Position};
pub use primitives::{LeaseId, TimeNs, NANOS_PER_YEAR};

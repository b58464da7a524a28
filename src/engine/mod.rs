//! Pure computation engine(s) for the lease verification model.
//!
//! Every function here is synchronous and deterministic given its inputs.
//! Bad input is a caller bug and comes back as a `CalcError`; nothing retries.

pub mod fixed_point;
pub mod interest;
pub mod position;
pub mod quote;
pub mod shares;
pub mod utilization;

pub use fixed_point::{mul_div, mul_div_product, multiply_then_divide, multiply_then_divide_wide};
pub use interest::{accrue, split_due_window, DueWindow, InterestPeriod};
pub use position::{
    apply_payment, classify_liquidation, ltv, position_dues, repayment_outcome, LiquidationKind,
    PaymentApplication, PositionDues, RepaymentOutcome,
};
pub use quote::{borrow_from_ltd, borrow_from_ltv, expected_borrow, ltv_to_ltd, QuoteCheck};
pub use shares::{
    expected_deposit_shares, expected_withdraw_amount, to_currency, to_shares, within_one_unit,
};
pub use utilization::{
    borrow_rate, pool_utilization, utilization, utilization_ratio, RateCurve, Utilization,
};

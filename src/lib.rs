pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{DataSourceError, MockStateSource, StateSource};
pub use domain::{
    Amount, ClosePolicy, LeaseId, LeaseSnapshot, LeaseState, LiquidityPoolSnapshot, OpeningPhase,
    Percent, Permille, Position, PriceRatio, TimeNs,
};
pub use error::{CalcError, Error};
pub use orchestration::{await_stable, watch_position, PollError, PollPolicy};

use crate::config::ConfigError;
use crate::datasource::DataSourceError;
use crate::domain::TimeNs;
use crate::orchestration::PollError;
use thiserror::Error;

/// Errors raised by the pure calculators.
///
/// These always indicate a caller bug and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid time window: to {to} is before from {from}")]
    InvalidTimeWindow { from: TimeNs, to: TimeNs },
}

impl CalcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }
}

/// Crate-level error for drivers that want a single error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_display() {
        let err = CalcError::invalid("division by zero");
        assert_eq!(err.to_string(), "Invalid input: division by zero");

        let err = CalcError::InvalidTimeWindow {
            from: TimeNs::new(20),
            to: TimeNs::new(10),
        };
        assert_eq!(
            err.to_string(),
            "Invalid time window: to 10ns is before from 20ns"
        );
    }

    #[test]
    fn test_error_from_calc() {
        let err: Error = CalcError::invalid("x").into();
        assert!(matches!(err, Error::Calc(CalcError::InvalidInput(_))));
    }
}

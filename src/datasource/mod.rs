//! Data source abstraction for polling lease and pool state from the remote system.
//!
//! Transport lives with the driver; this crate only sees the results.

use crate::domain::{LeaseId, LeaseSnapshot, LiquidityPoolSnapshot};
use async_trait::async_trait;
use std::fmt;

pub mod mock;

pub use mock::MockStateSource;

/// Source of observed remote state.
///
/// Each call is one poll. Failures are transient from the poller's point of
/// view and count against its attempt budget.
#[async_trait]
pub trait StateSource: Send + Sync + fmt::Debug {
    /// Fetch the current state of a lease.
    async fn fetch_lease(&self, lease: &LeaseId) -> Result<LeaseSnapshot, DataSourceError>;

    /// Fetch the current state of the lending pool.
    async fn fetch_pool(&self) -> Result<LiquidityPoolSnapshot, DataSourceError>;
}

/// A failed poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// The remote answered with something we could not read
    ParseError(String),
    /// The remote does not know the lease (yet)
    NotFound(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::NotFound(what) => write!(f, "Not found: {}", what),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

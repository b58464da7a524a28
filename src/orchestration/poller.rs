use crate::datasource::{DataSourceError, StateSource};
use crate::domain::{LeaseId, LeaseSnapshot, LeaseState, LiquidityPoolSnapshot, Regression};
use backoff::backoff::{Backoff, Constant};
use futures::future::join_all;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Something the poller can watch until it settles.
pub trait Observation: fmt::Debug {
    /// True once nothing is in flight (or the state is terminal).
    fn is_stable(&self) -> bool;

    /// Reject an observation that cannot follow `previous`.
    fn check_follows(&self, _previous: &Self) -> Result<(), Regression> {
        Ok(())
    }
}

impl Observation for LeaseState {
    fn is_stable(&self) -> bool {
        LeaseState::is_stable(self)
    }

    fn check_follows(&self, previous: &Self) -> Result<(), Regression> {
        LeaseState::check_follows(self, previous)
    }
}

impl Observation for LeaseSnapshot {
    fn is_stable(&self) -> bool {
        self.state.is_stable()
    }

    fn check_follows(&self, previous: &Self) -> Result<(), Regression> {
        self.state.check_follows(&previous.state)
    }
}

/// Pools have no lifecycle; any successful read is final.
impl Observation for LiquidityPoolSnapshot {
    fn is_stable(&self) -> bool {
        true
    }
}

/// Fixed-delay polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Timed out after {attempts} attempts without a stable observation")]
    Timeout {
        attempts: u32,
        last_failure: Option<DataSourceError>,
    },
    #[error("State regression: {0}")]
    Regression(Regression),
    #[error("Invalid poll policy: {0}")]
    InvalidPolicy(String),
}

/// Poll until the observation is stable or the attempt budget runs out.
///
/// Level-triggered: intermediate states may be missed, only the last one
/// matters. A failed poll counts as an attempt. Consecutive observations
/// that go backwards fail immediately.
pub async fn await_stable<S, F, Fut>(mut poll: F, policy: &PollPolicy) -> Result<S, PollError>
where
    S: Observation,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, DataSourceError>>,
{
    if policy.max_attempts == 0 {
        return Err(PollError::InvalidPolicy(
            "max_attempts must be at least 1".to_string(),
        ));
    }

    let mut schedule = Constant::new(policy.interval);
    let mut previous: Option<S> = None;
    let mut last_failure = None;

    for attempt in 1..=policy.max_attempts {
        match poll().await {
            Ok(observed) => {
                if let Some(prev) = &previous {
                    if let Err(regression) = observed.check_follows(prev) {
                        error!("Poll attempt {}: {}", attempt, regression);
                        return Err(PollError::Regression(regression));
                    }
                }
                if observed.is_stable() {
                    info!("Stable after {} attempt(s): {:?}", attempt, observed);
                    return Ok(observed);
                }
                debug!("Poll attempt {}: still in progress {:?}", attempt, observed);
                previous = Some(observed);
            }
            Err(e) => {
                warn!("Poll attempt {} failed: {}", attempt, e);
                last_failure = Some(e);
            }
        }

        if attempt < policy.max_attempts {
            if let Some(delay) = schedule.next_backoff() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    Err(PollError::Timeout {
        attempts: policy.max_attempts,
        last_failure,
    })
}

/// Watch one lease through a state source until it settles.
pub async fn watch_position(
    source: &dyn StateSource,
    lease: &LeaseId,
    policy: &PollPolicy,
) -> Result<LeaseSnapshot, PollError> {
    debug!("Watching lease {}", lease);
    await_stable(|| source.fetch_lease(lease), policy).await
}

/// Watch several leases at once. Each lease has its own budget and
/// outcome; they do not wait on each other.
pub async fn watch_positions(
    source: &dyn StateSource,
    leases: &[LeaseId],
    policy: &PollPolicy,
) -> Vec<(LeaseId, Result<LeaseSnapshot, PollError>)> {
    let watches = leases.iter().map(|lease| async move {
        let outcome = watch_position(source, lease, policy).await;
        (lease.clone(), outcome)
    });
    join_all(watches).await
}

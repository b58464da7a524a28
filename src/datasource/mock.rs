//! Mock state source for testing without network calls.

use super::{DataSourceError, StateSource};
use crate::domain::{LeaseId, LeaseSnapshot, LiquidityPoolSnapshot};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type LeaseResponse = Result<LeaseSnapshot, DataSourceError>;

/// Mock state source that replays scripted responses.
///
/// Responses for a lease are returned in order; once a script runs out its
/// last response repeats, so a settled lease keeps reporting its final state.
#[derive(Debug, Default)]
pub struct MockStateSource {
    leases: Mutex<HashMap<LeaseId, VecDeque<LeaseResponse>>>,
    pool: Option<LiquidityPoolSnapshot>,
    polls: AtomicUsize,
}

impl MockStateSource {
    /// Create a new mock state source with no scripted data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot for its lease.
    pub fn with_snapshot(self, snapshot: LeaseSnapshot) -> Self {
        let lease = snapshot.lease.clone();
        self.with_response(lease, Ok(snapshot))
    }

    /// Queue a failed poll for a lease.
    pub fn with_failure(self, lease: LeaseId, error: DataSourceError) -> Self {
        self.with_response(lease, Err(error))
    }

    fn with_response(self, lease: LeaseId, response: LeaseResponse) -> Self {
        if let Ok(mut leases) = self.leases.lock() {
            leases.entry(lease).or_default().push_back(response);
        }
        self
    }

    /// Set the pool snapshot returned by fetch_pool.
    pub fn with_pool(mut self, pool: LiquidityPoolSnapshot) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Number of fetch_lease calls served so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateSource for MockStateSource {
    async fn fetch_lease(&self, lease: &LeaseId) -> Result<LeaseSnapshot, DataSourceError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut leases = self
            .leases
            .lock()
            .map_err(|_| DataSourceError::Other("mock state poisoned".to_string()))?;
        let script = leases
            .get_mut(lease)
            .ok_or_else(|| DataSourceError::NotFound(lease.to_string()))?;

        match script.len() {
            0 => Err(DataSourceError::NotFound(lease.to_string())),
            1 => script
                .front()
                .cloned()
                .unwrap_or_else(|| Err(DataSourceError::NotFound(lease.to_string()))),
            _ => script
                .pop_front()
                .unwrap_or_else(|| Err(DataSourceError::NotFound(lease.to_string()))),
        }
    }

    async fn fetch_pool(&self) -> Result<LiquidityPoolSnapshot, DataSourceError> {
        self.pool
            .ok_or_else(|| DataSourceError::NotFound("pool".to_string()))
    }
}

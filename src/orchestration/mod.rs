//! Async coordination around the pure engine: polling remote state until it settles.

pub mod poller;

pub use poller::{
    await_stable, watch_position, watch_positions, Observation, PollError, PollPolicy,
};

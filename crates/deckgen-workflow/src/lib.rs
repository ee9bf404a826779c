//! Generation workflow: the status poller and the orchestrating state machine.
//!
//! The workflow is strictly sequential (issue upload URL, PUT the bytes,
//! poll until the deck is complete) with exactly one attempt in flight per
//! [`Generator`]. All waiting happens behind a cancellation token so that
//! teardown stops the polling instead of leaking a background loop.

pub mod api;
pub mod generator;
pub mod poller;

pub use api::GenerationApi;
pub use generator::{GenerationState, Generator};
pub use poller::{poll_until_complete, PollConfig};

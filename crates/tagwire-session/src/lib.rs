//! Tagwire session runner.
//!
//! Production "glue" around [`tagwire_core`]: the roles are pure state
//! machines, this crate supplies the pieces the core treats as external.
//!
//! # Components
//!
//! - [`Network`] / [`Link`]: in-memory, ordered, point-to-point transport
//!   between named peers (tokio unbounded queues)
//! - [`TamperingChannel`]: wrapper that corrupts chosen frames in flight
//! - [`run_session`]: wires two peers together, runs both roles concurrently,
//!   and collects a [`SessionReport`]
//! - [`random_key`]: fresh shared key from the OS RNG
//!
//! Key distribution is out of scope: the same [`tagwire_core::SharedKey`] is
//! handed to both roles directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod network;
mod session;
mod tamper;

pub use error::SessionError;
pub use network::{Link, Network};
pub use session::{DEFAULT_MESSAGES, SessionConfig, SessionReport, random_key, run_session};
pub use tamper::{Alteration, CorruptionPlan, FrameKind, TamperingChannel};

//! Transport abstraction consumed by the roles.
//!
//! The core never moves bytes itself. A [`Channel`] is an ordered,
//! point-to-point byte transport between named peers: `send` enqueues without
//! blocking, `receive` suspends until the named peer's next frame arrives.
//!
//! # Ordering
//!
//! Implementations MUST deliver frames FIFO per directed peer pair and MUST
//! NOT interleave foreign traffic on that stream. A message and its tag are
//! two consecutive frames with no framing that would let the receiver pair
//! them up after reordering.

use std::{fmt, future::Future};

use thiserror::Error;

/// Name of a peer on the channel (e.g. `"alice"`, `"bob"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer id from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Peer name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Transport failures and malformed frames.
///
/// Every variant is terminal for the role that observed it: the protocol has
/// no retry or resynchronization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// No link to the named peer exists
    #[error("unknown peer: {peer}")]
    UnknownPeer {
        /// Peer that was addressed
        peer: PeerId,
    },

    /// The peer's end of the link was dropped
    #[error("channel to {peer} closed")]
    Closed {
        /// Peer whose link closed
        peer: PeerId,
    },

    /// Tag frame had the wrong length
    #[error("malformed tag: expected {expected} bytes, got {actual}")]
    MalformedTag {
        /// Expected tag length
        expected: usize,
        /// Received frame length
        actual: usize,
    },

    /// Acknowledgment frame was neither known status
    #[error("malformed acknowledgment ({len} bytes)")]
    MalformedAck {
        /// Received frame length
        len: usize,
    },
}

/// Ordered, blocking, point-to-point byte transport.
pub trait Channel: Send {
    /// Name of this endpoint.
    fn local_id(&self) -> &PeerId;

    /// Enqueue `bytes` for `peer`. Does not wait for the peer to receive.
    fn send(&mut self, peer: &PeerId, bytes: Vec<u8>) -> Result<(), ChannelError>;

    /// Wait for the next frame from `peer`.
    ///
    /// Suspends indefinitely if the peer never sends; there is no timeout.
    fn receive(
        &mut self,
        peer: &PeerId,
    ) -> impl Future<Output = Result<Vec<u8>, ChannelError>> + Send;
}

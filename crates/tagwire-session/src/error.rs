//! Session error types.

use tagwire_core::{ChannelError, PeerId, RoleError, TagError};
use thiserror::Error;

/// Errors that end a session.
///
/// Corrupted messages never appear here; they are part of the
/// [`crate::SessionReport`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Key material or algorithm configuration was rejected.
    ///
    /// Surfaced before any message is processed. Fix configuration and
    /// restart.
    #[error(transparent)]
    Config(#[from] TagError),

    /// The OS random number generator could not produce a key.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A peer name was registered twice on the network.
    #[error("duplicate peer: {0}")]
    DuplicatePeer(PeerId),

    /// A peer name was used before being registered on the network.
    #[error("unknown peer: {0}")]
    UnknownPeer(PeerId),

    /// A role stopped before reaching its terminal state.
    ///
    /// Fatal for the whole session: there is no retry or resynchronization.
    #[error("{peer} failed: {source}")]
    Role {
        /// Peer whose role failed
        peer: PeerId,
        /// Underlying failure
        #[source]
        source: RoleError,
    },

    /// A role task panicked or was cancelled.
    ///
    /// Should never happen in a correct implementation.
    #[error("{peer} task aborted: {reason}")]
    Task {
        /// Peer whose task aborted
        peer: PeerId,
        /// Join error description
        reason: String,
    },
}

impl SessionError {
    /// Returns true if the session failed because of key material.
    pub fn is_key_error(&self) -> bool {
        match self {
            Self::Config(err) => err.is_key_error(),
            Self::KeyGeneration(_) => true,
            _ => false,
        }
    }

    /// Returns true if the configured tag algorithm is unavailable.
    pub fn is_algorithm_error(&self) -> bool {
        matches!(self, Self::Config(TagError::UnsupportedAlgorithm { .. }))
    }

    /// Channel failure behind this error, if any.
    pub fn channel_error(&self) -> Option<&ChannelError> {
        match self {
            Self::Role { source: RoleError::Channel(err), .. } => Some(err),
            _ => None,
        }
    }

    /// Returns true if this is only the echo of the other peer going away.
    ///
    /// When one role fails, its link is dropped and the other role sees
    /// [`ChannelError::Closed`]. The first error is the one worth reporting.
    pub(crate) fn is_peer_closed(&self) -> bool {
        matches!(self.channel_error(), Some(ChannelError::Closed { .. }))
    }
}

//! Error types for the sender and receiver roles.

use thiserror::Error;

use crate::channel::ChannelError;

/// Errors that stop a role.
///
/// Tag mismatches never show up here; they become
/// [`crate::Acknowledgment::Corrupted`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// Operation not allowed in the current state
    #[error("invalid state transition: cannot {operation} in state {state}")]
    InvalidState {
        /// State the role was in
        state: &'static str,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Transport failure or malformed frame
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl RoleError {
    /// Returns true if the failure came from the transport rather than from
    /// driving the state machine out of order.
    pub fn is_channel(&self) -> bool {
        matches!(self, Self::Channel(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PeerId;

    #[test]
    fn channel_errors_are_transparent() {
        let err = RoleError::from(ChannelError::Closed { peer: PeerId::new("alice") });
        assert!(err.is_channel());
        assert_eq!(err.to_string(), "channel to alice closed");
    }

    #[test]
    fn invalid_state_display() {
        let err = RoleError::InvalidState { state: "Done", operation: "handle frame" };
        assert!(!err.is_channel());
        assert_eq!(err.to_string(), "invalid state transition: cannot handle frame in state Done");
    }
}

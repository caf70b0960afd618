//! Common capability of the two peers.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::{
    ack::Acknowledgment,
    channel::{Channel, ChannelError, PeerId},
    error::RoleError,
    receiver::Delivery,
};

/// Actions returned by the role state machines.
///
/// The driver executes these:
/// - `Send`: enqueue the bytes to the peer
/// - `Deliver`: surface a verified (or corrupted) message to the application
/// - `Acknowledged`: surface the peer's status for a sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleAction {
    /// Send this frame to the peer
    Send(Vec<u8>),

    /// Receiver finished verifying a message
    Deliver(Delivery),

    /// Sender observed the peer's acknowledgment
    Acknowledged {
        /// Position of the message in the exchange
        index: usize,
        /// Status reported by the peer
        acknowledgment: Acknowledgment,
    },
}

/// A peer in the exchange, runnable over any [`Channel`].
pub trait Role {
    /// What the role reports once it reaches its terminal state.
    type Report;

    /// Drive the role to completion.
    fn run<C: Channel>(
        self,
        channel: &mut C,
    ) -> impl Future<Output = Result<Self::Report, RoleError>> + Send;
}

/// Execute `actions` against `channel`, addressed to `peer`.
pub(crate) fn dispatch<C: Channel>(
    channel: &mut C,
    peer: &PeerId,
    actions: Vec<RoleAction>,
) -> Result<(), ChannelError> {
    for action in actions {
        match action {
            RoleAction::Send(bytes) => {
                debug!(from = %channel.local_id(), to = %peer, len = bytes.len(), "send frame");
                channel.send(peer, bytes)?;
            },
            RoleAction::Deliver(delivery) => {
                let me = channel.local_id();
                if delivery.acknowledgment.is_intact() {
                    info!(
                        index = delivery.index,
                        "{me} received: {}",
                        String::from_utf8_lossy(&delivery.message)
                    );
                } else {
                    warn!(index = delivery.index, "{me}: {}", delivery.acknowledgment);
                }
            },
            RoleAction::Acknowledged { index, acknowledgment } => {
                info!(index, "{} received: {acknowledgment}", channel.local_id());
            },
        }
    }
    Ok(())
}

//! Receiver role state machine.
//!
//! Expects a fixed number of (message, tag) pairs. For each pair it
//! recomputes the tag, compares in constant time, and answers with an
//! acknowledgment. A corrupted pair is reported, not rejected: the receiver
//! moves on to the next one.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────────────┐  message  ┌─────────────┐  tag (last pair)  ┌──────┐
//! │ AwaitingMessage │──────────>│ AwaitingTag │──────────────────>│ Done │
//! └─────────────────┘           └─────────────┘                   └──────┘
//!          ^                           │
//!          └───────────────────────────┘
//!              tag, more pairs expected
//! ```
//!
//! The receiver never asks the channel for more frames than it expects, and
//! a tag is only ever checked against the message received just before it.

use tagwire_crypto::{SharedKey, TagAlgorithm, Tagger};
use tracing::debug;

use crate::{
    ack::Acknowledgment,
    channel::{Channel, ChannelError, PeerId},
    error::RoleError,
    role::{Role, RoleAction, dispatch},
};

/// Receiver state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverState {
    /// Waiting for the next message frame
    AwaitingMessage,
    /// Message received, waiting for its tag
    AwaitingTag {
        /// Message the next tag belongs to
        message: Vec<u8>,
    },
    /// All expected pairs were processed
    Done,
}

impl ReceiverState {
    fn name(&self) -> &'static str {
        match self {
            Self::AwaitingMessage => "AwaitingMessage",
            Self::AwaitingTag { .. } => "AwaitingTag",
            Self::Done => "Done",
        }
    }
}

/// One verified message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Position in the exchange
    pub index: usize,
    /// Verification outcome sent back to the peer
    pub acknowledgment: Acknowledgment,
    /// Message bytes as received (untrusted if corrupted)
    pub message: Vec<u8>,
}

/// Result of a completed receiver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverReport {
    /// One delivery per expected message, in arrival order
    pub deliveries: Vec<Delivery>,
}

impl ReceiverReport {
    /// Messages whose tag verified.
    pub fn intact_messages(&self) -> impl Iterator<Item = &[u8]> {
        self.deliveries
            .iter()
            .filter(|d| d.acknowledgment.is_intact())
            .map(|d| d.message.as_slice())
    }
}

/// Receiver state machine.
///
/// Pure: no I/O. [`Role::run`] drives it over a [`Channel`].
#[derive(Debug)]
pub struct Receiver {
    peer: PeerId,
    tagger: Tagger,
    expected: usize,
    state: ReceiverState,
    deliveries: Vec<Delivery>,
}

impl Receiver {
    /// Create a receiver expecting `expected` messages from `peer`.
    ///
    /// Zero expected messages starts in [`ReceiverState::Done`].
    pub fn new(peer: PeerId, key: SharedKey, expected: usize) -> Self {
        let state =
            if expected == 0 { ReceiverState::Done } else { ReceiverState::AwaitingMessage };
        Self {
            peer,
            tagger: Tagger::new(TagAlgorithm::default(), key),
            expected,
            state,
            deliveries: Vec::with_capacity(expected),
        }
    }

    /// Use `algorithm` instead of the default for verification.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: TagAlgorithm) -> Self {
        self.tagger = Tagger::new(algorithm, self.tagger.key().clone());
        self
    }

    /// Current state.
    pub fn state(&self) -> &ReceiverState {
        &self.state
    }

    /// Whether every expected pair has been processed.
    pub fn is_done(&self) -> bool {
        self.state == ReceiverState::Done
    }

    /// Deliveries so far, in arrival order.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Process the next frame from the peer.
    ///
    /// A message frame only advances state. A tag frame completes the pair:
    /// the returned actions are the acknowledgment to send and the delivery.
    ///
    /// # Errors
    ///
    /// - `RoleError::InvalidState` once all expected pairs were processed
    /// - `ChannelError::MalformedTag` if a tag frame is not exactly the
    ///   algorithm's tag size
    pub fn handle_frame(&mut self, frame: Vec<u8>) -> Result<Vec<RoleAction>, RoleError> {
        match std::mem::replace(&mut self.state, ReceiverState::Done) {
            ReceiverState::Done => Err(RoleError::InvalidState {
                state: ReceiverState::Done.name(),
                operation: "handle frame",
            }),
            ReceiverState::AwaitingMessage => {
                debug!(
                    peer = %self.peer,
                    index = self.deliveries.len(),
                    len = frame.len(),
                    "message received"
                );
                self.state = ReceiverState::AwaitingTag { message: frame };
                Ok(Vec::new())
            },
            ReceiverState::AwaitingTag { message } => {
                let tag_size = self.tagger.algorithm().tag_size();
                if frame.len() != tag_size {
                    return Err(
                        ChannelError::MalformedTag { expected: tag_size, actual: frame.len() }
                            .into(),
                    );
                }

                let verdict = self.tagger.verify(&message, &frame);
                let acknowledgment = Acknowledgment::from(verdict);
                let delivery = Delivery { index: self.deliveries.len(), acknowledgment, message };
                self.deliveries.push(delivery.clone());

                self.state = if self.deliveries.len() == self.expected {
                    ReceiverState::Done
                } else {
                    ReceiverState::AwaitingMessage
                };

                Ok(vec![RoleAction::Send(acknowledgment.to_bytes()), RoleAction::Deliver(delivery)])
            },
        }
    }

    /// Final report. Meaningful once [`Self::is_done`].
    pub fn into_report(self) -> ReceiverReport {
        ReceiverReport { deliveries: self.deliveries }
    }
}

impl Role for Receiver {
    type Report = ReceiverReport;

    async fn run<C: Channel>(mut self, channel: &mut C) -> Result<ReceiverReport, RoleError> {
        while !self.is_done() {
            let frame = channel.receive(&self.peer).await?;
            let actions = self.handle_frame(frame)?;
            dispatch(channel, &self.peer, actions)?;
        }
        Ok(self.into_report())
    }
}

//! Sender role state machine.
//!
//! Walks an ordered list of messages. Each message is tagged, sent as two
//! frames (message, then tag), and the sender blocks on the peer's
//! acknowledgment before moving to the next one. A corrupted acknowledgment
//! is recorded and the exchange continues; there are no retries.
//!
//! # State Machine
//!
//! ```text
//! ┌───────┐ poll_transmit ┌─────────────┐ handle_frame(ack) ┌──────┐
//! │ Ready │──────────────>│ AwaitingAck │──────────────────>│ Done │
//! └───────┘               └─────────────┘  (last message)   └──────┘
//!     ^                          │
//!     └──────────────────────────┘
//!        handle_frame(ack), more messages left
//! ```

use tagwire_crypto::{SharedKey, TagAlgorithm, Tagger};
use tracing::debug;

use crate::{
    ack::Acknowledgment,
    channel::{Channel, ChannelError, PeerId},
    error::RoleError,
    role::{Role, RoleAction, dispatch},
};

/// Sender state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    /// Next message can be transmitted
    Ready,
    /// Message and tag sent, waiting for the peer's acknowledgment
    AwaitingAck {
        /// Position of the in-flight message
        index: usize,
    },
    /// Every message was sent and acknowledged
    Done,
}

impl SenderState {
    fn name(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::AwaitingAck { .. } => "AwaitingAck",
            Self::Done => "Done",
        }
    }
}

/// Result of a completed sender run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderReport {
    /// One acknowledgment per message, in send order
    pub acknowledgments: Vec<Acknowledgment>,
}

impl SenderReport {
    /// Indices of messages the peer reported as corrupted.
    pub fn corrupted_indices(&self) -> Vec<usize> {
        self.acknowledgments
            .iter()
            .enumerate()
            .filter(|(_, ack)| !ack.is_intact())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Sender state machine.
///
/// Pure: no I/O. [`Role::run`] drives it over a [`Channel`].
#[derive(Debug)]
pub struct Sender {
    peer: PeerId,
    tagger: Tagger,
    messages: Vec<Vec<u8>>,
    state: SenderState,
    acknowledgments: Vec<Acknowledgment>,
}

impl Sender {
    /// Create a sender that will deliver `messages`, in order, to `peer`.
    ///
    /// An empty message list starts in [`SenderState::Done`].
    pub fn new<I, M>(peer: PeerId, key: SharedKey, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Vec<u8>>,
    {
        let messages: Vec<Vec<u8>> = messages.into_iter().map(Into::into).collect();
        let state = if messages.is_empty() { SenderState::Done } else { SenderState::Ready };
        Self {
            peer,
            tagger: Tagger::new(TagAlgorithm::default(), key),
            messages,
            state,
            acknowledgments: Vec::new(),
        }
    }

    /// Use `algorithm` instead of the default for tagging.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: TagAlgorithm) -> Self {
        self.tagger = Tagger::new(algorithm, self.tagger.key().clone());
        self
    }

    /// Current state.
    pub fn state(&self) -> SenderState {
        self.state
    }

    /// Whether every message has been acknowledged.
    pub fn is_done(&self) -> bool {
        self.state == SenderState::Done
    }

    /// Acknowledgments observed so far, in send order.
    pub fn acknowledgments(&self) -> &[Acknowledgment] {
        &self.acknowledgments
    }

    /// Tag the next message and emit its two frames.
    ///
    /// Returns no actions once the exchange is done.
    ///
    /// # Errors
    ///
    /// - `RoleError::InvalidState` while an acknowledgment is outstanding
    pub fn poll_transmit(&mut self) -> Result<Vec<RoleAction>, RoleError> {
        match self.state {
            SenderState::Done => Ok(Vec::new()),
            SenderState::AwaitingAck { .. } => Err(self.invalid("transmit")),
            SenderState::Ready => {
                let index = self.acknowledgments.len();
                let Some(message) = self.messages.get(index) else {
                    unreachable!("Ready implies an unsent message remains");
                };

                let tag = self.tagger.compute(message);
                self.state = SenderState::AwaitingAck { index };
                debug!(peer = %self.peer, index, "transmitting message");

                Ok(vec![RoleAction::Send(message.clone()), RoleAction::Send(tag.to_vec())])
            },
        }
    }

    /// Process the peer's acknowledgment for the in-flight message.
    ///
    /// # Errors
    ///
    /// - `RoleError::InvalidState` if no message is in flight
    /// - `ChannelError::MalformedAck` if the frame is not a known status
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Vec<RoleAction>, RoleError> {
        let SenderState::AwaitingAck { index } = self.state else {
            return Err(self.invalid("handle acknowledgment"));
        };

        let acknowledgment = Acknowledgment::from_bytes(frame)
            .ok_or(ChannelError::MalformedAck { len: frame.len() })?;

        self.acknowledgments.push(acknowledgment);
        self.state = if self.acknowledgments.len() == self.messages.len() {
            SenderState::Done
        } else {
            SenderState::Ready
        };

        Ok(vec![RoleAction::Acknowledged { index, acknowledgment }])
    }

    /// Final report. Meaningful once [`Self::is_done`].
    pub fn into_report(self) -> SenderReport {
        SenderReport { acknowledgments: self.acknowledgments }
    }

    fn invalid(&self, operation: &'static str) -> RoleError {
        RoleError::InvalidState { state: self.state.name(), operation }
    }
}

impl Role for Sender {
    type Report = SenderReport;

    async fn run<C: Channel>(mut self, channel: &mut C) -> Result<SenderReport, RoleError> {
        while !self.is_done() {
            let actions = self.poll_transmit()?;
            dispatch(channel, &self.peer, actions)?;

            let frame = channel.receive(&self.peer).await?;
            let actions = self.handle_frame(&frame)?;
            dispatch(channel, &self.peer, actions)?;
        }
        Ok(self.into_report())
    }
}

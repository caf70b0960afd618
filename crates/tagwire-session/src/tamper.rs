//! Fault-injecting channel wrapper for corruption testing
//!
//! Wraps the sender's endpoint and alters chosen outbound frames, simulating
//! an attacker or a noisy link between the peers. A flipped bit keeps the
//! frame length and shows up as a corrupted message; a truncated tag frame
//! is malformed and stops the receiver. The sender
//! emits frames in (message, tag) pairs, so frame `2n` is message `n` and
//! frame `2n + 1` is its tag.

use std::{collections::BTreeSet, future::Future};

use tagwire_core::{Channel, ChannelError, PeerId};
use tracing::warn;

/// Which frame of a (message, tag) pair to alter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameKind {
    /// The message bytes
    #[default]
    Message,
    /// The tag bytes
    Tag,
}

/// How a targeted frame is altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alteration {
    /// Flip this bit, taken modulo the frame's bit length
    FlipBit(usize),
    /// Drop the last byte of the frame
    Truncate,
}

impl Default for Alteration {
    fn default() -> Self {
        Self::FlipBit(0)
    }
}

/// Which messages to corrupt in flight, and how.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorruptionPlan {
    /// Zero-based message indices to corrupt
    pub targets: BTreeSet<usize>,
    /// Frame of the pair to alter
    pub frame: FrameKind,
    /// What happens to the frame
    pub alteration: Alteration,
}

impl CorruptionPlan {
    /// Plan that corrupts nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Corrupt the message frame of each index in `targets`.
    pub fn messages(targets: impl IntoIterator<Item = usize>) -> Self {
        Self { targets: targets.into_iter().collect(), ..Self::default() }
    }

    /// Alter `frame` instead of the message.
    #[must_use]
    pub fn on(mut self, frame: FrameKind) -> Self {
        self.frame = frame;
        self
    }

    /// Apply `alteration` instead of flipping the first bit.
    #[must_use]
    pub fn altering(mut self, alteration: Alteration) -> Self {
        self.alteration = alteration;
        self
    }

    /// Whether the plan alters anything at all.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Whether outbound frame number `position` should be altered.
    fn applies_to(&self, position: usize) -> bool {
        let kind = if position.is_multiple_of(2) { FrameKind::Message } else { FrameKind::Tag };
        kind == self.frame && self.targets.contains(&(position / 2))
    }
}

/// Channel wrapper that corrupts outbound frames according to a
/// [`CorruptionPlan`]. Inbound frames pass through untouched.
#[derive(Debug)]
pub struct TamperingChannel<C: Channel> {
    inner: C,
    plan: CorruptionPlan,
    /// Outbound frames seen so far
    sent: usize,
}

impl<C: Channel> TamperingChannel<C> {
    /// Wrap `inner` with `plan`.
    pub fn new(inner: C, plan: CorruptionPlan) -> Self {
        Self { inner, plan, sent: 0 }
    }

    /// Number of frames sent through the wrapper.
    pub fn frames_sent(&self) -> usize {
        self.sent
    }
}

impl<C: Channel> Channel for TamperingChannel<C> {
    fn local_id(&self) -> &PeerId {
        self.inner.local_id()
    }

    fn send(&mut self, peer: &PeerId, mut bytes: Vec<u8>) -> Result<(), ChannelError> {
        let position = self.sent;
        self.sent += 1;

        if self.plan.applies_to(position) {
            warn!(
                position,
                message = position / 2,
                frame = ?self.plan.frame,
                alteration = ?self.plan.alteration,
                "tampering with frame"
            );
            match self.plan.alteration {
                Alteration::FlipBit(bit) => flip_bit(&mut bytes, bit),
                Alteration::Truncate => {
                    bytes.pop();
                },
            }
        }

        self.inner.send(peer, bytes)
    }

    fn receive(
        &mut self,
        peer: &PeerId,
    ) -> impl Future<Output = Result<Vec<u8>, ChannelError>> + Send {
        self.inner.receive(peer)
    }
}

/// Flip `bit` (modulo the frame's length in bits). An empty frame gains a
/// single byte instead, since it has no bit to flip.
fn flip_bit(bytes: &mut Vec<u8>, bit: usize) {
    if bytes.is_empty() {
        bytes.push(0x01);
        return;
    }
    let bit = bit % (bytes.len() * 8);
    bytes[bit / 8] ^= 1 << (bit % 8);
}

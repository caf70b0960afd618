//! Tagwire protocol core.
//!
//! Two peers that already share a secret key exchange a fixed number of
//! messages. Every message is followed by its HMAC tag; the receiver verifies
//! the pair and answers with an [`Acknowledgment`] before the sender moves on.
//!
//! ```text
//!   Sender                         Receiver
//!     │── message bytes ──────────────>│
//!     │── tag bytes ──────────────────>│  verify(message, tag)
//!     │<──────────── "Message is intact" / "Message is corrupted"
//!     │          (repeat per message)  │
//! ```
//!
//! # Architecture
//!
//! Both roles are Sans-IO state machines. [`Sender`] and [`Receiver`] take
//! frames as input and return [`RoleAction`]s for the caller to execute. The
//! [`Role::run`] drivers execute those actions over any [`Channel`], so the
//! same logic runs over an in-memory queue in tests and a real transport in
//! production.
//!
//! A corrupted message is not an error: it is reported through an
//! acknowledgment and the exchange continues. Only infrastructure failures
//! ([`ChannelError`], [`RoleError::InvalidState`]) stop a role.
//!
//! # Channel Requirements
//!
//! The message and its tag travel as two separate, unframed sends. The
//! channel must deliver them to the same receiver, in order, with no other
//! traffic interleaved on that directed stream. The protocol cannot recover
//! from reordering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ack;
pub mod channel;
mod error;
pub mod receiver;
mod role;
pub mod sender;

pub use ack::Acknowledgment;
pub use channel::{Channel, ChannelError, PeerId};
pub use error::RoleError;
pub use receiver::{Delivery, Receiver, ReceiverReport, ReceiverState};
pub use role::{Role, RoleAction};
pub use sender::{Sender, SenderReport, SenderState};
pub use tagwire_crypto::{SharedKey, TagAlgorithm, TagError};

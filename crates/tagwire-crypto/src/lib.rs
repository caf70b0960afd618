//! Tagwire Cryptographic Primitives
//!
//! Keyed message authentication for the Tagwire exchange. Pure functions with
//! deterministic outputs: the same key and message always produce the same
//! tag, and verification never depends on any state beyond the key.
//!
//! # Tag Lifecycle
//!
//! ```text
//! SharedKey (pre-shared, 32 bytes)
//!        │
//!        ▼
//! HMAC-SHA256(key, message) → Tag (32 bytes)
//!        │
//!        ▼
//! Constant-time compare with received tag → Verdict
//! ```
//!
//! # Security
//!
//! Integrity:
//! - Any change to the message or tag bytes yields [`Verdict::Corrupted`]
//! - Forging a tag without the key is as hard as breaking HMAC-SHA256
//!
//! Timing:
//! - Verification compares tags in constant time, so an observer cannot learn
//!   how many leading tag bytes were correct
//!
//! Key hygiene:
//! - [`SharedKey`] is zeroized on drop and never printed by `Debug`
//!
//! Confidentiality is out of scope: messages travel in the clear.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod key;
pub mod tagger;

pub use error::TagError;
pub use key::{KEY_SIZE, SharedKey};
pub use tagger::{TAG_SIZE, Tag, TagAlgorithm, Tagger, Verdict, compute_tag, verify_tag};

//! Tag computation and verification using HMAC-SHA256
//!
//! # Security Properties
//!
//! - Determinism: same key and message always produce the same tag
//! - Tamper detection: any altered message or tag byte is reported corrupted
//! - Constant-time comparison: verification time does not depend on where the
//!   first differing byte sits

use std::{fmt, str::FromStr};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{error::TagError, key::SharedKey};

type HmacSha256 = Hmac<Sha256>;

/// Size of an authentication tag (HMAC-SHA256 output).
pub const TAG_SIZE: usize = 32;

/// Authentication tag for a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }

    /// Copy the tag into an owned buffer for transmission.
    pub fn to_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Outcome of verifying a received tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Recomputed tag matches the received tag
    Intact,
    /// Length or byte mismatch between recomputed and received tag
    Corrupted,
}

impl Verdict {
    /// True for [`Verdict::Intact`].
    pub fn is_intact(self) -> bool {
        matches!(self, Self::Intact)
    }
}

/// Compute the HMAC-SHA256 tag of `message` under `key`.
pub fn compute_tag(key: &SharedKey, message: &[u8]) -> Tag {
    let mut mac = keyed_mac(key);
    mac.update(message);
    let result = mac.finalize().into_bytes();

    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&result);
    Tag(tag)
}

/// Verify `candidate` against the tag of `message` under `key`.
///
/// Never fails on malformed input: a candidate of the wrong length or with
/// any differing byte is [`Verdict::Corrupted`].
pub fn verify_tag(key: &SharedKey, message: &[u8], candidate: &[u8]) -> Verdict {
    let mut mac = keyed_mac(key);
    mac.update(message);

    // `verify_slice` checks the length and compares in constant time
    match mac.verify_slice(candidate) {
        Ok(()) => Verdict::Intact,
        Err(_) => Verdict::Corrupted,
    }
}

fn keyed_mac(key: &SharedKey) -> HmacSha256 {
    let Ok(mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac
}

/// Keyed-hash primitive used for tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagAlgorithm {
    /// HMAC with SHA-256, 32-byte tags
    #[default]
    HmacSha256,
}

impl TagAlgorithm {
    /// Canonical algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            Self::HmacSha256 => "HmacSHA256",
        }
    }

    /// Tag size produced by this algorithm.
    pub fn tag_size(self) -> usize {
        match self {
            Self::HmacSha256 => TAG_SIZE,
        }
    }
}

impl fmt::Display for TagAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagAlgorithm {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| !matches!(c, '-' | '_')).collect::<String>().to_ascii_lowercase();
        match normalized.as_str() {
            "hmacsha256" => Ok(Self::HmacSha256),
            _ => Err(TagError::UnsupportedAlgorithm { name: s.to_string() }),
        }
    }
}

/// Key bound to an algorithm. Held by each role for the whole exchange.
#[derive(Debug, Clone)]
pub struct Tagger {
    algorithm: TagAlgorithm,
    key: SharedKey,
}

impl Tagger {
    /// Create a tagger for `key` using `algorithm`.
    pub fn new(algorithm: TagAlgorithm, key: SharedKey) -> Self {
        Self { algorithm, key }
    }

    /// Configured algorithm.
    pub fn algorithm(&self) -> TagAlgorithm {
        self.algorithm
    }

    /// Key used for tagging.
    pub fn key(&self) -> &SharedKey {
        &self.key
    }

    /// Tag `message`.
    pub fn compute(&self, message: &[u8]) -> Tag {
        match self.algorithm {
            TagAlgorithm::HmacSha256 => compute_tag(&self.key, message),
        }
    }

    /// Verify `candidate` against `message`.
    pub fn verify(&self, message: &[u8], candidate: &[u8]) -> Verdict {
        match self.algorithm {
            TagAlgorithm::HmacSha256 => verify_tag(&self.key, message, candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SharedKey {
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        SharedKey::from_bytes(bytes)
    }

    #[test]
    fn tag_is_32_bytes() {
        let tag = compute_tag(&test_key(), b"hello");
        assert_eq!(tag.as_bytes().len(), TAG_SIZE);
    }

    #[test]
    fn compute_is_deterministic() {
        let key = test_key();
        assert_eq!(compute_tag(&key, b"message"), compute_tag(&key, b"message"));
    }

    #[test]
    fn different_messages_produce_different_tags() {
        let key = test_key();
        assert_ne!(compute_tag(&key, b"message 1"), compute_tag(&key, b"message 2"));
    }

    #[test]
    fn different_keys_produce_different_tags() {
        let other = SharedKey::from_bytes([0xFF; 32]);
        assert_ne!(compute_tag(&test_key(), b"same"), compute_tag(&other, b"same"));
    }

    #[test]
    fn empty_message_has_a_tag() {
        let key = test_key();
        let tag = compute_tag(&key, b"");
        assert_eq!(verify_tag(&key, b"", tag.as_bytes()), Verdict::Intact);
    }

    #[test]
    fn verify_accepts_matching_tag() {
        let key = test_key();
        let tag = compute_tag(&key, b"payload");
        assert_eq!(verify_tag(&key, b"payload", tag.as_bytes()), Verdict::Intact);
    }

    #[test]
    fn verify_rejects_truncated_tag() {
        let key = test_key();
        let tag = compute_tag(&key, b"payload");
        assert_eq!(verify_tag(&key, b"payload", &tag.as_bytes()[..31]), Verdict::Corrupted);
    }

    #[test]
    fn verify_rejects_extended_tag() {
        let key = test_key();
        let mut candidate = compute_tag(&key, b"payload").to_vec();
        candidate.push(0);
        assert_eq!(verify_tag(&key, b"payload", &candidate), Verdict::Corrupted);
    }

    #[test]
    fn verify_rejects_empty_tag() {
        assert_eq!(verify_tag(&test_key(), b"payload", &[]), Verdict::Corrupted);
    }

    #[test]
    fn algorithm_parses_known_names() {
        assert_eq!("HmacSHA256".parse::<TagAlgorithm>(), Ok(TagAlgorithm::HmacSha256));
        assert_eq!("hmac-sha256".parse::<TagAlgorithm>(), Ok(TagAlgorithm::HmacSha256));
        assert_eq!("HMAC_SHA256".parse::<TagAlgorithm>(), Ok(TagAlgorithm::HmacSha256));
    }

    #[test]
    fn algorithm_rejects_unknown_names() {
        let result = "HmacMD5".parse::<TagAlgorithm>();
        assert_eq!(result, Err(TagError::UnsupportedAlgorithm { name: "HmacMD5".to_string() }));
    }

    #[test]
    fn algorithm_display_matches_name() {
        assert_eq!(TagAlgorithm::HmacSha256.to_string(), "HmacSHA256");
        assert_eq!(TagAlgorithm::HmacSha256.tag_size(), TAG_SIZE);
    }

    #[test]
    fn tagger_matches_free_functions() {
        let key = test_key();
        let tagger = Tagger::new(TagAlgorithm::HmacSha256, key.clone());
        assert_eq!(tagger.algorithm(), TagAlgorithm::HmacSha256);
        let tag = tagger.compute(b"abc");
        assert_eq!(tag, compute_tag(&key, b"abc"));
        assert!(tagger.verify(b"abc", tag.as_bytes()).is_intact());
        assert!(!tagger.verify(b"abd", tag.as_bytes()).is_intact());
    }
}

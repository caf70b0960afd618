//! Error types for key handling and algorithm selection

use thiserror::Error;

/// Errors from key material or algorithm configuration.
///
/// A tag that fails verification is not an error: it is reported as
/// [`crate::Verdict::Corrupted`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Invalid key material length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Key material could not be decoded
    #[error("invalid key encoding: {reason}")]
    InvalidKeyEncoding {
        /// Why decoding failed
        reason: String,
    },

    /// The requested keyed-hash primitive is not available
    #[error("unsupported tag algorithm: {name}")]
    UnsupportedAlgorithm {
        /// Algorithm name as configured
        name: String,
    },
}

impl TagError {
    /// Returns true if this error concerns the key material itself.
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::InvalidKeyLength { .. } | Self::InvalidKeyEncoding { .. })
    }
}

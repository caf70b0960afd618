//! Pre-shared key material

use std::fmt;

use zeroize::Zeroize;

use crate::error::TagError;

/// Size of the shared key in bytes (matches the HMAC-SHA256 block output).
pub const KEY_SIZE: usize = 32;

/// Secret key known to both peers before the exchange starts.
///
/// Never transmitted and never mutated after construction, so roles can each
/// hold a clone and read it concurrently. Key bytes are zeroized on drop.
///
/// No `PartialEq`: key bytes are never compared in variable time.
#[derive(Clone)]
pub struct SharedKey {
    bytes: [u8; KEY_SIZE],
}

impl SharedKey {
    /// Wrap 32 bytes of key material.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a key from a slice, rejecting anything that isn't exactly
    /// [`KEY_SIZE`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TagError> {
        let Ok(bytes) = <[u8; KEY_SIZE]>::try_from(bytes) else {
            return Err(TagError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() });
        };
        Ok(Self { bytes })
    }

    /// Parse a hex-encoded key (64 hex digits).
    pub fn from_hex(encoded: &str) -> Result<Self, TagError> {
        let mut decoded = hex::decode(encoded.trim())
            .map_err(|e| TagError::InvalidKeyEncoding { reason: e.to_string() })?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Lowercase hex encoding of the key, for out-of-band distribution.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey(<redacted>)")
    }
}

impl Drop for SharedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

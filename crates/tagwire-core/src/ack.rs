//! Status acknowledgments sent from receiver to sender.

use std::fmt;

use tagwire_crypto::Verdict;

const INTACT_TEXT: &str = "Message is intact";
const CORRUPTED_TEXT: &str = "Message is corrupted";

/// Per-message verification status reported back to the sender.
///
/// Encoded on the wire as UTF-8 text so either side of the exchange can
/// print it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Acknowledgment {
    /// Tag matched the message
    Intact,
    /// Tag did not match the message
    Corrupted,
}

impl Acknowledgment {
    /// Wire text for this acknowledgment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intact => INTACT_TEXT,
            Self::Corrupted => CORRUPTED_TEXT,
        }
    }

    /// Encode for transmission.
    pub fn to_bytes(self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }

    /// Decode a received acknowledgment. `None` if the bytes are neither
    /// wire form.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b if b == INTACT_TEXT.as_bytes() => Some(Self::Intact),
            b if b == CORRUPTED_TEXT.as_bytes() => Some(Self::Corrupted),
            _ => None,
        }
    }

    /// True for [`Acknowledgment::Intact`].
    pub fn is_intact(self) -> bool {
        matches!(self, Self::Intact)
    }
}

impl From<Verdict> for Acknowledgment {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Intact => Self::Intact,
            Verdict::Corrupted => Self::Corrupted,
        }
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_text() {
        assert_eq!(Acknowledgment::Intact.to_bytes(), b"Message is intact");
        assert_eq!(Acknowledgment::Corrupted.to_bytes(), b"Message is corrupted");
    }

    #[test]
    fn decodes_both_forms() {
        assert_eq!(Acknowledgment::from_bytes(b"Message is intact"), Some(Acknowledgment::Intact));
        assert_eq!(
            Acknowledgment::from_bytes(b"Message is corrupted"),
            Some(Acknowledgment::Corrupted)
        );
    }

    #[test]
    fn rejects_unknown_bytes() {
        assert_eq!(Acknowledgment::from_bytes(b""), None);
        assert_eq!(Acknowledgment::from_bytes(b"message is intact"), None);
        assert_eq!(Acknowledgment::from_bytes(b"Message is intact\n"), None);
    }

    #[test]
    fn follows_verdict() {
        assert_eq!(Acknowledgment::from(Verdict::Intact), Acknowledgment::Intact);
        assert_eq!(Acknowledgment::from(Verdict::Corrupted), Acknowledgment::Corrupted);
    }
}

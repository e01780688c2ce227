//! Payload to text encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};
use std::fmt;

/// Encode a binary payload into the text form stored in a carrier.
///
/// Uses the standard base64 alphabet with padding, so any byte sequence
/// (including the empty one) maps to a plain ASCII string.
///
/// # Example
///
/// ```
/// use carrier_stego::encoding::encode_payload;
///
/// assert_eq!(encode_payload(b"hello"), "aGVsbG8=");
/// assert_eq!(encode_payload(b""), "");
/// ```
pub fn encode_payload(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// SHA-256 fingerprint of a payload.
///
/// Reported after embedding and after extraction so the two can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadDigest([u8; 32]);

impl PayloadDigest {
    /// Hash a payload.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

impl fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_payload(b"f"), "Zg==");
        assert_eq!(encode_payload(b"fo"), "Zm8=");
        assert_eq!(encode_payload(b"foo"), "Zm9v");
        assert_eq!(encode_payload(&[0xFF, 0xFE, 0x00]), "//4A");
    }

    #[test]
    fn test_encode_is_ascii() {
        let data: Vec<u8> = (0..=255).collect();
        assert!(encode_payload(&data).is_ascii());
    }

    #[test]
    fn test_digest_of_empty() {
        assert_eq!(
            PayloadDigest::of(b"").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_differs() {
        assert_ne!(PayloadDigest::of(b"a"), PayloadDigest::of(b"b"));
    }
}

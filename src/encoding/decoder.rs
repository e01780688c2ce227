//! Text to payload decoding.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Decode the text form of a payload back to its bytes.
///
/// Characters outside the base64 alphabet are discarded first. Editors and
/// metadata tools may wrap long values or insert stray whitespace, and the
/// payload must survive that.
///
/// # Example
///
/// ```
/// use carrier_stego::encoding::decode_payload;
///
/// assert_eq!(decode_payload("aGVs\r\nbG8=").unwrap(), b"hello");
/// ```
pub fn decode_payload(text: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = text.bytes().filter(|b| is_base64_byte(*b)).collect();

    BASE64
        .decode(&cleaned)
        .map_err(|e| Error::CorruptPayload(e.to_string()))
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

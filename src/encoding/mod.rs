//! Payload text encoding.
//!
//! Binary payloads are stored in carriers as base64 text. This module
//! provides the encode/decode pair and a digest for verifying recovery.

mod decoder;
mod encoder;

pub use decoder::decode_payload;
pub use encoder::{encode_payload, PayloadDigest};

//! Carrier steganography
//!
//! Hides one file inside another carrier file and recovers it later.
//!
//! # Codecs
//!
//! - **Image**: a grayscale secret image lives in the low nibble of every
//!   channel of a cover image. Lossy: the secret comes back resized to the
//!   cover and quantized to 16 levels.
//! - **PDF**: any file, base64-encoded, in a reserved key of the document
//!   information dictionary. Pages are carried over in order.
//! - **DOCX**: any file, base64-encoded, in a hidden text run of a paragraph
//!   appended to the body.
//!
//! The payload is not encrypted. Anyone who knows the scheme can read it.
//!
//! # Architecture
//!
//! ```text
//! Payload → base64 → Carrier structure (info key / hidden run) → File
//! Secret image → resize → high nibble → Cover low nibble → File
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use carrier_stego::codec::{PayloadCodec, PdfMetadataCodec};
//! use std::path::Path;
//!
//! let codec = PdfMetadataCodec::default();
//! codec
//!     .embed(
//!         Path::new("secret.zip"),
//!         Path::new("report.pdf"),
//!         Path::new("report-out.pdf"),
//!     )
//!     .unwrap();
//!
//! let recovered = codec.extract(Path::new("report-out.pdf")).unwrap();
//! assert_eq!(recovered, std::fs::read("secret.zip").unwrap());
//! ```

pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod storage;

pub use codec::{
    DocxHiddenRunCodec, EmbedReport, ExtractReport, PayloadCodec, PdfMetadataCodec,
    PixelNibbleCodec,
};
pub use config::StegoConfig;
pub use error::{Error, ErrorKind, Result};

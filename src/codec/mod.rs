//! Steganographic codecs.
//!
//! Three independent codecs, each with an embed transform and its inverse:
//!
//! - [`PixelNibbleCodec`]: grayscale image in the low nibble of a cover image
//! - [`PdfMetadataCodec`]: any file as base64 in a PDF information key
//! - [`DocxHiddenRunCodec`]: any file as base64 in a hidden DOCX text run
//!
//! The two document codecs carry arbitrary bytes and share the
//! [`PayloadCodec`] trait. The image codec carries an image and has its own
//! inherent API.

pub mod docx;
pub mod image;
pub mod pdf;

pub use self::docx::DocxHiddenRunCodec;
pub use self::image::{ImageReport, PixelNibbleCodec};
pub use self::pdf::PdfMetadataCodec;

use crate::encoding::PayloadDigest;
use crate::error::Result;
use crate::storage::{read_input, write_atomic};
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of a completed embed.
#[derive(Debug, Clone)]
pub struct EmbedReport {
    /// Carrier format name.
    pub format: &'static str,
    /// Size of the hidden payload in bytes.
    pub payload_len: usize,
    /// Size of the written carrier in bytes.
    pub carrier_len: usize,
    /// Digest of the hidden payload.
    pub digest: PayloadDigest,
    /// Where the carrier was written.
    pub output: PathBuf,
}

/// Summary of a completed extraction written to disk.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    /// Carrier format name.
    pub format: &'static str,
    /// Size of the recovered payload in bytes.
    pub payload_len: usize,
    /// Digest of the recovered payload.
    pub digest: PayloadDigest,
    /// Where the payload was written.
    pub output: PathBuf,
}

/// A codec that hides an arbitrary byte payload inside a document carrier.
///
/// Implementors provide the in-memory transforms; the path-based operations
/// are derived from them. Implementations hold only configuration, so one
/// value can serve concurrent calls on distinct paths.
pub trait PayloadCodec: Send + Sync {
    /// Short carrier format name used in errors and reports.
    fn format(&self) -> &'static str;

    /// Hide `payload` in a copy of the `base` carrier and return the new
    /// carrier bytes. `base` itself is never modified.
    fn embed_bytes(&self, payload: &[u8], base: &[u8]) -> Result<Vec<u8>>;

    /// Recover the payload hidden in `carrier`.
    fn extract_bytes(&self, carrier: &[u8]) -> Result<Vec<u8>>;

    /// Hide the file at `payload` in a copy of the carrier at `base`, writing
    /// the result to `output`.
    ///
    /// `output` is written atomically: on error it is left untouched.
    fn embed(&self, payload: &Path, base: &Path, output: &Path) -> Result<EmbedReport> {
        let payload_data = read_input(payload)?;
        let base_data = read_input(base)?;

        let carrier = self.embed_bytes(&payload_data, &base_data)?;
        write_atomic(output, &carrier)?;

        let report = EmbedReport {
            format: self.format(),
            payload_len: payload_data.len(),
            carrier_len: carrier.len(),
            digest: PayloadDigest::of(&payload_data),
            output: output.to_path_buf(),
        };
        info!(
            format = report.format,
            payload = report.payload_len,
            output = %output.display(),
            "embedded payload"
        );
        Ok(report)
    }

    /// Recover the payload hidden in the carrier file at `carrier`.
    fn extract(&self, carrier: &Path) -> Result<Vec<u8>> {
        let data = read_input(carrier)?;
        self.extract_bytes(&data)
    }

    /// Recover the payload hidden in `carrier` and write it to `output`.
    fn extract_to(&self, carrier: &Path, output: &Path) -> Result<ExtractReport> {
        let payload = self.extract(carrier)?;
        write_atomic(output, &payload)?;

        let report = ExtractReport {
            format: self.format(),
            payload_len: payload.len(),
            digest: PayloadDigest::of(&payload),
            output: output.to_path_buf(),
        };
        info!(
            format = report.format,
            payload = report.payload_len,
            output = %output.display(),
            "extracted payload"
        );
        Ok(report)
    }
}

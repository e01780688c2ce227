//! Nibble steganography for images.
//!
//! Hides a grayscale image inside a cover image by replacing the low 4 bits of
//! every color channel with the high 4 bits of the secret's intensity. The
//! cover keeps its high nibble, so it looks unchanged; the secret survives as
//! a 16-level approximation.
//!
//! The encoded image must be stored in a lossless format (PNG, BMP, TIFF...).

use crate::config::{StegoConfig, HIGH_NIBBLE_MASK, LOW_NIBBLE_MASK, NIBBLE_BITS};
use crate::error::{Error, Result};
use crate::storage::{read_input, write_atomic};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FORMAT: &str = "image";

/// Combine a cover channel value with a secret intensity.
#[inline]
pub fn embed_nibble(cover: u8, secret: u8) -> u8 {
    (cover & HIGH_NIBBLE_MASK) | (secret >> NIBBLE_BITS)
}

/// Recover the quantized secret intensity from an encoded channel value.
#[inline]
pub fn extract_nibble(encoded: u8) -> u8 {
    (encoded & LOW_NIBBLE_MASK) << NIBBLE_BITS
}

/// Summary of an image written to disk.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub output: PathBuf,
}

/// Image-in-image nibble codec.
#[derive(Debug, Clone)]
pub struct PixelNibbleCodec {
    filter: FilterType,
}

impl Default for PixelNibbleCodec {
    fn default() -> Self {
        Self::new(&StegoConfig::default())
    }
}

impl PixelNibbleCodec {
    /// Create a codec using the configured resample filter.
    pub fn new(config: &StegoConfig) -> Self {
        Self {
            filter: config.resample_filter.into(),
        }
    }

    /// Hide `secret` inside `cover`.
    ///
    /// The secret is converted to grayscale and resized to the cover's exact
    /// dimensions first. The result always has the cover's dimensions.
    pub fn embed_images(&self, cover: &DynamicImage, secret: &DynamicImage) -> RgbImage {
        let cover = cover.to_rgb8();
        let (width, height) = cover.dimensions();

        let mut secret = secret.to_luma8();
        if secret.dimensions() != (width, height) {
            debug!(
                from_width = secret.width(),
                from_height = secret.height(),
                width,
                height,
                "resizing secret to cover"
            );
            secret = imageops::resize(&secret, width, height, self.filter);
        }

        RgbImage::from_fn(width, height, |x, y| {
            let Rgb(channels) = *cover.get_pixel(x, y);
            let Luma([gray]) = *secret.get_pixel(x, y);
            Rgb(channels.map(|c| embed_nibble(c, gray)))
        })
    }

    /// Recover the hidden grayscale image from an encoded image.
    ///
    /// Every channel carries the same secret value, so the red channel alone
    /// is used. Any image decodes to something; an image that was never
    /// encoded yields noise.
    pub fn extract_image(&self, encoded: &DynamicImage) -> GrayImage {
        let encoded = encoded.to_rgb8();
        let (width, height) = encoded.dimensions();

        GrayImage::from_fn(width, height, |x, y| {
            let Rgb([red, _, _]) = *encoded.get_pixel(x, y);
            Luma([extract_nibble(red)])
        })
    }

    /// Hide the secret image file inside the cover image file.
    pub fn embed(&self, cover: &Path, secret: &Path) -> Result<RgbImage> {
        let cover = load_image(cover)?;
        let secret = load_image(secret)?;
        Ok(self.embed_images(&cover, &secret))
    }

    /// Recover the hidden image from an encoded image file.
    pub fn extract(&self, encoded: &Path) -> Result<GrayImage> {
        let encoded = load_image(encoded)?;
        Ok(self.extract_image(&encoded))
    }

    /// Hide `secret` in `cover` and save the encoded image to `output`.
    ///
    /// The output format follows the extension of `output`.
    pub fn embed_to_file(&self, cover: &Path, secret: &Path, output: &Path) -> Result<ImageReport> {
        let encoded = self.embed(cover, secret)?;
        let report = save_image(DynamicImage::ImageRgb8(encoded), output)?;
        info!(
            width = report.width,
            height = report.height,
            output = %output.display(),
            "embedded image"
        );
        Ok(report)
    }

    /// Recover the hidden image from `encoded` and save it to `output`.
    pub fn extract_to_file(&self, encoded: &Path, output: &Path) -> Result<ImageReport> {
        let secret = self.extract(encoded)?;
        let report = save_image(DynamicImage::ImageLuma8(secret), output)?;
        info!(
            width = report.width,
            height = report.height,
            output = %output.display(),
            "extracted image"
        );
        Ok(report)
    }
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    let data = read_input(path)?;
    image::load_from_memory(&data)
        .map_err(|e| Error::parse(FORMAT, format!("{}: {}", path.display(), e)))
}

fn save_image(image: DynamicImage, output: &Path) -> Result<ImageReport> {
    let format = ImageFormat::from_path(output).map_err(|e| Error::Write {
        path: output.to_path_buf(),
        reason: e.to_string(),
    })?;
    if is_lossy(format) {
        warn!(
            ?format,
            output = %output.display(),
            "lossy output format will destroy the hidden low nibble"
        );
    }

    let mut data = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut data), format)
        .map_err(|e| Error::serialize(FORMAT, e))?;
    write_atomic(output, &data)?;

    Ok(ImageReport {
        width: image.width(),
        height: image.height(),
        format,
        output: output.to_path_buf(),
    })
}

fn is_lossy(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Jpeg | ImageFormat::Avif)
}

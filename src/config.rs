//! Configuration constants and types for the carrier codecs.

use crate::error::{Error, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mask selecting the visually dominant bits of a channel value.
pub const HIGH_NIBBLE_MASK: u8 = 0xF0;

/// Mask selecting the bits that carry the hidden image.
pub const LOW_NIBBLE_MASK: u8 = 0x0F;

/// Bits of secret intensity stored per channel.
pub const NIBBLE_BITS: u32 = 4;

/// Default information-dictionary key holding the PDF payload.
pub const DEFAULT_METADATA_KEY: &str = "CustomBinaryData";

/// Keys written by earlier releases of the tool, still honored on extraction.
pub const LEGACY_METADATA_KEYS: &[&str] = &["HiddenData"];

/// Resampling filter used to fit the secret image to the cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl Default for ResampleFilter {
    fn default() -> Self {
        ResampleFilter::CatmullRom
    }
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Configuration shared by the codecs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Filter used when the secret image is resized to the cover.
    pub resample_filter: ResampleFilter,

    /// PDF information key that receives the payload.
    pub metadata_key: String,

    /// Additional PDF keys consulted when extracting.
    pub legacy_metadata_keys: Vec<String>,

    /// Copy the base document's information entries into the output.
    pub preserve_metadata: bool,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            resample_filter: ResampleFilter::default(),
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            legacy_metadata_keys: LEGACY_METADATA_KEYS.iter().map(|k| k.to_string()).collect(),
            preserve_metadata: true,
        }
    }
}

impl StegoConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The loaded configuration is
    /// normalized and validated before it is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StegoConfig = serde_json::from_str(&content)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Strip the leading `/` that PDF tooling commonly prints before names.
    pub fn normalized(mut self) -> Self {
        self.metadata_key = normalize_key(&self.metadata_key);
        for key in &mut self.legacy_metadata_keys {
            *key = normalize_key(key);
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.metadata_key)?;
        for key in &self.legacy_metadata_keys {
            validate_key(key)?;
            if *key == self.metadata_key {
                return Err(Error::Config(format!(
                    "metadata key '{}' is also listed as a legacy key",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches('/').to_string()
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Config("metadata key must not be empty".to_string()));
    }
    Ok(())
}

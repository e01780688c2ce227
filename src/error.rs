//! Error types for the carrier codecs.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a codec failure.
///
/// Callers that only need to tell "bad input" from "could not write" from
/// "nothing hidden here" match on this instead of on [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input file was unreadable or could not be parsed.
    CodecInput,
    /// Serializing or writing the output failed.
    CodecIo,
    /// The carrier holds no embedded payload.
    PayloadNotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CodecInput => "input",
            ErrorKind::CodecIo => "io",
            ErrorKind::PayloadNotFound => "not-found",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while embedding or extracting a payload.
#[derive(Error, Debug)]
pub enum Error {
    /// An input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input could not be decoded as the expected carrier format.
    #[error("Invalid {format} input: {reason}")]
    Parse { format: &'static str, reason: String },

    /// The embedded text was found but is not valid base64.
    #[error("Hidden payload is corrupted: {0}")]
    CorruptPayload(String),

    /// Invalid codec configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The output file could not be written.
    #[error("Cannot write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// The carrier could not be serialized.
    #[error("Cannot serialize {format} output: {reason}")]
    Serialize { format: &'static str, reason: String },

    /// No embedded payload in the carrier.
    #[error("No hidden payload found in {format} carrier")]
    PayloadNotFound { format: &'static str },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read { .. }
            | Error::Parse { .. }
            | Error::CorruptPayload(_)
            | Error::Config(_) => ErrorKind::CodecInput,
            Error::Write { .. } | Error::Serialize { .. } => ErrorKind::CodecIo,
            Error::PayloadNotFound { .. } => ErrorKind::PayloadNotFound,
        }
    }

    pub(crate) fn parse(format: &'static str, reason: impl fmt::Display) -> Self {
        Error::Parse {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn serialize(format: &'static str, reason: impl fmt::Display) -> Self {
        Error::Serialize {
            format,
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

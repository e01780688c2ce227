//! Storage layer for carrier files.
//!
//! This module handles:
//! - Reading input carriers and payloads fully into memory
//! - Writing outputs atomically so failed calls leave no partial file

mod files;

pub use files::{read_input, write_atomic};

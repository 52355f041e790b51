#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and PNG encoding/decoding failures.
pub mod error;

/// PNG image encoding and decoding.
///
/// Read PNG images of any 8 or 16 bit color type as RGB8 or mono8, and write
/// RGB8 or mono8 images back.
pub mod png;

pub use crate::error::IoError;

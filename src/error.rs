//! Error types for the QuickLZ codec.
//!
//! Split by operation, the way the teacher crate splits `raw::decompress::DecodeError`
//! from `framed::compress::CompressionError`: the decoder deals with untrusted input and
//! therefore has a real error surface, while the encoder's only failure mode is an invalid
//! level, which the typed [`crate::header::Level`] argument already rules out for library
//! callers.

use thiserror::Error;

/// Errors that can occur while decompressing a QuickLZ frame.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DecompressError {
    /// The input was truncated, internally inconsistent, or otherwise does not describe
    /// a valid QuickLZ frame.
    #[error("quicklz: corrupt document")]
    Corrupt,
    /// The header's level field is not 1 or 3.
    #[error("quicklz: unsupported compression level")]
    UnsupportedLevel,
}

/// Errors that can occur while compressing.
///
/// The library-level [`crate::compress()`] function takes a typed [`crate::header::Level`]
/// and so can never actually produce this; it exists for callers (such as the CLI) that
/// accept a level as an untyped integer and need to reject it before reaching the codec.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CompressError {
    /// The requested level is not 1 or 3.
    #[error("quicklz: unsupported compression level")]
    UnsupportedLevel,
}

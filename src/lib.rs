//! A pure-Rust implementation of the QuickLZ 1.5 compression format, levels 1 and 3.
//!
//! ```
//! let packed = quicklz::compress(b"to live or not to live", quicklz::Level::One);
//! let unpacked = quicklz::decompress(&packed).unwrap();
//! assert_eq!(unpacked, b"to live or not to live");
//! ```
//!
//! This crate decodes and encodes byte-identical QuickLZ 1.5 frames: the header layout, the
//! control-word bitstream, the hash dictionaries, and every level-specific match encoding are
//! all implemented against the upstream format, not a reinterpretation of it. See
//! [`header`], [`dictionary`], [`compress`] and [`decompress`] for the pieces, and
//! `DESIGN.md` in the repository for how each was grounded.

#![forbid(unsafe_code)]

pub mod bitstream;
pub mod cli;
pub mod compress;
pub mod decompress;
pub mod dictionary;
pub mod error;
pub mod header;

pub use compress::compress;
pub use decompress::decompress;
pub use error::{CompressError, DecompressError};
pub use header::{header_len, size_compressed, size_decompressed, Level};

/// The QuickLZ format revision this crate implements.
pub const VERSION_MAJOR: u32 = 1;
pub const VERSION_MINOR: u32 = 5;
pub const VERSION_REVISION: u32 = 0;

//! Argument parsing and I/O plumbing for the `quicklz` binary.
//!
//! Grounded on `jafreck-lz4r`'s `cli::args` module: a `clap`-derive struct, `-` meaning
//! stdin/stdout, and dispatch left to the binary's `main`. Scaled down to the two operations
//! this format actually needs — no directory recursion, no multi-file batching, no legacy
//! framing flags.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::CompressError;
use crate::header::Level;

#[derive(Parser, Debug)]
#[command(name = "quicklz", version, about = "QuickLZ 1.5 compressor/decompressor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file (or stdin) into a QuickLZ frame.
    Compress {
        /// Input path, or `-` for stdin.
        input: PathBuf,
        /// Output path, or `-` for stdout.
        output: PathBuf,
        /// Compression level.
        #[arg(long, default_value_t = 1)]
        level: u8,
    },
    /// Decompress a QuickLZ frame (from a file or stdin).
    Decompress {
        /// Input path, or `-` for stdin.
        input: PathBuf,
        /// Output path, or `-` for stdout.
        output: PathBuf,
    },
}

/// Validates the CLI's untyped `--level` argument into a [`Level`].
///
/// `clap` has no way to know this crate's level values up front (they arrive as a bare `u8`,
/// not a fixed set of strings), so this is the one real boundary where an out-of-range level
/// is possible and must be rejected before reaching [`crate::compress()`].
pub fn parse_level(level: u8) -> Result<Level, CompressError> {
    match level {
        1 => Ok(Level::One),
        3 => Ok(Level::Three),
        _ => Err(CompressError::UnsupportedLevel),
    }
}

/// Reads an entire input source: stdin if `path` is `-`, else the named file.
pub fn read_input(path: &PathBuf) -> io::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

/// Writes an entire output: stdout if `path` is `-`, else the named file.
pub fn write_output(path: &PathBuf, data: &[u8]) -> io::Result<()> {
    if path.to_str() == Some("-") {
        io::stdout().write_all(data)
    } else {
        fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_one_and_three() {
        assert_eq!(parse_level(1), Ok(Level::One));
        assert_eq!(parse_level(3), Ok(Level::Three));
    }

    #[test]
    fn parse_level_rejects_anything_else() {
        assert_eq!(parse_level(0), Err(CompressError::UnsupportedLevel));
        assert_eq!(parse_level(2), Err(CompressError::UnsupportedLevel));
        assert_eq!(parse_level(255), Err(CompressError::UnsupportedLevel));
    }
}

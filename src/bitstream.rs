//! Little-endian integer primitives at arbitrary byte offsets.
//!
//! QuickLZ's match tokens are bit-packed across 1 to 4 bytes and are not aligned to the
//! widths a crate like `byteorder` targets, so this codec assembles every multi-byte field —
//! match tokens and the header's size fields alike — by hand instead of reaching for one. The
//! teacher takes the opposite split (`byteorder` for its aligned u16/u32 offsets, hand-assembled
//! bytes only for its LSIC length bytes); QuickLZ has no aligned fields at all, so there is
//! nothing left here for `byteorder` to do.

use crate::error::DecompressError;

/// Reads `numbytes` (1..=4) little-endian bytes from `buf[offset..]` into a `u32`.
///
/// Mirrors the reference `fastRead`. Fails with [`DecompressError::Corrupt`] if the read
/// would run past the end of `buf` — this is the primitive every bounds check in the
/// decompressor ultimately goes through.
pub fn fast_read(buf: &[u8], offset: usize, numbytes: usize) -> Result<u32, DecompressError> {
    let end = offset.checked_add(numbytes).ok_or(DecompressError::Corrupt)?;
    let bytes = buf.get(offset..end).ok_or(DecompressError::Corrupt)?;
    let mut value: u32 = 0;
    for (j, &b) in bytes.iter().enumerate() {
        value |= (b as u32) << (8 * j);
    }
    Ok(value)
}

/// Writes the low `numbytes` bytes of `value`, little-endian, to `buf[offset..]`.
///
/// The caller guarantees `buf` has room; this is an internal primitive used only by the
/// trusted-input compressor, not a boundary that processes adversarial data.
pub fn fast_write(buf: &mut [u8], offset: usize, value: u32, numbytes: usize) {
    for j in 0..numbytes {
        buf[offset + j] = (value >> (8 * j)) as u8;
    }
}

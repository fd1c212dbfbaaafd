//! The decompressor: mirror image of the compressor, reading the control-word stream and
//! alternating between literal emission and match-region copies.
//!
//! Grounded on the teacher's `raw::decompress::decompress_raw` / `copy_overlapping`: the same
//! "token drives literal-then-duplicate" shape, and the same insistence (`copy_overlapping`'s
//! `1 | 2 | 4 | 8` fast paths plus general byte-wise fallback) that a short-offset copy must
//! tolerate reading bytes the very same copy just wrote. This codec's copy loop is simpler
//! (QuickLZ's offsets aren't pre-known to be aligned powers of two the way LZ4's dedup offsets
//! are explored there) but solves the identical overlap problem.

use crate::bitstream::fast_read;
use crate::dictionary::DecompressDictionary;
use crate::error::DecompressError;
use crate::header::{header_len, is_compressible, level_of, size_decompressed, Level};

const UNCONDITIONAL_MATCH_LEN: usize = 6;
const UNCOMPRESSED_END: usize = 4;
const CWORD_LEN: usize = 4;

/// Decompresses a QuickLZ frame.
///
/// Fails with [`DecompressError::Corrupt`] on any out-of-bounds access, malformed header, or
/// truncated control word; fails with [`DecompressError::UnsupportedLevel`] if the header's
/// level field is neither 1 nor 3. Every index derived from the wire format is bounds-checked
/// before use — this function must never panic on adversarial input.
pub fn decompress(source: &[u8]) -> Result<Vec<u8>, DecompressError> {
    let size = size_decompressed(source)?;
    let hlen = header_len(source[0]);

    let level = match Level::try_from(level_of(source[0])) {
        Ok(level) => level,
        Err(_) => return Err(DecompressError::UnsupportedLevel),
    };

    if !is_compressible(source[0]) {
        let body = source.get(hlen..hlen + size).ok_or(DecompressError::Corrupt)?;
        return Ok(body.to_vec());
    }

    let mut destination = vec![0u8; size];
    let mut src = hlen;
    let mut dst = 0usize;
    let mut cword_val: u32 = 1;
    // -1 sentinel, exactly like the reference's `lastHashed := -1`: the literal-branch rehash
    // window `dst-3` can be negative for the first couple of output bytes, so this has to stay
    // signed rather than clamp to zero (a clamp would wrongly rehash position 0 on a decompress
    // that starts with fewer than three literals).
    let mut last_hashed: isize = -1;
    let last_match_start = size.checked_sub(UNCONDITIONAL_MATCH_LEN + UNCOMPRESSED_END + 1);
    let mut fetch: u32 = 0;
    let mut dict = DecompressDictionary::new();

    loop {
        if dst >= size {
            return Ok(destination);
        }

        if cword_val == 1 {
            cword_val = fast_read(source, src, CWORD_LEN)?;
            src += CWORD_LEN;
            if matches!(last_match_start, Some(lms) if dst <= lms) {
                let width = if level == Level::One { 3 } else { 4 };
                fetch = fast_read(source, src, width)?;
            }
        }

        if (cword_val & 1) == 1 {
            cword_val >>= 1;

            let (matchlen, offset2) = match level {
                Level::One => {
                    let h = ((fetch >> 4) & 0xfff) as usize;
                    let offset2 = dict.get(h);
                    let matchlen = if (fetch & 0xf) != 0 {
                        src += 2;
                        ((fetch & 0xf) + 2) as usize
                    } else {
                        let b = *source.get(src + 2).ok_or(DecompressError::Corrupt)?;
                        src += 3;
                        b as usize
                    };
                    (matchlen, offset2)
                }
                Level::Three => decode_level3_token(fetch, dst, &mut src)?,
            };

            if matchlen == 0
                || destination.len() <= dst + 2
                || destination.len() <= offset2.wrapping_add(matchlen)
                || destination.len() <= dst + matchlen
                || offset2 >= dst
            {
                return Err(DecompressError::Corrupt);
            }

            copy_overlapping(&mut destination, offset2, dst, matchlen);
            dst += matchlen;

            if level == Level::One {
                last_hashed = rehash_level1(&destination, &mut dict, last_hashed, (dst - matchlen) as isize)?;
                fetch = fast_read(source, src, 3)?;
            } else {
                fetch = fast_read(source, src, 4)?;
            }
            last_hashed = dst as isize - 1;
        } else if matches!(last_match_start, Some(lms) if dst <= lms) {
            let byte = *source.get(src).ok_or(DecompressError::Corrupt)?;
            destination[dst] = byte;
            dst += 1;
            src += 1;
            cword_val >>= 1;

            if level == Level::One {
                last_hashed = rehash_level1(&destination, &mut dict, last_hashed, dst as isize - 3)?;
                let b = *source.get(src + 2).ok_or(DecompressError::Corrupt)?;
                fetch = (fetch >> 8) & 0xffff | (b as u32) << 16;
            } else {
                let b2 = *source.get(src + 2).ok_or(DecompressError::Corrupt)?;
                let b3 = *source.get(src + 3).ok_or(DecompressError::Corrupt)?;
                fetch = (fetch >> 8) & 0xffff | (b2 as u32) << 16 | (b3 as u32) << 24;
            }
        } else {
            // Tail: literals only, no more match references are possible this close to the end.
            while dst <= size - 1 {
                if cword_val == 1 {
                    src += CWORD_LEN;
                    cword_val = 0x8000_0000;
                }
                let byte = *source.get(src).ok_or(DecompressError::Corrupt)?;
                if dst >= destination.len() {
                    return Err(DecompressError::Corrupt);
                }
                destination[dst] = byte;
                dst += 1;
                src += 1;
                cword_val >>= 1;
            }
            return Ok(destination);
        }
    }
}

/// Decodes a level-3 match token (1 to 4 bytes) and returns `(matchlen, offset2)`, advancing
/// `src` past the bytes consumed. Inverse of the encoding table in `SPEC_FULL.md` §4.4.
fn decode_level3_token(fetch: u32, dst: usize, src: &mut usize) -> Result<(usize, usize), DecompressError> {
    let (offset, matchlen) = if (fetch & 3) == 0 {
        *src += 1;
        ((fetch & 0xff) >> 2, 3)
    } else if (fetch & 2) == 0 {
        *src += 2;
        ((fetch & 0xffff) >> 2, 3)
    } else if (fetch & 1) == 0 {
        *src += 2;
        ((fetch & 0xffff) >> 6, ((fetch >> 2) & 15) + 3)
    } else if (fetch & 127) != 3 {
        *src += 3;
        ((fetch >> 7) & 0x1_ffff, ((fetch >> 2) & 0x1f) + 2)
    } else {
        *src += 4;
        (fetch >> 15, ((fetch >> 7) & 255) + 3)
    };

    let offset = offset as usize;
    if offset > dst {
        return Err(DecompressError::Corrupt);
    }
    Ok((matchlen as usize, dst - offset))
}

/// Rehashes every new 3-byte window in `destination[last_hashed+1 ..= up_to]` into the
/// level-1 output-side dictionary, returning the new `last_hashed`.
///
/// Mirrors the reference's `for lastHashed < up_to { lastHashed++; process(lastHashed) }`
/// precisely, `up_to` included: both bounds stay signed because `up_to` (`dst-3` for a lone
/// leading literal, or `dst-matchlen` for a match at the very start of the stream) can be
/// negative, in which case the loop must run zero times rather than rehash position 0.
fn rehash_level1(
    destination: &[u8],
    dict: &mut DecompressDictionary,
    last_hashed: isize,
    up_to: isize,
) -> Result<isize, DecompressError> {
    let mut cursor = last_hashed;
    while cursor < up_to {
        cursor += 1;
        let next = cursor as usize;
        let window = *destination.get(next).ok_or(DecompressError::Corrupt)? as u32
            | (*destination.get(next + 1).ok_or(DecompressError::Corrupt)? as u32) << 8
            | (*destination.get(next + 2).ok_or(DecompressError::Corrupt)? as u32) << 16;
        let h = crate::dictionary::hash(window);
        dict.set(h, next);
    }
    Ok(cursor)
}

/// Copies `len` bytes from `destination[from..]` to `destination[to..]`, tolerating
/// overlapping ranges (required for short-offset RLE expansion, e.g. offset 1 repeats the
/// last byte `len` times).
fn copy_overlapping(destination: &mut [u8], from: usize, to: usize, len: usize) {
    for i in 0..len {
        destination[to + i] = destination[from + i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::compress;
    use crate::header::Level;

    #[test]
    fn rejects_unsupported_level_in_header() {
        let mut frame = compress(b"hello hello hello", Level::One);
        // bits 2-3 carry the level; force it to 2 (unsupported).
        frame[0] = (frame[0] & !0b1100) | (2 << 2);
        assert_eq!(decompress(&frame), Err(DecompressError::UnsupportedLevel));
    }

    #[test]
    fn truncation_never_panics() {
        let frame = compress(b"the quick brown fox jumps over the lazy dog, repeatedly, the quick brown fox", Level::One);
        for k in 0..frame.len() {
            let _ = decompress(&frame[..k]);
        }
    }

    #[test]
    fn truncation_never_panics_level3() {
        let frame = compress(b"the quick brown fox jumps over the lazy dog, repeatedly, the quick brown fox", Level::Three);
        for k in 0..frame.len() {
            let _ = decompress(&frame[..k]);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic() {
        // A handful of structurally-plausible-but-garbage frames: valid level bits, varied
        // declared sizes, random bodies.
        for level_bits in [1u8, 3] {
            for declared_len in [0u32, 1, 16, 1000] {
                let mut buf = vec![0u8; 32];
                buf[0] = 0b0100_0011 | (level_bits << 2);
                buf[1..5].copy_from_slice(&declared_len.to_le_bytes());
                buf[5..9].copy_from_slice(&32u32.to_le_bytes());
                for (i, b) in buf.iter_mut().enumerate().skip(9) {
                    *b = (i as u8).wrapping_mul(97);
                }
                let _ = decompress(&buf);
            }
        }
    }

    #[test]
    fn empty_frame_is_corrupt_not_panic() {
        assert!(decompress(&[]).is_err());
    }
}

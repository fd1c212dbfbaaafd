//! Hash dictionaries mapping a 12-bit hash of a 3-byte window to source (compressor) or
//! output (decompressor) positions.
//!
//! Grounded on the teacher's `EncoderTable` trait (`raw::compress::EncoderTable` /
//! `U16Table` / `U32Table`), which also keeps a fixed-size array behind a small trait so the
//! compressor's inner loop doesn't care which width backs it. Here the axis that varies is
//! occupancy width (level 1's single slot vs. level 3's 16-slot ring), not offset width, since
//! QuickLZ's hash is always 12 bits / 4096 buckets regardless of level.

pub(crate) const HASH_VALUES: usize = 4096;
pub(crate) const POINTERS3: usize = 16;

/// `hash(w) = ((w >> 12) ^ w) & 0xFFF` for a 3-byte little-endian window `w`.
#[inline]
pub(crate) fn hash(window: u32) -> usize {
    (((window >> 12) ^ window) & (HASH_VALUES as u32 - 1)) as usize
}

/// The compressor's dictionary: one table per level, built fresh for each `compress` call.
pub(crate) enum CompressDictionary {
    One {
        table: Box<[usize; HASH_VALUES]>,
        cache: Box<[u32; HASH_VALUES]>,
        counter: Box<[u8; HASH_VALUES]>,
    },
    Three {
        table: Box<[[usize; POINTERS3]; HASH_VALUES]>,
        counter: Box<[u8; HASH_VALUES]>,
    },
}

impl CompressDictionary {
    pub(crate) fn new_level1() -> Self {
        CompressDictionary::One {
            table: Box::new([0; HASH_VALUES]),
            cache: Box::new([0; HASH_VALUES]),
            counter: Box::new([0; HASH_VALUES]),
        }
    }

    pub(crate) fn new_level3() -> Self {
        CompressDictionary::Three {
            table: Box::new([[0; POINTERS3]; HASH_VALUES]),
            counter: Box::new([0; HASH_VALUES]),
        }
    }

    /// Level-1 lookup/insert: returns `(candidate_offset, was_hit, cache_xor)` for hash `h`,
    /// then stores `src` and the fetch window as the new occupant.
    ///
    /// Mirrors the reference's inline `o := hashtable[hash][0]; cache := cachetable[hash] ^
    /// fetch; cachetable[hash] = fetch; hashtable[hash][0] = src`.
    pub(crate) fn level1_probe(&mut self, fetch: u32, src: usize) -> (usize, bool, u32) {
        match self {
            CompressDictionary::One { table, cache, counter } => {
                let h = hash(fetch);
                let candidate = table[h];
                let cache_xor = cache[h] ^ fetch;
                let hit = counter[h] != 0;
                cache[h] = fetch;
                table[h] = src;
                (candidate, hit, cache_xor)
            }
            CompressDictionary::Three { .. } => unreachable!("level1_probe on a level-3 dictionary"),
        }
    }

    /// Marks the hash of `fetch` as occupied without changing the stored source offset
    /// (used after a literal emission, matching `hashCounter[hash] = 1` in the reference).
    pub(crate) fn level1_mark_occupied(&mut self, fetch: u32) {
        match self {
            CompressDictionary::One { counter, .. } => {
                counter[hash(fetch)] = 1;
            }
            CompressDictionary::Three { .. } => unreachable!("level1_mark_occupied on a level-3 dictionary"),
        }
    }

    /// Level-3 lookup: finds the best (longest, then highest-offset) candidate for the
    /// 3-byte window at `src`, verifying the first three bytes and the `o < src - MIN_OFFSET`
    /// addressability requirement; `source` is the full input and `remaining` bounds the
    /// match extension.
    pub(crate) fn level3_find(
        &self,
        source: &[u8],
        src: usize,
        fetch: u32,
        remaining: usize,
    ) -> (usize, usize) {
        let (table, counter) = match self {
            CompressDictionary::Three { table, counter } => (table, counter),
            CompressDictionary::One { .. } => unreachable!("level3_find on a level-1 dictionary"),
        };
        let h = hash(fetch);
        let c = counter[h];
        let mut best_len = 0usize;
        let mut best_offset = 0usize;

        let mut k = 0;
        while k < POINTERS3 && (c as usize > k || c >= 16) {
            let o = table[h][k];
            if o < src.saturating_sub(crate::compress::MIN_OFFSET)
                && (fetch & 0xff) as u8 == source[o]
                && ((fetch >> 8) & 0xff) as u8 == source[o + 1]
                && ((fetch >> 16) & 0xff) as u8 == source[o + 2]
            {
                let mut m = 3;
                while m < remaining && source[o + m] == source[src + m] {
                    m += 1;
                }
                if m > best_len || (m == best_len && o > best_offset) {
                    best_offset = o;
                    best_len = m;
                }
            }
            k += 1;
        }

        (best_offset, best_len)
    }

    /// Inserts `src` into the level-3 ring for hash `h`, advancing (wrapping) the counter.
    pub(crate) fn level3_insert(&mut self, h: usize, src: usize) {
        match self {
            CompressDictionary::Three { table, counter } => {
                table[h][(counter[h] & (POINTERS3 as u8 - 1)) as usize] = src;
                counter[h] = counter[h].wrapping_add(1);
            }
            CompressDictionary::One { .. } => unreachable!("level3_insert on a level-1 dictionary"),
        }
    }

    pub(crate) fn level3_hash_of(fetch: u32) -> usize {
        hash(fetch)
    }
}

/// The decompressor's level-1 dictionary: a single-slot table indexed by *output* offsets,
/// rebuilt as decoding proceeds (see "Level-1 output-side hashing" in `SPEC_FULL.md`).
///
/// Unlike the compressor's, this table carries no cache array: the decoder is never
/// searching for a match, it is told the hash bits directly by the token, so it only ever
/// needs `table[h] -> output offset`.
pub(crate) struct DecompressDictionary {
    table: Box<[usize; HASH_VALUES]>,
}

impl DecompressDictionary {
    pub(crate) fn new() -> Self {
        DecompressDictionary { table: Box::new([0; HASH_VALUES]) }
    }

    pub(crate) fn set(&mut self, h: usize, offset: usize) {
        self.table[h] = offset;
    }

    pub(crate) fn get(&self, h: usize) -> usize {
        self.table[h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_reference_formula() {
        let w = 0x00AB_CDEFu32;
        assert_eq!(hash(w), ((w >> 12) ^ w) as usize & 0xFFF);
    }

    #[test]
    fn level1_probe_reports_miss_then_hit() {
        let mut dict = CompressDictionary::new_level1();
        let (_, hit, _) = dict.level1_probe(0x0001_0203, 5);
        assert!(!hit, "first probe of a fresh bucket must miss");
        let (candidate, hit, cache_xor) = dict.level1_probe(0x0001_0203, 9);
        assert!(hit);
        assert_eq!(candidate, 5);
        assert_eq!(cache_xor, 0);
    }

    #[test]
    fn level3_ring_wraps_after_sixteen_inserts() {
        let mut dict = CompressDictionary::new_level3();
        let h = 17;
        for i in 0..20 {
            dict.level3_insert(h, i);
        }
        if let CompressDictionary::Three { table, counter } = &dict {
            assert_eq!(counter[h], 20);
            // slot 3 (19 % 16) was last overwritten by insert #19; slot 4 still holds #4.
            assert_eq!(table[h][3], 19);
            assert_eq!(table[h][4], 4);
        } else {
            unreachable!();
        }
    }
}

#![no_main]
use libfuzzer_sys::fuzz_target;

// Ported from the reference implementation's `Fuzz` entry point: reject anything that can't
// plausibly be a frame before handing it to the decoder, then require that the decoder itself
// never panics regardless of what's left.
fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let level = (data[0] >> 2) & 0x3;
    if level != 1 && level != 3 {
        return;
    }

    let declared_len = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
    if declared_len > (1 << 21) {
        return;
    }

    let _ = quicklz::decompress(data);
});

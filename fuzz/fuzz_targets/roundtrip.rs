#![no_main]
use libfuzzer_sys::fuzz_target;
use quicklz::Level;

// Any byte string, compressed at either level, must decompress back to itself.
fuzz_target!(|data: &[u8]| {
    for level in [Level::One, Level::Three] {
        let packed = quicklz::compress(data, level);
        let unpacked = quicklz::decompress(&packed).expect("a frame we just produced must decode");
        assert_eq!(unpacked, data);
    }
});

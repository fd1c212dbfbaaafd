//! End-to-end tests against the compiled `quicklz` binary: every prefix of a short text
//! round-trips through `compress | decompress` at both levels, and the CLI rejects garbage
//! input with a non-zero exit status rather than panicking.

use std::io::Write;
use std::process::{Command, Stdio};

fn quicklz_bin() -> &'static str {
    env!("CARGO_BIN_EXE_quicklz")
}

fn run(args: &[&str], stdin: &[u8]) -> std::process::Output {
    let mut child = Command::new(quicklz_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start quicklz binary");

    child.stdin.take().unwrap().write_all(stdin).expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait on quicklz binary")
}

const TEXT: &str = "To be, or not to be, that is the question. Whether 'tis nobler in the mind \
                     to suffer the slings and arrows of outrageous fortune, or to take arms \
                     against a sea of troubles.";

#[test]
fn cli_roundtrips_every_prefix_at_both_levels() {
    for level in ["1", "3"] {
        for n in [1, 2, 3, 10, TEXT.len() / 2, TEXT.len()] {
            let prefix = &TEXT.as_bytes()[..n];

            let compressed = run(&["compress", "-", "-", "--level", level], prefix);
            assert!(compressed.status.success(), "compress failed: {:?}", compressed.stderr);

            let decompressed = run(&["decompress", "-", "-"], &compressed.stdout);
            assert!(decompressed.status.success(), "decompress failed: {:?}", decompressed.stderr);
            assert_eq!(decompressed.stdout, prefix);
        }
    }
}

#[test]
fn cli_rejects_corrupt_input_without_panicking() {
    let garbage = [0xFFu8; 32];
    let output = run(&["decompress", "-", "-"], &garbage);
    assert!(!output.status.success());
}

#[test]
fn cli_rejects_empty_input_without_panicking() {
    let output = run(&["decompress", "-", "-"], &[]);
    assert!(!output.status.success());
}

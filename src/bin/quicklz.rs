//! The `quicklz` command-line front-end: compress or decompress a single file or stream.
//!
//! Grounded on `jafreck-lz4r`'s binary entry point (parse, dispatch, exit code) and
//! `Devolutions-IronRDP`'s `env_logger::init()`-at-`main()` pattern, scaled to the two
//! operations this format needs.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use quicklz::cli::{parse_level, read_input, write_output, Cli, Command};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Compress { input, output, level } => {
            let level = parse_level(level).map_err(|e| format!("{e}"))?;
            let data = read_input(&input).map_err(|e| format!("reading {input:?}: {e}"))?;
            let packed = quicklz::compress(&data, level);
            info!("compressed {} bytes -> {} bytes at level {:?}", data.len(), packed.len(), level);
            write_output(&output, &packed).map_err(|e| format!("writing {output:?}: {e}"))
        }
        Command::Decompress { input, output } => {
            let data = read_input(&input).map_err(|e| format!("reading {input:?}: {e}"))?;
            let unpacked = quicklz::decompress(&data).map_err(|e| format!("{e}"))?;
            info!("decompressed {} bytes -> {} bytes", data.len(), unpacked.len());
            write_output(&output, &unpacked).map_err(|e| format!("writing {output:?}: {e}"))
        }
    }
}

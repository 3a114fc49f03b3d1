mod cli;
mod progress;

use std::process::{self, ExitCode};

use clap::Parser;
use env_logger::Env;
use log::warn;

use crate::cli::{CliArgs, CliError};

pub type CliResult<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logger(args.verbose);
    // files written so far stay in place
    if let Err(e) = ctrlc::set_handler(|| process::exit(0)) {
        warn!("Unable to install the interrupt handler: {e}");
    }

    match args.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::MissingInput) => {
            println!("Please specify a file");
            ExitCode::from(1)
        }
        Err(CliError::Stegi(e)) => {
            let program_name = env!("CARGO_BIN_NAME");
            eprintln!("{program_name}: {e}");
            eprintln!("{}  for help use --help", " ".repeat(program_name.len()));
            ExitCode::from(2)
        }
    }
}

/// `RUST_LOG` wins, otherwise every `-v` shows more
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

//! # xyconv
//!
//! Command-line front end of `xydata`: converts any supported x-y data file
//! to commented, tab-separated text and answers questions about formats.
//!
//! ## Usage
//!
//! ```bash
//! # Convert, guessing the input format
//! xyconv scan.raw scan.xy
//!
//! # Force the format and pass a parser option
//! xyconv -t text -o first-line-header table.csv table.xy
//!
//! # List formats, describe one, guess the format of a file
//! xyconv -l
//! xyconv -i uxd
//! xyconv -g scan.dat
//! ```
//!
//! Errors are printed to standard error as `Error: <message>` and the exit
//! status is 255.

use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());

    match cli::dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(255)
        }
    }
}

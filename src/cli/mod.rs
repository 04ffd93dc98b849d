use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use xydata::Registry;

mod config;
mod convert;
mod info;

pub use config::Config;

/// xyconv - convert x-y data files to plain text
#[derive(Parser, Debug)]
#[command(name = "xyconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// List all supported formats
    #[arg(short, long)]
    list: bool,

    /// Show information about a format
    #[arg(short, long, value_name = "FORMAT")]
    info: Option<String>,

    /// Guess the format of a file
    #[arg(short, long, value_name = "FILE")]
    guess: Option<PathBuf>,

    /// Format of the input file (guessed when omitted)
    #[arg(short = 't', long = "type", value_name = "FORMAT")]
    format: Option<String>,

    /// Parser option, e.g. first-line-header (repeatable)
    #[arg(short = 'o', long = "option", value_name = "OPT")]
    options: Vec<String>,

    /// Do not write meta-data
    #[arg(long)]
    no_metadata: bool,

    /// Digits after the decimal point
    #[arg(long, value_name = "N")]
    precision: Option<usize>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file
    #[arg(value_name = "INPUT", required_unless_present_any = ["list", "info", "guess"])]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT", required_unless_present_any = ["list", "info", "guess"])]
    output: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let registry = Registry::builtin();
    let mut stdout = io::stdout().lock();

    if cli.list {
        return info::list(&registry, &mut stdout);
    }
    if let Some(name) = &cli.info {
        return info::describe(&registry, name, &mut stdout);
    }
    if let Some(path) = &cli.guess {
        return info::guess(&registry, path, &mut stdout);
    }

    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        bail!("INPUT and OUTPUT are required");
    };

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let format = cli.format.clone().or(config.load.format.clone());
    let options = if cli.options.is_empty() {
        config.load.options.clone().unwrap_or_default()
    } else {
        cli.options.clone()
    };
    let mut export = config.export_options();
    if cli.no_metadata {
        export.with_metadata = false;
    }
    if let Some(precision) = cli.precision {
        export.precision = precision;
    }

    convert::run(
        &registry,
        input,
        output,
        format.as_deref(),
        &options,
        &export,
    )
}

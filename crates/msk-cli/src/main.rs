//! Command-line front end for msk-bridge.
//!
//! Problems and options are JSON files in the host encoding documented in
//! `msk_bridge::host`. Every command prints the resulting host value
//! (`response`, plus `sol` or `prob`) as JSON on stdout; logs go to stderr.
//!
//! ```text
//! msk solve problem.json --options opts.json
//! msk read model.opf
//! msk write problem.json model.mps
//! msk version
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use msk_bridge::native::Mosek;
use msk_bridge::{Bridge, Outcome, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Optimize a problem and print the response and solutions
    Solve {
        /// Problem description (JSON)
        problem: PathBuf,
        /// Options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Read a problem from a solver data file (format chosen by extension)
    Read {
        /// Data file to read
        file: PathBuf,
        /// Options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Write a problem to a solver data file (format chosen by extension)
    Write {
        /// Problem description (JSON)
        problem: PathBuf,
        /// Data file to write
        file: PathBuf,
        /// Options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Print the solver library version
    Version,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.log_level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(ok) => std::process::exit(if ok { 0 } else { 1 }),
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the call ended with an OK response.
fn run(cli: Cli) -> Result<bool> {
    let bridge = Bridge::new(Mosek);

    let outcome = match cli.command {
        Commands::Version => {
            println!("{}", bridge.mosek_version());
            return Ok(true);
        }
        Commands::Solve { problem, options } => {
            let problem = read_value(&problem)?;
            let options = options.as_deref().map(read_value).transpose()?;
            bridge.mosek(&problem, options.as_ref())
        }
        Commands::Read { file, options } => {
            let options = options.as_deref().map(read_value).transpose()?;
            bridge.mosek_read(&file, options.as_ref())
        }
        Commands::Write {
            problem,
            file,
            options,
        } => {
            let problem = read_value(&problem)?;
            let options = options.as_deref().map(read_value).transpose()?;
            bridge.mosek_write(&problem, &file, options.as_ref())
        }
    };

    print_outcome(outcome, cli.pretty)
}

fn read_value(path: &Path) -> Result<Value> {
    debug!("Reading {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as a host value", path.display()))
}

fn print_outcome(outcome: Outcome, pretty: bool) -> Result<bool> {
    let ok = outcome.response.as_ref().is_some_and(|r| r.is_ok());
    let value = outcome.into_value();
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .context("Failed to serialize the result")?;
    println!("{}", text);
    Ok(ok)
}

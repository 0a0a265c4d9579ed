//! tabledb command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Start an interactive session
//! tabledb
//!
//! # Start with a saved table, without the menu
//! tabledb --load table.txt --quiet
//!
//! # Feed a script, failing fast on bad values
//! tabledb --retries 0 < script.txt
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabledb::{Session, SessionConfig, dump};

/// Line-oriented in-memory table operator
#[derive(Parser, Debug)]
#[command(name = "tabledb", version, about = "Line-oriented in-memory table operator")]
struct Args {
    /// Configuration file path
    #[arg(long, value_name = "FILE", env = "TABLEDB_CONFIG")]
    config: Option<PathBuf>,

    /// Retries allowed for a malformed value (0 fails fast)
    #[arg(short = 'r', long)]
    retries: Option<u32>,

    /// Load a saved table before starting
    #[arg(short = 'l', long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress the startup menu
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), io::stderr(), config);

    if let Some(path) = &args.load {
        let table = dump::load_from_path(path)
            .with_context(|| format!("cannot load '{}'", path.display()))?;
        session = session.with_table(table);
    }

    info!("session started");
    session.run()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tabledb=debug")
    } else {
        EnvFilter::new("tabledb=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?,
        None => SessionConfig::load_default()?,
    };

    if let Some(retries) = args.retries {
        config.retries = retries;
    }
    if args.quiet {
        config.banner = false;
    }
    Ok(config)
}

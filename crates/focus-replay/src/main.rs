#![warn(missing_docs)]

//! Entry point for the `focus-replay` binary.

mod cli;
mod error;
mod replay;
mod trace;

use std::{fs, io, path::Path, process};

use clap::Parser;
use config::FocusConfig;
use logging::MessageCollector;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::Cli,
    error::{Error, Result},
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and replay the trace.
fn run() -> Result<()> {
    let Cli {
        log,
        trace: trace_path,
        config: config_path,
        diagnostics,
    } = Cli::parse();
    let log_spec = log.spec();
    let collector = MessageCollector::default();
    // Diagnostics always see engine debug events, whatever the console shows.
    let diag_spec = logging::compute_spec(false, true, None, None);
    registry()
        .with(fmt::layer().without_time().with_writer(io::stderr).with_filter(
            logging::env_filter_from_spec(&log_spec),
        ))
        .with(
            collector
                .clone()
                .with_filter(logging::env_filter_from_spec(&diag_spec)),
        )
        .try_init()
        .ok();

    let trace = load_trace(&trace_path)?;
    let config = match config_path {
        Some(path) => config::load_from_path(&path)?,
        None => match &trace.config {
            Some(c) => {
                c.validate()?;
                c.clone()
            }
            None => FocusConfig::default(),
        },
    };
    info!(trace = %trace_path.display(), steps = trace.steps.len(), "replay_start");

    let reports = replay::run(&trace, config)?;
    let mut total = 0;
    let mut failed = 0;
    for report in &reports {
        println!("{}", report.line());
        for failure in &report.failures {
            println!("      {failure}");
        }
        total += report.checks;
        failed += report.failures.len();
    }
    if diagnostics {
        println!();
        println!("diagnostics:");
        for entry in collector.drain() {
            println!("  {}", entry.line());
        }
    }
    if failed > 0 {
        return Err(Error::Expectations { failed, total });
    }
    println!("{total} expectations passed");
    Ok(())
}

/// Read and parse a trace file.
fn load_trace(path: &Path) -> Result<trace::Trace> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    trace::parse(&text)
}

//! Command-line interface definitions for focus-replay.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `focus-replay` binary.
#[derive(Parser, Debug)]
#[command(
    name = "focus-replay",
    about = "Replay a focus trace through the dockfocus engine and check expectations",
    version
)]
pub struct Cli {
    /// Logging controls shared across dockfocus binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Trace file in RON syntax.
    #[arg(id = "trace_file", value_name = "TRACE")]
    pub trace: PathBuf,

    /// Focus configuration (RON) overriding any configuration in the trace.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print engine diagnostics collected during each step.
    #[arg(long)]
    pub diagnostics: bool,
}

//! Error handling for the focus-replay crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for focus-replay operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while replaying a trace.
#[derive(Debug, Error)]
pub enum Error {
    /// The trace file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Configuration parsing or validation errors.
    #[error("configuration error: {}", .0.pretty())]
    Config(#[from] config::Error),
    /// The trace is not valid RON or does not match the trace format.
    #[error("trace parse error: {0}")]
    TraceParse(String),
    /// A step refers to something that does not exist.
    #[error("step {index}: {message}")]
    Step {
        /// Zero-based step index.
        index: usize,
        /// What was wrong.
        message: String,
    },
    /// One or more expectations failed.
    #[error("{failed} of {total} expectations failed")]
    Expectations {
        /// Failed expectation checks.
        failed: usize,
        /// All expectation checks.
        total: usize,
    },
}

impl Error {
    /// Helper to build a step error.
    pub fn step<M: Into<String>>(index: usize, msg: M) -> Self {
        Self::Step {
            index,
            message: msg.into(),
        }
    }
}

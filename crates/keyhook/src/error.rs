//! Error types and result alias for the keyhook crate.
use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Error variants produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Underlying OS provided an error.
    #[error("OS error: {0}")]
    OsError(String),
    /// The hook could not be installed or its thread died before reporting.
    #[error("Keyboard hook failed to start")]
    HookInstall,
    /// A hook from this process is already active.
    #[error("Keyboard hook already installed")]
    AlreadyInstalled,
    /// This platform has no system-wide keyboard hook binding.
    #[error("Keyboard hook is not supported on this platform")]
    Unsupported,
    /// The hook thread could not be spawned.
    #[error("Failed to spawn hook thread: {0}")]
    ThreadSpawn(String),
}

//! Error types for the host adapter.
use std::result::Result as StdResult;

use thiserror::Error;

use crate::WakeError;

/// Crate-local `Result` alias.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by the host adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Installing or running the keyboard hook failed.
    #[error("keyboard hook: {0}")]
    Hook(#[from] keyhook::Error),
    /// Waking the UI thread failed.
    #[error("wake: {0}")]
    Wake(#[from] WakeError),
    /// The adapter was already disposed.
    #[error("adapter disposed")]
    Disposed,
}

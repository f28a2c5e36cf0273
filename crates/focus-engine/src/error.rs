use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the focus engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The platform refused or failed a focus request.
    #[error("Focus request failed: {0}")]
    FocusRequest(String),

    /// Key synthesis failed.
    #[error("Key relay error: {0}")]
    Relay(#[from] relaykey::Error),

    /// Generic error with context.
    #[error("Engine error: {0}")]
    Msg(String),
}

//! Error types and result alias for the relaykey crate.
use std::result::Result as StdResult;

use thiserror::Error;

/// Crate-local `Result` alias using the relay error type.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while synthesizing or posting events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The OS accepted fewer input events than were submitted, usually because
    /// input was blocked by a higher-integrity window.
    #[error("SendInput accepted {sent} of {expected} events")]
    SendInput {
        /// Events the OS inserted.
        sent: u32,
        /// Events submitted.
        expected: u32,
    },
    /// No key synthesis binding exists for this platform.
    #[error("key synthesis is not supported on this platform")]
    Unsupported,
}

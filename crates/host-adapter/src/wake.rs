//! Wakes the host UI thread when the keyboard hook has queued signals.
//!
//! The hook runs on its own thread. It pushes signals into a channel and
//! then calls a [`Waker`], which posts a message into the host's queue; the
//! adapter drains the channel when that message arrives.

use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Errors that can occur while waking the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeError {
    /// No target window is registered.
    TargetMissing,
    /// Posting the wake message failed (usually because the window is gone).
    PostFailed,
}

impl fmt::Display for WakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetMissing => write!(f, "no wake target window"),
            Self::PostFailed => write!(f, "failed to post wake message to host window"),
        }
    }
}

impl std::error::Error for WakeError {}

/// Posts a wake message to the UI thread. Called from the hook thread.
pub trait Waker: Send + Sync {
    /// Queue one wake. Must not block.
    fn wake(&self) -> Result<(), WakeError>;
}

/// Waker that only counts calls. The owner drains signals itself.
#[derive(Debug, Default)]
pub struct CountingWaker {
    wakes: AtomicUsize,
}

impl CountingWaker {
    /// New waker with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wakes so far.
    pub fn wakes(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }
}

impl Waker for CountingWaker {
    fn wake(&self) -> Result<(), WakeError> {
        self.wakes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_waker_counts() {
        let w = CountingWaker::new();
        w.wake().unwrap();
        w.wake().unwrap();
        assert_eq!(w.wakes(), 2);
    }

    #[test]
    fn errors_render() {
        assert_eq!(WakeError::TargetMissing.to_string(), "no wake target window");
    }
}

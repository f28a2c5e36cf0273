//! Synthesizes key events into the system input stream.
//!
//! A `RelayKey` posts KeyDown/KeyUp events through a [`Poster`]. Every event
//! produced by the platform poster carries [`eventtag::DOCKFOCUS_TAG`] so the
//! keyboard hook can recognize and ignore its own output.
//!
//! The one composite action the focus engine needs is [`RelayKey::tab_skip`]:
//! a Tab key-up followed by a Tab key-down, injected while the user still
//! holds Alt so the window switcher advances past the host's own entry.
#![warn(unsafe_op_in_unsafe_fn)]
use std::sync::Arc;

use keycode::Key;
use tracing::{debug, trace};

mod error;
#[cfg(windows)]
mod sys;

pub use error::{Error, Result};

/// Sink for synthesized key events.
pub trait Poster: Send + Sync {
    /// Post a key-down for `key`.
    fn post_down(&self, key: Key) -> Result<()>;
    /// Post a key-up for `key`.
    fn post_up(&self, key: Key) -> Result<()>;
}

/// Poster used where no synthesis binding exists.
struct NullPoster;

impl Poster for NullPoster {
    fn post_down(&self, _key: Key) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn post_up(&self, _key: Key) -> Result<()> {
        Err(Error::Unsupported)
    }
}

/// Forwards key events to a [`Poster`]. Cheap to clone.
#[derive(Clone)]
pub struct RelayKey {
    poster: Arc<dyn Poster>,
}

impl Default for RelayKey {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayKey {
    /// Create a relayer backed by the platform's input synthesis.
    pub fn new() -> Self {
        #[cfg(windows)]
        let poster: Arc<dyn Poster> = Arc::new(sys::WinPoster);
        #[cfg(not(windows))]
        let poster: Arc<dyn Poster> = Arc::new(NullPoster);
        Self { poster }
    }

    /// Create a relayer that drops everything with [`Error::Unsupported`].
    pub fn disabled() -> Self {
        Self {
            poster: Arc::new(NullPoster),
        }
    }

    /// Create a relayer around a custom poster.
    pub fn with_poster(poster: Arc<dyn Poster>) -> Self {
        Self { poster }
    }

    /// Post a key-down.
    pub fn key_down(&self, key: Key) -> Result<()> {
        trace!(key = %key.to_spec(), "relay_key_down");
        self.poster.post_down(key)
    }

    /// Post a key-up.
    pub fn key_up(&self, key: Key) -> Result<()> {
        trace!(key = %key.to_spec(), "relay_key_up");
        self.poster.post_up(key)
    }

    /// Release and re-press Tab. Stops at the first failure.
    pub fn tab_skip(&self) -> Result<()> {
        self.key_up(Key::Tab)?;
        self.key_down(Key::Tab)?;
        debug!("relayed_tab_skip");
        Ok(())
    }
}

/// One event captured by [`RecordingPoster`].
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relayed {
    /// A key-down was posted.
    Down(Key),
    /// A key-up was posted.
    Up(Key),
}

/// Poster that records events instead of injecting them.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct RecordingPoster {
    events: parking_lot::Mutex<Vec<Relayed>>,
    fail: bool,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingPoster {
    /// A poster that accepts and records everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A poster that records nothing and rejects every event.
    pub fn failing() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Snapshot of recorded events in posting order.
    pub fn events(&self) -> Vec<Relayed> {
        self.events.lock().clone()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Record one event, or reject it when configured to fail.
    fn record(&self, ev: Relayed) -> Result<()> {
        if self.fail {
            return Err(Error::SendInput {
                sent: 0,
                expected: 1,
            });
        }
        self.events.lock().push(ev);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Poster for RecordingPoster {
    fn post_down(&self, key: Key) -> Result<()> {
        self.record(Relayed::Down(key))
    }

    fn post_up(&self, key: Key) -> Result<()> {
        self.record(Relayed::Up(key))
    }
}

//! Bounded in-memory diagnostics buffer.
//!
//! [`MessageCollector`] is a tracing [`Layer`] that renders each event with
//! [`render_event`](crate::fmt::render_event) and keeps the most recent ones.
//! A host can show them in a message-log panel; the replay tool prints them
//! with `--diagnostics`. Clones share one buffer.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::fmt::{RenderedLog, render_event};

/// Default number of retained events.
pub const DEFAULT_CAPACITY: usize = 256;

/// Shared ring buffer state.
struct Buffer {
    /// Maximum retained events.
    capacity: usize,
    /// Oldest first.
    entries: VecDeque<RenderedLog>,
}

impl Buffer {
    fn push(&mut self, entry: RenderedLog) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}

/// Tracing layer retaining the most recent rendered events.
#[derive(Clone)]
pub struct MessageCollector {
    inner: Arc<Mutex<Buffer>>,
}

impl Default for MessageCollector {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MessageCollector {
    /// Create a collector retaining at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Buffer {
                capacity,
                entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            })),
        }
    }

    /// Change the capacity, discarding the oldest events if it shrank.
    pub fn set_capacity(&self, capacity: usize) {
        let mut b = self.inner.lock();
        b.capacity = capacity;
        while b.entries.len() > capacity {
            b.entries.pop_front();
        }
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// Copy of the retained events, oldest first.
    pub fn snapshot(&self) -> Vec<RenderedLog> {
        self.inner.lock().entries.iter().cloned().collect()
    }

    /// Remove and return the retained events, oldest first.
    pub fn drain(&self) -> Vec<RenderedLog> {
        self.inner.lock().entries.drain(..).collect()
    }

    /// Discard all retained events.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }
}

impl<S> Layer<S> for MessageCollector
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let rendered = render_event(event);
        self.inner.lock().push(rendered);
    }
}

//! Reentrancy-safe handle to the adapter for use from a window procedure.
//!
//! A focus request made while handling one message can synchronously
//! deliver another message (activation changes are sent, not posted) to the
//! same window procedure. The nested message cannot borrow the adapter, so
//! [`SharedAdapter`] applies the stateless caption override immediately and
//! decides from the coordinator's activation guards what happens to the
//! rest:
//! - activation changes raised by a session focus request are dropped
//! - activation changes raised while focus is released to the host are
//!   queued and later recorded without re-activating the session
//! - everything else is queued as is
//!
//! Queued events run after the outer message completes, in arrival order.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::VecDeque,
    rc::Rc,
};

use config::FocusConfig;
use focus_engine::GuardCell;
use tracing::debug;

use crate::{
    HostEvent, HostPlatform, HostWindowMessageAdapter, NativeMessage, adapter::caption_override,
    event::translate,
};

/// A message that arrived while the adapter was busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Apply as if it had arrived later.
    Event(isize, HostEvent),
    /// Host activation change seen while focus was released to the host.
    DuringRelease(bool),
}

/// Cloneable, single-threaded handle to a [`HostWindowMessageAdapter`].
#[derive(Clone)]
pub struct SharedAdapter {
    inner: Rc<RefCell<HostWindowMessageAdapter>>,
    platform: Rc<dyn HostPlatform>,
    config: Rc<FocusConfig>,
    guards: GuardCell,
    deferred: Rc<RefCell<VecDeque<Deferred>>>,
}

impl SharedAdapter {
    /// Wrap an adapter.
    pub fn new(adapter: HostWindowMessageAdapter) -> Self {
        let platform = adapter.platform();
        let config = Rc::new(adapter.config().clone());
        let guards = adapter.activation_guards();
        Self {
            inner: Rc::new(RefCell::new(adapter)),
            platform,
            config,
            guards,
            deferred: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Handle one host window message, deferring it if the adapter is busy.
    pub fn handle_native_message(&self, msg: &mut NativeMessage) -> bool {
        let consumed = match self.inner.try_borrow_mut() {
            Ok(mut adapter) => adapter.handle_native_message(msg),
            Err(_) => return self.defer(msg),
        };
        self.flush();
        consumed
    }

    /// Events waiting for the adapter.
    pub fn deferred_len(&self) -> usize {
        self.deferred.borrow().len()
    }

    fn defer(&self, msg: &mut NativeMessage) -> bool {
        if let Some(consumed) = caption_override(&self.config, &*self.platform, msg) {
            return consumed;
        }
        let Some(ev) = translate(msg, &*self.platform) else {
            return false;
        };
        let guards = self.guards.get();
        let deferred = match ev {
            HostEvent::Activated | HostEvent::Deactivated if guards.fixing_main_window_focus => {
                debug!(event = ?ev, "host_activation_suppressed_while_fixing_focus");
                return false;
            }
            HostEvent::Activated | HostEvent::Deactivated if guards.connection_releasing_focus => {
                Deferred::DuringRelease(ev == HostEvent::Activated)
            }
            _ => Deferred::Event(msg.hwnd, ev),
        };
        debug!(event = ?ev, "host_event_deferred_reentrant");
        self.deferred.borrow_mut().push_back(deferred);
        ev.consumes()
    }

    /// Run deferred events. Events deferred while flushing run too.
    fn flush(&self) {
        loop {
            let next = self.deferred.borrow_mut().pop_front();
            let Some(deferred) = next else {
                return;
            };
            match self.inner.try_borrow_mut() {
                Ok(mut adapter) => match deferred {
                    Deferred::Event(hwnd, ev) => {
                        adapter.apply(hwnd, ev);
                    }
                    Deferred::DuringRelease(active) => adapter.apply_during_release(active),
                },
                Err(_) => {
                    // Still borrowed higher up the stack; that frame flushes.
                    self.deferred.borrow_mut().push_front(deferred);
                    return;
                }
            }
        }
    }

    /// Borrow the adapter. Panics if it is already mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, HostWindowMessageAdapter> {
        self.inner.borrow()
    }

    /// Mutably borrow the adapter, then run any deferred events when the
    /// closure returns.
    pub fn with<R>(&self, f: impl FnOnce(&mut HostWindowMessageAdapter) -> R) -> R {
        let out = {
            let mut adapter: RefMut<'_, HostWindowMessageAdapter> = self.inner.borrow_mut();
            f(&mut adapter)
        };
        self.flush();
        out
    }

    /// Dispose the wrapped adapter.
    pub fn dispose(&self) {
        self.with(HostWindowMessageAdapter::dispose);
        self.deferred.borrow_mut().clear();
    }
}

//! keyhook: a system-wide keyboard hook that reports the window-switch gesture.
//!
//! The hook sees every key event regardless of which window has OS focus,
//! including keys typed into embedded child-process windows. It never
//! decides focus policy. It classifies each event, sends a [`HookSignal`]
//! over a channel, and pokes an optional notifier so the receiving UI thread
//! can drain the channel from its own message loop.
//!
//! Usage:
//! - Build an [`Interceptor`] with the sending half of a
//!   `crossbeam_channel` and a notifier that posts a message to the host
//!   window.
//! - Call [`KeyboardHook::install`]. The returned guard owns the hook
//!   thread; dropping it (or calling [`KeyboardHook::uninstall`]) removes
//!   the hook.
//!
//! On platforms without a binding, `install` fails with
//! [`Error::Unsupported`] and the caller runs without the hook.

mod error;
mod policy;
#[cfg(windows)]
mod sys;
#[cfg(not(windows))]
#[path = "unsupported.rs"]
mod sys;

use std::{
    collections::HashSet,
    fmt,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use keycode::{Chord, Key, Modifier, VirtualKeyCode};
use tracing::{debug, trace, warn};

pub use error::{Error, Result};

/// Direction of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    /// Key pressed (including OS auto-repeat).
    Down,
    /// Key released.
    Up,
}

/// One raw key event as seen by the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Windows virtual-key code.
    pub vk: VirtualKeyCode,
    /// Down or up.
    pub transition: KeyTransition,
    /// Modifiers held when the event was generated.
    pub modifiers: HashSet<Modifier>,
    /// True when the event carries our own injection marker.
    pub injected: bool,
}

impl KeyEvent {
    /// Convenience constructor for a non-injected event on a known key.
    pub fn new(
        key: Key,
        transition: KeyTransition,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Self {
        Self {
            vk: key.into(),
            transition,
            modifiers: modifiers.into_iter().collect(),
            injected: false,
        }
    }
}

/// Semantic signal handed from the hook to the focus coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSignal {
    /// Tab went down while Alt was held.
    AltCycleDetected,
    /// The configured focus toggle chord was pressed.
    FocusToggle,
}

/// What the hook tells the OS to do with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Let the event continue to the next hook and the focused window.
    PassThrough,
    /// Swallow the event.
    Consume,
}

/// Callback invoked after a signal is queued, from the hook's thread.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Stateful classifier run for every key event on the hook thread.
pub struct Interceptor {
    /// Optional chord that toggles focus between host and session.
    toggle: Option<Chord>,
    /// Keys whose key-down we swallowed; their key-up is swallowed too.
    consumed: HashSet<Key>,
    /// Channel to the UI thread.
    tx: Sender<HookSignal>,
    /// Wakes the UI thread after a send.
    notify: Option<Notify>,
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("toggle", &self.toggle)
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

impl Interceptor {
    /// Create an interceptor that reports signals on `tx`.
    pub fn new(tx: Sender<HookSignal>) -> Self {
        Self {
            toggle: None,
            consumed: HashSet::new(),
            tx,
            notify: None,
        }
    }

    /// Set (or clear) the focus toggle chord.
    pub fn with_toggle(mut self, toggle: Option<Chord>) -> Self {
        self.toggle = toggle;
        self
    }

    /// Set the notifier run after each queued signal.
    pub fn with_notify(mut self, notify: Notify) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Classify one event, queue any signal, and return the hook decision.
    pub fn on_key_event(&mut self, ev: &KeyEvent) -> HookDecision {
        let key = Key::from_vk(ev.vk);
        let mut d = policy::classify(
            ev.injected,
            key,
            ev.transition,
            &ev.modifiers,
            self.toggle.as_ref(),
        );

        if let Some(k) = key
            && !ev.injected
        {
            match ev.transition {
                KeyTransition::Down => {
                    if d.intercept && !self.consumed.insert(k) {
                        // auto-repeat of a swallowed chord: keep swallowing, report once
                        d.emit = None;
                    }
                }
                KeyTransition::Up => {
                    if self.consumed.remove(&k) {
                        d.intercept = true;
                    }
                }
            }
        }

        trace!(
            vk = ev.vk,
            ?key,
            transition = ?ev.transition,
            mods = ?ev.modifiers,
            injected = ev.injected,
            emit = ?d.emit,
            intercept = d.intercept,
            "hook_event"
        );

        if let Some(signal) = d.emit {
            self.emit(signal);
        }
        if d.intercept {
            HookDecision::Consume
        } else {
            HookDecision::PassThrough
        }
    }

    fn emit(&self, signal: HookSignal) {
        if self.tx.send(signal).is_err() {
            trace!(?signal, "hook_signal_receiver_gone");
            return;
        }
        debug!(?signal, "hook_signal");
        if let Some(notify) = &self.notify {
            notify();
        }
    }
}

/// Guard owning an installed system-wide keyboard hook.
///
/// The hook runs on its own thread with its own message loop. Dropping the
/// guard removes the hook and joins the thread.
pub struct KeyboardHook {
    /// Handle used to stop the hook thread's message loop.
    ctrl: Arc<sys::SysControl>,
    /// Hook thread; `None` once uninstalled.
    thread: Option<JoinHandle<()>>,
}

impl fmt::Debug for KeyboardHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardHook")
            .field("installed", &self.is_installed())
            .finish()
    }
}

impl KeyboardHook {
    /// Install the hook, blocking until the hook thread reports readiness.
    pub fn install(interceptor: Interceptor) -> Result<Self> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let ctrl = Arc::new(sys::SysControl::new());
        let ctrl_thread = ctrl.clone();
        let thread = thread::Builder::new()
            .name("dockfocus-keyhook".into())
            .spawn(move || {
                if let Err(e) = sys::run_hook_loop(interceptor, &ready_tx, &ctrl_thread) {
                    debug!(error = %e, "keyhook_loop_exited_with_error");
                }
            })
            .map_err(|e| Error::ThreadSpawn(e.to_string()))?;

        let ready = ready_rx.recv().unwrap_or(Err(Error::HookInstall));
        match ready {
            Ok(()) => {
                debug!("keyhook_installed");
                Ok(Self {
                    ctrl,
                    thread: Some(thread),
                })
            }
            Err(e) => {
                if thread.join().is_err() {
                    warn!("keyhook_thread_panicked");
                }
                Err(e)
            }
        }
    }

    /// True until [`uninstall`](Self::uninstall) runs.
    pub fn is_installed(&self) -> bool {
        self.thread.is_some()
    }

    /// Remove the hook and join its thread. Idempotent.
    pub fn uninstall(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.ctrl.stop();
        if thread.join().is_err() {
            warn!("keyhook_thread_panicked");
        }
        debug!("keyhook_uninstalled");
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        self.uninstall();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn alt_tab_queues_signal_and_notifies() {
        let (tx, rx) = unbounded();
        let pokes = Arc::new(AtomicUsize::new(0));
        let p = pokes.clone();
        let mut i = Interceptor::new(tx).with_notify(Arc::new(move || {
            p.fetch_add(1, Ordering::SeqCst);
        }));
        let d = i.on_key_event(&KeyEvent::new(
            Key::Tab,
            KeyTransition::Down,
            [Modifier::Alt],
        ));
        assert_eq!(d, HookDecision::PassThrough);
        assert_eq!(rx.try_recv(), Ok(HookSignal::AltCycleDetected));
        assert_eq!(pokes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn injected_tab_is_ignored() {
        let (tx, rx) = unbounded();
        let mut i = Interceptor::new(tx);
        let mut ev = KeyEvent::new(Key::Tab, KeyTransition::Down, [Modifier::Alt]);
        ev.injected = true;
        assert_eq!(i.on_key_event(&ev), HookDecision::PassThrough);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn toggle_swallows_down_repeat_and_up_but_reports_once() {
        let (tx, rx) = unbounded();
        let mut i = Interceptor::new(tx).with_toggle(Chord::parse("alt+`"));
        let down = KeyEvent::new(Key::Grave, KeyTransition::Down, [Modifier::Alt]);
        assert_eq!(i.on_key_event(&down), HookDecision::Consume);
        assert_eq!(i.on_key_event(&down), HookDecision::Consume);
        // Alt released before the grave key: the up must still be swallowed.
        let up = KeyEvent::new(Key::Grave, KeyTransition::Up, []);
        assert_eq!(i.on_key_event(&up), HookDecision::Consume);
        assert_eq!(i.on_key_event(&up), HookDecision::PassThrough);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![HookSignal::FocusToggle]);
    }

    #[test]
    fn closed_receiver_does_not_notify() {
        let (tx, rx) = unbounded();
        drop(rx);
        let pokes = Arc::new(AtomicUsize::new(0));
        let p = pokes.clone();
        let mut i = Interceptor::new(tx).with_notify(Arc::new(move || {
            p.fetch_add(1, Ordering::SeqCst);
        }));
        i.on_key_event(&KeyEvent::new(
            Key::Tab,
            KeyTransition::Down,
            [Modifier::Alt],
        ));
        assert_eq!(pokes.load(Ordering::SeqCst), 0);
    }
}

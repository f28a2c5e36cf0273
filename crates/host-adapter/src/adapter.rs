//! The host window message adapter.
//!
//! [`HostWindowMessageAdapter`] sits in the host window procedure. It turns
//! native messages into coordinator calls, applies the active-caption
//! override, relays the clipboard chain, and owns the keyboard hook whose
//! signals it drains on the UI thread.

use std::{
    panic::{self, AssertUnwindSafe},
    rc::Rc,
    sync::Arc,
};

use config::FocusConfig;
use crossbeam_channel::{Receiver, unbounded};
use focus_engine::{
    ActivationGateway, ChildFocusEvent, ChildSessionRegistry, FocusCoordinator, FocusState,
    GuardCell, SessionId, WindowId,
};
use keyhook::{HookSignal, Interceptor, KeyboardHook};
use relaykey::RelayKey;
use tracing::{debug, error, trace, warn};

use crate::{
    ClipboardChain, Error, HostEvent, HostPlatform, NativeMessage, Result, Waker, event::translate,
    wm,
};

/// Adapter between the host window procedure and the focus coordinator.
pub struct HostWindowMessageAdapter {
    coordinator: FocusCoordinator,
    registry: ChildSessionRegistry,
    platform: Rc<dyn HostPlatform>,
    clipboard: ClipboardChain,
    /// Signals queued by the hook thread.
    signals: Option<Receiver<HookSignal>>,
    hook: Option<KeyboardHook>,
    disposed: bool,
}

impl HostWindowMessageAdapter {
    /// Build an adapter and its coordinator. The hook is not installed yet.
    pub fn new(
        gateway: Rc<dyn ActivationGateway>,
        relay: RelayKey,
        platform: Rc<dyn HostPlatform>,
        config: FocusConfig,
    ) -> Self {
        Self {
            coordinator: FocusCoordinator::new(gateway, relay, config),
            registry: ChildSessionRegistry::new(),
            platform,
            clipboard: ClipboardChain::new(),
            signals: None,
            hook: None,
            disposed: false,
        }
    }

    /// Current coordinator state.
    pub fn state(&self) -> FocusState {
        self.coordinator.state()
    }

    /// Active configuration.
    pub fn config(&self) -> &FocusConfig {
        self.coordinator.config()
    }

    /// Shared view of the coordinator's activation guards.
    pub fn activation_guards(&self) -> GuardCell {
        self.coordinator.guards()
    }

    /// Attached child sessions.
    pub fn registry(&self) -> &ChildSessionRegistry {
        &self.registry
    }

    /// Platform services in use.
    pub fn platform(&self) -> Rc<dyn HostPlatform> {
        self.platform.clone()
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True while a system keyboard hook is installed.
    pub fn hook_installed(&self) -> bool {
        self.hook.as_ref().is_some_and(KeyboardHook::is_installed)
    }

    /// Build the interceptor whose signals this adapter drains. `waker` runs
    /// on the hook thread after each queued signal.
    ///
    /// An invalid toggle chord is logged and ignored.
    pub fn interceptor(&mut self, waker: Arc<dyn Waker>) -> Result<Interceptor> {
        if self.disposed {
            return Err(Error::Disposed);
        }
        let toggle = match self.coordinator.config().focus_toggle_chord() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "focus_toggle_chord_ignored");
                None
            }
        };
        let (tx, rx) = unbounded();
        self.signals = Some(rx);
        let notify: keyhook::Notify = Arc::new(move || {
            if let Err(e) = waker.wake() {
                warn!(error = %e, "hook_wake_failed");
            }
        });
        Ok(Interceptor::new(tx).with_toggle(toggle).with_notify(notify))
    }

    /// Install the system keyboard hook. On failure focus forwarding for the
    /// window-switch gesture is disabled and everything else keeps working.
    pub fn install_keyboard_hook(&mut self, waker: Arc<dyn Waker>) -> Result<()> {
        if self.hook.is_some() {
            return Err(Error::Hook(keyhook::Error::AlreadyInstalled));
        }
        let interceptor = self.interceptor(waker)?;
        match KeyboardHook::install(interceptor) {
            Ok(hook) => {
                self.hook = Some(hook);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "keyboard_hook_unavailable_focus_forwarding_disabled");
                self.signals = None;
                Err(e.into())
            }
        }
    }

    /// Register the clipboard viewer that follows the host in the chain.
    pub fn set_clipboard_next(&mut self, next: Option<isize>) {
        self.clipboard.set_next(next);
    }

    /// Current next clipboard viewer.
    pub fn clipboard_next(&self) -> Option<isize> {
        self.clipboard.next()
    }

    /// A session protocol docked an embedded window.
    pub fn attach_session(&mut self, session: SessionId, window: WindowId, tab: &str) {
        if self.disposed {
            return;
        }
        self.registry.attach(session, window, tab);
    }

    /// A session's embedded window reported a focus change.
    pub fn session_focus_changed(&mut self, session: &SessionId, has_focus: bool) {
        if self.disposed {
            return;
        }
        let ev = self.registry.focus_changed(session, has_focus);
        self.child_focus_event(ev);
    }

    /// A session disconnected.
    pub fn detach_session(&mut self, session: &SessionId) {
        if self.disposed {
            return;
        }
        let ev = self.registry.detach(session);
        self.child_focus_event(ev);
    }

    fn child_focus_event(&mut self, ev: Option<ChildFocusEvent>) {
        match ev {
            Some(ChildFocusEvent::Gained(_)) => self.coordinator.child_gained_focus(),
            Some(ChildFocusEvent::Lost(_)) => self.coordinator.child_lost_focus(),
            None => {}
        }
    }

    /// The selected session tab changed.
    pub fn active_tab_changed(&mut self) {
        if !self.disposed {
            self.coordinator.active_tab_changed();
        }
    }

    /// A session tab header was clicked.
    pub fn tab_clicked(&mut self) {
        if !self.disposed {
            self.coordinator.tab_clicked();
        }
    }

    /// Handle one host window message. Returns true when the message was
    /// consumed and `msg.result` holds the window procedure's return value.
    ///
    /// Panics are caught here and logged; the message then falls through to
    /// default handling.
    pub fn handle_native_message(&mut self, msg: &mut NativeMessage) -> bool {
        if self.disposed {
            return false;
        }
        let snapshot = *msg;
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(msg))) {
            Ok(consumed) => consumed,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!(
                    msg = snapshot.msg,
                    wparam = snapshot.wparam,
                    lparam = snapshot.lparam,
                    detail,
                    "host_message_handler_panicked"
                );
                *msg = snapshot;
                false
            }
        }
    }

    fn dispatch(&mut self, msg: &mut NativeMessage) -> bool {
        if let Some(consumed) = caption_override(self.coordinator.config(), &*self.platform, msg) {
            return consumed;
        }
        let hwnd = msg.hwnd;
        match translate(msg, &*self.platform) {
            Some(ev) => self.apply(hwnd, ev),
            None => false,
        }
    }

    /// Apply a translated event. `hwnd` is the host window the event was
    /// addressed to. Returns whether the message is consumed.
    pub fn apply(&mut self, hwnd: isize, ev: HostEvent) -> bool {
        if self.disposed {
            return false;
        }
        match ev {
            HostEvent::Activated => self.coordinator.host_activated(),
            HostEvent::Deactivated => self.coordinator.host_deactivated(),
            HostEvent::Clicked => self.coordinator.host_clicked(),
            HostEvent::SizeMoveBegin => self.coordinator.size_move_begin(),
            HostEvent::SizeMoveEnd => self.coordinator.size_move_end(),
            HostEvent::PositionChanged { activating } => {
                self.coordinator.window_position_changed(activating)
            }
            HostEvent::HookSignal => self.drain_signals(),
            HostEvent::ClipboardChanged { wparam, lparam } => {
                self.clipboard.changed(hwnd, wparam, lparam, &*self.platform)
            }
            HostEvent::ClipboardChainChanged {
                removed,
                replacement,
            } => self
                .clipboard
                .chain_changed(hwnd, removed, replacement, &*self.platform),
        }
        ev.consumes()
    }

    /// Apply a host activation change that arrived while focus was being
    /// released to the host.
    pub fn apply_during_release(&mut self, active: bool) {
        if !self.disposed {
            self.coordinator.host_activation_during_release(active);
        }
    }

    /// Deliver every queued hook signal to the coordinator.
    pub fn drain_signals(&mut self) {
        let Some(rx) = &self.signals else {
            trace!("hook_signal_without_receiver");
            return;
        };
        let pending: Vec<HookSignal> = rx.try_iter().collect();
        for signal in pending {
            match signal {
                HookSignal::AltCycleDetected => {
                    self.coordinator.alt_cycle_detected();
                }
                HookSignal::FocusToggle => self.coordinator.focus_toggle_requested(),
            }
        }
    }

    /// Release the keyboard hook and stop reacting to messages. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(mut hook) = self.hook.take() {
            hook.uninstall();
        }
        self.signals = None;
        debug!("host_adapter_disposed");
    }
}

impl Drop for HostWindowMessageAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Apply the active-caption override when `msg` is `WM_NCACTIVATE` and the
/// override is enabled. Stateless. Returns `Some(consumed)` when handled.
pub(crate) fn caption_override(
    config: &FocusConfig,
    platform: &dyn HostPlatform,
    msg: &mut NativeMessage,
) -> Option<bool> {
    if msg.msg != wm::WM_NCACTIVATE || !config.keep_caption_active {
        return None;
    }
    trace!(requested_active = msg.wparam != 0, "caption_forced_active");
    msg.result = platform.draw_caption_active(msg);
    Some(true)
}

#[cfg(test)]
mod tests {
    use focus_engine::sim::SimGateway;
    use keyhook::{HookDecision, KeyEvent, KeyTransition};
    use keycode::{Key, Modifier};
    use relaykey::{RecordingPoster, Relayed};

    use super::*;
    use crate::{CountingWaker, sim::SimPlatform};

    const HOST: isize = 0x10;

    struct Rig {
        adapter: HostWindowMessageAdapter,
        gateway: Rc<SimGateway>,
        platform: Rc<SimPlatform>,
        poster: Arc<RecordingPoster>,
    }

    fn rig(config: FocusConfig) -> Rig {
        let gateway = Rc::new(SimGateway::new());
        gateway.add_tab("prod", Some(WindowId(0x100)));
        gateway.select("prod");
        let platform = Rc::new(SimPlatform::new());
        let poster = Arc::new(RecordingPoster::new());
        let adapter = HostWindowMessageAdapter::new(
            gateway.clone(),
            RelayKey::with_poster(poster.clone()),
            platform.clone(),
            config,
        );
        Rig {
            adapter,
            gateway,
            platform,
            poster,
        }
    }

    fn send(a: &mut HostWindowMessageAdapter, msg: u32, wparam: usize, lparam: isize) -> bool {
        a.handle_native_message(&mut NativeMessage::new(HOST, msg, wparam, lparam))
    }

    #[test]
    fn caption_is_always_drawn_active() {
        let Rig {
            mut adapter,
            platform,
            ..
        } = rig(FocusConfig::default());
        let mut m = NativeMessage::new(HOST, wm::WM_NCACTIVATE, 0, 0);
        assert!(adapter.handle_native_message(&mut m));
        assert_eq!(m.result, 1);
        assert_eq!(platform.caption_draws(), 1);
        // Regardless of coordinator state.
        send(&mut adapter, wm::WM_ACTIVATEAPP, 1, 0);
        assert!(send(&mut adapter, wm::WM_NCACTIVATE, 1, 0));
        assert_eq!(platform.caption_draws(), 2);
    }

    #[test]
    fn caption_override_can_be_disabled() {
        let Rig {
            mut adapter,
            platform,
            ..
        } = rig(FocusConfig {
            keep_caption_active: false,
            ..FocusConfig::default()
        });
        assert!(!send(&mut adapter, wm::WM_NCACTIVATE, 0, 0));
        assert_eq!(platform.caption_draws(), 0);
    }

    #[test]
    fn session_focus_drives_coordinator() {
        let Rig {
            mut adapter,
            gateway,
            ..
        } = rig(FocusConfig::default());
        let id = SessionId::from("ssh-1");
        adapter.attach_session(id.clone(), WindowId(0x100), "prod");
        adapter.session_focus_changed(&id, true);
        adapter.session_focus_changed(&id, true);
        assert_eq!(adapter.state().child_focus_count, 1);
        adapter.session_focus_changed(&id, false);
        assert!(adapter.state().child_process_held_last_focus);
        assert!(!send(&mut adapter, wm::WM_ACTIVATEAPP, 1, 0));
        assert_eq!(gateway.focus_requests(), 1);
    }

    #[test]
    fn detaching_focused_session_balances_count() {
        let Rig { mut adapter, .. } = rig(FocusConfig::default());
        let id = SessionId::from("ssh-1");
        adapter.attach_session(id.clone(), WindowId(0x100), "prod");
        adapter.session_focus_changed(&id, true);
        adapter.detach_session(&id);
        assert_eq!(adapter.state().child_focus_count, 0);
        assert!(adapter.registry().is_empty());
    }

    #[test]
    fn hook_signals_are_drained_on_wake_message() {
        let Rig {
            mut adapter,
            poster,
            ..
        } = rig(FocusConfig::default());
        let waker = Arc::new(CountingWaker::new());
        let mut interceptor = adapter.interceptor(waker.clone()).unwrap();
        let id = SessionId::from("ssh-1");
        adapter.attach_session(id.clone(), WindowId(0x100), "prod");
        adapter.session_focus_changed(&id, true);

        let ev = KeyEvent::new(Key::Tab, KeyTransition::Down, [Modifier::Alt]);
        assert_eq!(interceptor.on_key_event(&ev), HookDecision::PassThrough);
        assert_eq!(waker.wakes(), 1);
        // Nothing happens until the UI thread sees the wake message.
        assert!(poster.events().is_empty());
        assert!(send(&mut adapter, wm::WM_DOCKFOCUS_SIGNAL, 0, 0));
        assert_eq!(
            poster.events(),
            vec![Relayed::Up(Key::Tab), Relayed::Down(Key::Tab)]
        );
        assert!(!adapter.state().main_window_focused);
    }

    #[test]
    fn toggle_chord_from_config_reaches_coordinator() {
        let Rig {
            mut adapter,
            gateway,
            ..
        } = rig(FocusConfig {
            focus_toggle: Some("alt+`".into()),
            ..FocusConfig::default()
        });
        let mut interceptor = adapter.interceptor(Arc::new(CountingWaker::new())).unwrap();
        send(&mut adapter, wm::WM_ACTIVATEAPP, 1, 0);
        let ev = KeyEvent::new(Key::Grave, KeyTransition::Down, [Modifier::Alt]);
        assert_eq!(interceptor.on_key_event(&ev), HookDecision::Consume);
        send(&mut adapter, wm::WM_DOCKFOCUS_SIGNAL, 0, 0);
        assert_eq!(gateway.focus_requests(), 1);
    }

    #[test]
    fn invalid_toggle_chord_is_ignored() {
        let Rig { mut adapter, .. } = rig(FocusConfig {
            focus_toggle: Some("alt+tab".into()),
            ..FocusConfig::default()
        });
        let mut interceptor = adapter.interceptor(Arc::new(CountingWaker::new())).unwrap();
        let ev = KeyEvent::new(Key::Grave, KeyTransition::Down, [Modifier::Alt]);
        assert_eq!(interceptor.on_key_event(&ev), HookDecision::PassThrough);
    }

    #[test]
    fn clipboard_messages_are_relayed_not_consumed() {
        let Rig {
            mut adapter,
            platform,
            ..
        } = rig(FocusConfig::default());
        adapter.set_clipboard_next(Some(0x77));
        assert!(!send(&mut adapter, wm::WM_DRAWCLIPBOARD, 0, 0));
        assert!(!send(&mut adapter, wm::WM_CHANGECBCHAIN, 0x77, 0x78));
        assert_eq!(adapter.clipboard_next(), Some(0x78));
        assert_eq!(platform.sent().len(), 1);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_dispatch() {
        let Rig {
            mut adapter,
            gateway,
            ..
        } = rig(FocusConfig::default());
        adapter.dispose();
        adapter.dispose();
        assert!(adapter.is_disposed());
        assert!(!send(&mut adapter, wm::WM_NCACTIVATE, 0, 0));
        adapter.active_tab_changed();
        assert_eq!(gateway.focus_requests(), 0);
        assert_eq!(
            adapter.interceptor(Arc::new(CountingWaker::new())).unwrap_err(),
            Error::Disposed
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn hook_install_failure_degrades() {
        let Rig { mut adapter, .. } = rig(FocusConfig::default());
        let err = adapter
            .install_keyboard_hook(Arc::new(CountingWaker::new()))
            .unwrap_err();
        assert_eq!(err, Error::Hook(keyhook::Error::Unsupported));
        assert!(!adapter.hook_installed());
        // Messages still work.
        assert!(send(&mut adapter, wm::WM_NCACTIVATE, 0, 0));
    }

    #[test]
    fn panics_fall_through_to_default_handling() {
        let Rig {
            mut adapter,
            platform,
            ..
        } = rig(FocusConfig::default());
        platform.panic_on_caption(true);
        let mut m = NativeMessage::new(HOST, wm::WM_NCACTIVATE, 0, 5);
        assert!(!adapter.handle_native_message(&mut m));
        assert_eq!(m.result, 0);
        platform.panic_on_caption(false);
        assert!(send(&mut adapter, wm::WM_NCACTIVATE, 0, 0));
    }
}

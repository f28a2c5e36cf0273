//! The focus state machine.
//!
//! [`FocusCoordinator`] consumes semantic events from three domains (the
//! host window, the embedded windows, and the keyboard hook) and decides
//! when to hand OS focus back to the active session's embedded window.
//!
//! All methods run on the host's UI thread and complete synchronously. The
//! guard flags in [`FocusState`] are set and cleared within one call.

use std::rc::Rc;

use config::FocusConfig;
use relaykey::RelayKey;
use tracing::{debug, trace, warn};

use crate::{ActivationGateway, FocusState, GuardCell};

/// Outcome of [`FocusCoordinator::activate_connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A focus request was issued for the active session's window.
    Requested,
    /// No session tab is selected.
    NoActiveTab,
    /// The selected tab has no embedded window.
    NoEmbeddedWindow,
    /// The platform rejected the focus request.
    RequestFailed,
}

/// Single owner of [`FocusState`].
pub struct FocusCoordinator {
    /// Everything but the activation guards, which live in `guards`.
    state: FocusState,
    guards: GuardCell,
    gateway: Rc<dyn ActivationGateway>,
    relay: RelayKey,
    config: FocusConfig,
}

impl FocusCoordinator {
    /// Create a coordinator with a fresh state.
    pub fn new(gateway: Rc<dyn ActivationGateway>, relay: RelayKey, config: FocusConfig) -> Self {
        Self {
            state: FocusState::default(),
            guards: GuardCell::default(),
            gateway,
            relay,
            config,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> FocusState {
        let g = self.guards.get();
        FocusState {
            fixing_main_window_focus: g.fixing_main_window_focus,
            connection_releasing_focus: g.connection_releasing_focus,
            ..self.state
        }
    }

    /// Shared view of the activation guards, for code that queues host
    /// messages arriving while the coordinator is busy.
    pub fn guards(&self) -> GuardCell {
        self.guards.clone()
    }

    /// Active configuration.
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    fn set_held_last(&mut self, held: bool) {
        if self.state.child_process_held_last_focus != held {
            debug!(held, "child_process_held_last_focus");
        }
        self.state.child_process_held_last_focus = held;
    }

    /// An embedded window reported OS focus.
    pub fn child_gained_focus(&mut self) {
        self.state.child_focus_count += 1;
        self.set_held_last(true);
        debug!(count = self.state.child_focus_count, "child_focus_gained");
    }

    /// An embedded window reported losing OS focus.
    pub fn child_lost_focus(&mut self) {
        if self.state.child_focus_count == 0 {
            warn!("child_focus_lost_without_gain");
            return;
        }
        self.state.child_focus_count -= 1;
        let held = !self.state.main_window_focused && self.state.child_focus_count == 0;
        self.set_held_last(held);
        debug!(count = self.state.child_focus_count, "child_focus_lost");
    }

    /// The host window became the active application window.
    pub fn host_activated(&mut self) {
        if self.guards.get().fixing_main_window_focus {
            trace!("host_activated_ignored_while_fixing_focus");
            return;
        }
        debug!(held_last = self.state.child_process_held_last_focus, "host_activated");
        self.set_main_window_focused(true);
    }

    /// The host window stopped being the active application window.
    pub fn host_deactivated(&mut self) {
        if self.guards.get().fixing_main_window_focus {
            trace!("host_deactivated_ignored_while_fixing_focus");
            return;
        }
        debug!(held_last = self.state.child_process_held_last_focus, "host_deactivated");
        self.set_main_window_focused(false);
    }

    fn set_main_window_focused(&mut self, focused: bool) {
        if self.state.main_window_focused == focused {
            return;
        }
        if focused
            && self.state.child_process_held_last_focus
            && !self.guards.get().connection_releasing_focus
        {
            self.activate_connection();
        }
        self.state.main_window_focused = focused;
    }

    /// The user clicked inside the host chrome. During a size/move gesture
    /// the click is left to the gesture end, which re-activates the session.
    pub fn host_clicked(&mut self) {
        if self.state.in_size_move {
            trace!("host_click_deferred_to_size_move_end");
            return;
        }
        if self.state.child_process_held_last_focus {
            debug!("host_clicked_releasing_child_focus");
            self.set_held_last(false);
        }
    }

    /// An interactive size/move of the host began.
    pub fn size_move_begin(&mut self) {
        debug!("size_move_begin");
        self.state.in_size_move = true;
    }

    /// An interactive size/move of the host ended.
    pub fn size_move_end(&mut self) {
        debug!("size_move_end");
        self.state.in_size_move = false;
        self.activate_connection();
    }

    /// The host's position or z-order changed. `activating` is true when the
    /// change also activated the window.
    pub fn window_position_changed(&mut self, activating: bool) {
        if self.state.main_window_focused && !self.state.in_size_move && activating {
            debug!("window_position_changed_activating");
            self.activate_connection();
        }
    }

    /// The keyboard hook saw the window-switch gesture start. Returns true
    /// when the corrective Tab up/down pair was attempted.
    pub fn alt_cycle_detected(&mut self) -> bool {
        debug!(
            child_focused = self.state.child_process_focused(),
            held_last = self.state.child_process_held_last_focus,
            app_focused = self.state.app_focused(),
            fixing = self.state.fixing_alt_tab,
            "alt_cycle_detected"
        );
        if !self.config.alt_tab_fix {
            return false;
        }
        if !(self.state.child_process_held_last_focus
            && self.state.app_focused()
            && !self.state.fixing_alt_tab)
        {
            return false;
        }
        self.state.fixing_alt_tab = true;
        // The extra Tab skips the host's own entry in the switcher.
        if let Err(e) = self.relay.tab_skip() {
            warn!(error = %e, "alt_tab_fix_relay_failed");
        }
        // The host never had focus, so no deactivation will arrive for it.
        self.set_main_window_focused(false);
        self.state.fixing_alt_tab = false;
        true
    }

    /// The focus-toggle chord was pressed.
    pub fn focus_toggle_requested(&mut self) {
        if self.state.child_process_focused() {
            debug!("focus_toggle_to_host");
            self.set_held_last(false);
            let gateway = self.gateway.clone();
            let res = self
                .guards
                .raised(|g| g.connection_releasing_focus = true, || gateway.focus_host());
            if let Err(e) = res {
                warn!(error = %e, "focus_host_failed");
            }
        } else if self.state.main_window_focused {
            debug!("focus_toggle_to_session");
            self.activate_connection();
        } else {
            trace!("focus_toggle_ignored_app_unfocused");
        }
    }

    /// A host activation change that arrived while focus was being released
    /// to the host. Records it without re-activating the session.
    pub fn host_activation_during_release(&mut self, active: bool) {
        debug!(active, "host_activation_during_release");
        let guards = self.guards.clone();
        guards.raised(
            |g| g.connection_releasing_focus = true,
            || self.set_main_window_focused(active),
        );
    }

    /// The selected session tab changed.
    pub fn active_tab_changed(&mut self) {
        if self.config.activate_on_tab_change {
            debug!("active_tab_changed");
            self.activate_connection();
        }
    }

    /// A session tab header was clicked.
    pub fn tab_clicked(&mut self) {
        if self.config.activate_on_tab_change {
            debug!("tab_clicked");
            self.activate_connection();
        }
    }

    /// Request OS focus for the active session's embedded window.
    pub fn activate_connection(&mut self) -> Activation {
        let Some(tab) = self.gateway.active_tab() else {
            debug!("activate_connection_no_active_tab");
            return Activation::NoActiveTab;
        };
        let Some(window) = tab.embedded_window() else {
            debug!(tab = %tab.name(), "activate_connection_no_embedded_window");
            return Activation::NoEmbeddedWindow;
        };
        let res = self
            .guards
            .raised(|g| g.fixing_main_window_focus = true, || window.request_focus());
        match res {
            Ok(()) => {
                debug!(tab = %tab.name(), window = %window.id(), "activate_connection");
                Activation::Requested
            }
            Err(e) => {
                warn!(tab = %tab.name(), window = %window.id(), error = %e, "focus_request_failed");
                Activation::RequestFailed
            }
        }
    }
}

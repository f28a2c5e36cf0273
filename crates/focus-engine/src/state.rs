//! Focus state owned by the coordinator.

use std::{cell::Cell, rc::Rc};

/// Everything the coordinator knows about focus across the host window and
/// its embedded child-process windows.
///
/// The guard flags are scoped to a single synchronous coordinator call and
/// are always false between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    /// The host window is the OS-active application window.
    pub main_window_focused: bool,
    /// Number of embedded windows currently reporting OS focus.
    pub child_focus_count: usize,
    /// The most recent focus holder inside the application was an embedded
    /// window, so re-activating the host should hand focus back to it.
    pub child_process_held_last_focus: bool,
    /// Set while the window-switch correction is running.
    pub fixing_alt_tab: bool,
    /// Set between the start and end of an interactive size/move.
    pub in_size_move: bool,
    /// Set while a focus request for an embedded window runs. Host
    /// activation and deactivation writes are suppressed meanwhile.
    pub fixing_main_window_focus: bool,
    /// Set while focus is deliberately handed from a session to the host.
    /// Host activation meanwhile must not re-activate the session.
    pub connection_releasing_focus: bool,
}

impl FocusState {
    /// At least one embedded window has OS focus.
    pub fn child_process_focused(&self) -> bool {
        self.child_focus_count > 0
    }

    /// Some part of the application (host or embedded window) has focus.
    pub fn app_focused(&self) -> bool {
        self.main_window_focused || self.child_process_focused()
    }

    /// True when no guard flag is set.
    pub fn guards_clear(&self) -> bool {
        !self.fixing_alt_tab && !self.fixing_main_window_focus && !self.connection_releasing_focus
    }
}

/// The guard flags raised around the coordinator's synchronous focus calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationGuards {
    /// See [`FocusState::fixing_main_window_focus`].
    pub fixing_main_window_focus: bool,
    /// See [`FocusState::connection_releasing_focus`].
    pub connection_releasing_focus: bool,
}

/// Shared view of the coordinator's [`ActivationGuards`].
///
/// Window messages that re-enter the host while the coordinator is busy
/// cannot reach it directly; whoever queues them reads the guards here to
/// decide what the coordinator would have done with them.
#[derive(Debug, Clone, Default)]
pub struct GuardCell(Rc<Cell<ActivationGuards>>);

impl GuardCell {
    /// Current guards.
    pub fn get(&self) -> ActivationGuards {
        self.0.get()
    }

    /// Run `f` with the guards changed by `raise`, restoring them afterwards.
    pub(crate) fn raised<R>(
        &self,
        raise: impl FnOnce(&mut ActivationGuards),
        f: impl FnOnce() -> R,
    ) -> R {
        let before = self.0.get();
        let mut during = before;
        raise(&mut during);
        self.0.set(during);
        let out = f();
        self.0.set(before);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_flags() {
        let mut s = FocusState::default();
        assert!(!s.child_process_focused());
        assert!(!s.app_focused());
        s.child_focus_count = 2;
        assert!(s.child_process_focused());
        assert!(s.app_focused());
        s.child_focus_count = 0;
        s.main_window_focused = true;
        assert!(s.app_focused());
        assert!(s.guards_clear());
    }

    #[test]
    fn raised_guards_are_restored() {
        let cell = GuardCell::default();
        let view = cell.clone();
        let seen = cell.raised(
            |g| g.fixing_main_window_focus = true,
            || view.get().fixing_main_window_focus,
        );
        assert!(seen);
        assert_eq!(view.get(), ActivationGuards::default());
    }
}

//! Translation from native messages to semantic host events.

use tracing::trace;

use crate::{HostPlatform, NativeMessage, wm};

/// A host window message with meaning for focus coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host became the active application.
    Activated,
    /// The host stopped being the active application.
    Deactivated,
    /// A click landed inside the host's client area.
    Clicked,
    /// Interactive size/move started.
    SizeMoveBegin,
    /// Interactive size/move ended.
    SizeMoveEnd,
    /// Position or z-order changed.
    PositionChanged {
        /// The change activated the window.
        activating: bool,
    },
    /// The keyboard hook queued signals.
    HookSignal,
    /// Clipboard contents changed.
    ClipboardChanged {
        /// Original `wparam`.
        wparam: usize,
        /// Original `lparam`.
        lparam: isize,
    },
    /// A viewer left the clipboard chain.
    ClipboardChainChanged {
        /// The leaving window.
        removed: isize,
        /// The window that followed it.
        replacement: isize,
    },
}

impl HostEvent {
    /// Whether the host window procedure should skip default handling.
    pub fn consumes(&self) -> bool {
        matches!(self, Self::HookSignal)
    }
}

/// Map a native message to a host event. Never consults adapter state, so it
/// is safe to call while the adapter is busy.
pub fn translate(msg: &NativeMessage, platform: &dyn HostPlatform) -> Option<HostEvent> {
    let ev = match msg.msg {
        wm::WM_PARENTNOTIFY => match msg.wparam_low() {
            wm::WM_CREATE | wm::WM_DESTROY => return None,
            _ => HostEvent::Clicked,
        },
        wm::WM_ACTIVATEAPP if msg.wparam == 0 => HostEvent::Deactivated,
        wm::WM_ACTIVATEAPP => HostEvent::Activated,
        wm::WM_ENTERSIZEMOVE => HostEvent::SizeMoveBegin,
        wm::WM_EXITSIZEMOVE => HostEvent::SizeMoveEnd,
        wm::WM_WINDOWPOSCHANGED => HostEvent::PositionChanged {
            activating: (platform.window_pos_flags(msg) & wm::SWP_NOACTIVATE) == 0,
        },
        wm::WM_DOCKFOCUS_SIGNAL => HostEvent::HookSignal,
        wm::WM_DRAWCLIPBOARD => HostEvent::ClipboardChanged {
            wparam: msg.wparam,
            lparam: msg.lparam,
        },
        wm::WM_CHANGECBCHAIN => HostEvent::ClipboardChainChanged {
            removed: msg.wparam as isize,
            replacement: msg.lparam,
        },
        _ => return None,
    };
    trace!(msg = msg.msg, event = ?ev, "host_message_translated");
    Some(ev)
}

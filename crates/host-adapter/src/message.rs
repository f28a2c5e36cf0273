//! Platform-neutral form of a host window message.

/// Window message numbers and flags the adapter understands.
pub mod wm {
    /// Sent when a window is created; also a `WM_PARENTNOTIFY` sub-event.
    pub const WM_CREATE: u32 = 0x0001;
    /// Sent when a window is destroyed; also a `WM_PARENTNOTIFY` sub-event.
    pub const WM_DESTROY: u32 = 0x0002;
    /// The active application changed. `wparam` is nonzero on activation.
    pub const WM_ACTIVATEAPP: u32 = 0x001C;
    /// Position, size or z-order changed. `lparam` points at a `WINDOWPOS`.
    pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
    /// The non-client area must be redrawn as active (`wparam` nonzero) or inactive.
    pub const WM_NCACTIVATE: u32 = 0x0086;
    /// Something happened to a child window, including clicks inside it.
    pub const WM_PARENTNOTIFY: u32 = 0x0210;
    /// An interactive move or resize started.
    pub const WM_ENTERSIZEMOVE: u32 = 0x0231;
    /// An interactive move or resize ended.
    pub const WM_EXITSIZEMOVE: u32 = 0x0232;
    /// Clipboard contents changed; relay to the next viewer.
    pub const WM_DRAWCLIPBOARD: u32 = 0x0308;
    /// A viewer left the clipboard chain. `wparam` is the leaving window,
    /// `lparam` the window that follows it.
    pub const WM_CHANGECBCHAIN: u32 = 0x030D;
    /// First application-private message number.
    pub const WM_APP: u32 = 0x8000;
    /// Posted by the keyboard hook thread when signals are waiting.
    pub const WM_DOCKFOCUS_SIGNAL: u32 = WM_APP + 0x2A;
    /// `WINDOWPOS::flags` bit: the change did not activate the window.
    pub const SWP_NOACTIVATE: u32 = 0x0010;
}

/// One window message delivered to the host window procedure.
///
/// `result` is the value the window procedure returns when the adapter
/// consumes the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeMessage {
    /// Receiving window.
    pub hwnd: isize,
    /// Message number.
    pub msg: u32,
    /// First parameter.
    pub wparam: usize,
    /// Second parameter.
    pub lparam: isize,
    /// Return value when consumed.
    pub result: isize,
}

impl NativeMessage {
    /// Message for `hwnd` with zero result.
    pub fn new(hwnd: isize, msg: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            hwnd,
            msg,
            wparam,
            lparam,
            result: 0,
        }
    }

    /// Low 16 bits of `wparam`.
    pub fn wparam_low(&self) -> u32 {
        (self.wparam & 0xFFFF) as u32
    }
}

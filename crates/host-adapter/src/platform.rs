//! Calls the adapter makes back into the windowing system.

use crate::NativeMessage;

/// Window-system services needed while handling host messages.
pub trait HostPlatform {
    /// Run default processing for `WM_NCACTIVATE` as if the window were
    /// active and return the window procedure result.
    fn draw_caption_active(&self, msg: &NativeMessage) -> isize;

    /// `WINDOWPOS::flags` for a `WM_WINDOWPOSCHANGED` message.
    fn window_pos_flags(&self, msg: &NativeMessage) -> u32;

    /// Synchronously deliver `msg` to window `target`.
    fn send_to(&self, target: isize, msg: &NativeMessage) -> isize;
}

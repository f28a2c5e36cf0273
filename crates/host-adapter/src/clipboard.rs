//! Clipboard viewer chain relay.
//!
//! A window in the legacy clipboard viewer chain must forward
//! `WM_DRAWCLIPBOARD` to the next viewer and keep its next-viewer handle
//! current when viewers leave the chain.

use tracing::debug;

use crate::{HostPlatform, NativeMessage, wm};

/// The host's position in the clipboard viewer chain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardChain {
    next: Option<isize>,
}

impl ClipboardChain {
    /// Chain with no next viewer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the viewer that followed the host when it joined the chain.
    pub fn set_next(&mut self, next: Option<isize>) {
        self.next = next.filter(|h| *h != 0);
    }

    /// Current next viewer.
    pub fn next(&self) -> Option<isize> {
        self.next
    }

    /// Relay a clipboard change notification.
    pub fn changed(&self, hwnd: isize, wparam: usize, lparam: isize, platform: &dyn HostPlatform) {
        if let Some(next) = self.next {
            let msg = NativeMessage::new(hwnd, wm::WM_DRAWCLIPBOARD, wparam, lparam);
            platform.send_to(next, &msg);
        }
    }

    /// Handle a viewer leaving the chain.
    pub fn chain_changed(
        &mut self,
        hwnd: isize,
        removed: isize,
        replacement: isize,
        platform: &dyn HostPlatform,
    ) {
        if Some(removed) == self.next {
            debug!(removed, replacement, "clipboard_next_viewer_replaced");
            self.set_next(Some(replacement));
        } else if let Some(next) = self.next {
            let msg = NativeMessage::new(hwnd, wm::WM_CHANGECBCHAIN, removed as usize, replacement);
            platform.send_to(next, &msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPlatform;

    #[test]
    fn draw_is_relayed_unmodified() {
        let p = SimPlatform::new();
        let mut c = ClipboardChain::new();
        c.changed(1, 0, 0, &p);
        assert!(p.sent().is_empty());
        c.set_next(Some(42));
        c.changed(1, 7, 9, &p);
        let sent = p.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert_eq!(sent[0].1.msg, wm::WM_DRAWCLIPBOARD);
        assert_eq!((sent[0].1.wparam, sent[0].1.lparam), (7, 9));
    }

    #[test]
    fn removing_next_viewer_adopts_replacement() {
        let p = SimPlatform::new();
        let mut c = ClipboardChain::new();
        c.set_next(Some(42));
        c.chain_changed(1, 42, 43, &p);
        assert_eq!(c.next(), Some(43));
        assert!(p.sent().is_empty());
    }

    #[test]
    fn removing_other_viewer_is_passed_on() {
        let p = SimPlatform::new();
        let mut c = ClipboardChain::new();
        c.set_next(Some(42));
        c.chain_changed(1, 50, 51, &p);
        assert_eq!(c.next(), Some(42));
        assert_eq!(p.sent()[0].1.msg, wm::WM_CHANGECBCHAIN);
    }

    #[test]
    fn last_viewer_leaving_empties_chain() {
        let p = SimPlatform::new();
        let mut c = ClipboardChain::new();
        c.set_next(Some(42));
        c.chain_changed(1, 42, 0, &p);
        assert_eq!(c.next(), None);
    }
}

//! Recording platform for tests and trace replay.

use std::cell::{Cell, RefCell};

use crate::{HostPlatform, NativeMessage};

/// [`HostPlatform`] that records calls.
///
/// `WM_WINDOWPOSCHANGED` carries the `WINDOWPOS` flags directly in `lparam`.
#[derive(Debug, Default)]
pub struct SimPlatform {
    caption_draws: Cell<usize>,
    sent: RefCell<Vec<(isize, NativeMessage)>>,
    panic_on_caption: Cell<bool>,
}

impl SimPlatform {
    /// Platform with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of forced-active caption draws.
    pub fn caption_draws(&self) -> usize {
        self.caption_draws.get()
    }

    /// Messages sent to other windows, with their targets.
    pub fn sent(&self) -> Vec<(isize, NativeMessage)> {
        self.sent.borrow().clone()
    }

    /// Make caption drawing panic, to exercise the adapter's panic boundary.
    pub fn panic_on_caption(&self, on: bool) {
        self.panic_on_caption.set(on);
    }
}

impl HostPlatform for SimPlatform {
    fn draw_caption_active(&self, _msg: &NativeMessage) -> isize {
        if self.panic_on_caption.get() {
            panic!("caption draw failed");
        }
        self.caption_draws.set(self.caption_draws.get() + 1);
        1
    }

    fn window_pos_flags(&self, msg: &NativeMessage) -> u32 {
        msg.lparam as u32
    }

    fn send_to(&self, target: isize, msg: &NativeMessage) -> isize {
        self.sent.borrow_mut().push((target, *msg));
        0
    }
}

//! Win32 binding: default window procedure, `WINDOWPOS`, and wake posting.

use std::ffi::c_void;

use tracing::trace;
use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT, WPARAM},
    UI::WindowsAndMessaging::{DefWindowProcW, PostMessageW, SendMessageW, WINDOWPOS},
};

use crate::{HostPlatform, NativeMessage, SharedAdapter, WakeError, Waker, wm};

fn hwnd(h: isize) -> HWND {
    HWND(h as *mut c_void)
}

/// [`HostPlatform`] backed by user32.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl HostPlatform for Win32Platform {
    fn draw_caption_active(&self, msg: &NativeMessage) -> isize {
        // SAFETY: plain message call on the window that received `msg`.
        let r = unsafe {
            DefWindowProcW(
                hwnd(msg.hwnd),
                wm::WM_NCACTIVATE,
                WPARAM(1),
                LPARAM(msg.lparam),
            )
        };
        r.0
    }

    fn window_pos_flags(&self, msg: &NativeMessage) -> u32 {
        if msg.lparam == 0 {
            return 0;
        }
        // SAFETY: for WM_WINDOWPOSCHANGED, lparam points at a WINDOWPOS that
        // is valid for the duration of the message.
        let pos = unsafe { &*(msg.lparam as *const WINDOWPOS) };
        pos.flags.0
    }

    fn send_to(&self, target: isize, msg: &NativeMessage) -> isize {
        // SAFETY: forwards a by-value message; no pointers are involved.
        let r = unsafe {
            SendMessageW(
                hwnd(target),
                msg.msg,
                WPARAM(msg.wparam),
                LPARAM(msg.lparam),
            )
        };
        r.0
    }
}

/// Posts [`wm::WM_DOCKFOCUS_SIGNAL`] to the host window.
#[derive(Debug, Clone, Copy)]
pub struct PostMessageWaker {
    target: isize,
}

impl PostMessageWaker {
    /// Waker targeting the host window `target`.
    pub fn new(target: isize) -> Self {
        Self { target }
    }
}

impl Waker for PostMessageWaker {
    fn wake(&self) -> Result<(), WakeError> {
        if self.target == 0 {
            return Err(WakeError::TargetMissing);
        }
        // SAFETY: posting a parameterless private message.
        unsafe {
            PostMessageW(
                hwnd(self.target),
                wm::WM_DOCKFOCUS_SIGNAL,
                WPARAM(0),
                LPARAM(0),
            )
        }
        .map_err(|_| WakeError::PostFailed)
    }
}

/// Window procedure glue: hand a raw message to the adapter. Returns the
/// result to return from the window procedure when the adapter consumed it,
/// or `None` to continue with default handling.
pub fn handle_window_message(
    adapter: &SharedAdapter,
    window: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<LRESULT> {
    let mut m = NativeMessage::new(window.0 as isize, msg, wparam.0, lparam.0);
    if adapter.handle_native_message(&mut m) {
        trace!(msg, result = m.result, "host_message_consumed");
        Some(LRESULT(m.result))
    } else {
        None
    }
}

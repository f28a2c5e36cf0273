//! Host window side of dockfocus.
//!
//! The host application routes its window procedure through
//! [`HostWindowMessageAdapter::handle_native_message`] (usually via
//! [`SharedAdapter`]) and reports session lifecycle and tab changes. The
//! adapter owns the focus coordinator and the system keyboard hook; hook
//! signals are marshalled onto the UI thread by posting
//! [`wm::WM_DOCKFOCUS_SIGNAL`] to the host window.
#![warn(unsafe_op_in_unsafe_fn)]

mod adapter;
mod clipboard;
mod error;
mod event;
mod message;
mod platform;
mod shared;
pub mod sim;
mod wake;
#[cfg(windows)]
mod win32;

pub use adapter::HostWindowMessageAdapter;
pub use clipboard::ClipboardChain;
pub use error::{Error, Result};
pub use event::{HostEvent, translate};
pub use message::{NativeMessage, wm};
pub use platform::HostPlatform;
pub use shared::SharedAdapter;
pub use wake::{CountingWaker, WakeError, Waker};
#[cfg(windows)]
pub use win32::{PostMessageWaker, Win32Platform, handle_window_message};

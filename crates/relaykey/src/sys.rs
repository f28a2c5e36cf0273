//! Win32 `SendInput` binding.
use std::mem;

use keycode::{Key, VirtualKeyCode};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP, SendInput,
    VIRTUAL_KEY,
};

use crate::{Error, Poster, Result};

/// Posts keyboard input through `SendInput`, tagged with the dockfocus marker.
pub struct WinPoster;

impl WinPoster {
    /// Build and submit a single keyboard event.
    fn send(key: Key, down: bool) -> Result<()> {
        let flags = if down {
            KEYBD_EVENT_FLAGS(0)
        } else {
            KEYEVENTF_KEYUP
        };
        let inputs = [INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(VirtualKeyCode::from(key)),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: eventtag::DOCKFOCUS_TAG,
                },
            },
        }];
        // SAFETY: `inputs` is a fully initialized INPUT array and cbsize matches
        // the element size.
        let sent = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
        if sent as usize == inputs.len() {
            Ok(())
        } else {
            Err(Error::SendInput {
                sent,
                expected: inputs.len() as u32,
            })
        }
    }
}

impl Poster for WinPoster {
    fn post_down(&self, key: Key) -> Result<()> {
        Self::send(key, true)
    }

    fn post_up(&self, key: Key) -> Result<()> {
        Self::send(key, false)
    }
}

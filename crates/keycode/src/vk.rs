//! Raw Windows virtual-key codes and conversions.
//!
//! A "virtual-key code" is the `VK_*` value reported in
//! `KBDLLHOOKSTRUCT::vkCode` and accepted by `KEYBDINPUT::wVk`. It is
//! layout-independent and does not represent a character.

use crate::Key;

/// Windows virtual-key code (`VK_*`).
pub type VirtualKeyCode = u16;

impl TryFrom<VirtualKeyCode> for Key {
    type Error = ();
    fn try_from(value: VirtualKeyCode) -> Result<Self, Self::Error> {
        Self::from_vk(value).ok_or(())
    }
}

impl From<Key> for VirtualKeyCode {
    fn from(k: Key) -> Self {
        k as Self
    }
}

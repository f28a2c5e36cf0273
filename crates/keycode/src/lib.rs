//! keycode: Windows virtual-key codes, modifiers and chord specs.
//!
//! - `Key`: Enum of the virtual-key codes dockfocus needs to recognise or
//!   synthesize, assigned the exact `VK_*` values.
//! - `Modifier`: Enum of modifier keys with conversions to/from `Key`.
//! - `Chord`: a modifier set plus one key, parsed from specs like `"alt+tab"`.
//!
//! The crate is platform-neutral: hook and input code on Windows convert to
//! and from the raw `u16` values, tests and tools use the enums directly.

mod key;
pub use key::Key;

mod spec;

mod modifiers;
pub use modifiers::{Modifier, modifiers_from_bits};

mod chord;
pub use chord::Chord;

mod vk;
pub use vk::VirtualKeyCode;

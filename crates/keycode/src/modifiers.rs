use std::{collections::HashSet, convert::TryFrom};

use serde::{Deserialize, Serialize};

use crate::Key;

/// Modifier keys available on Windows keyboards.
///
/// Left and right variants collapse into one modifier: the window-switch
/// gesture and the focus toggle do not distinguish sides.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Alt,
    Control,
    Shift,
    Win,
}

impl From<Modifier> for Key {
    fn from(m: Modifier) -> Self {
        match m {
            Modifier::Alt => Self::Alt,
            Modifier::Control => Self::Control,
            Modifier::Shift => Self::Shift,
            Modifier::Win => Self::LeftWin,
        }
    }
}

impl TryFrom<Key> for Modifier {
    type Error = ();
    fn try_from(k: Key) -> Result<Self, Self::Error> {
        match k {
            Key::Alt | Key::LeftAlt | Key::RightAlt => Ok(Self::Alt),
            Key::Control | Key::LeftControl | Key::RightControl => Ok(Self::Control),
            Key::Shift | Key::LeftShift | Key::RightShift => Ok(Self::Shift),
            Key::LeftWin | Key::RightWin => Ok(Self::Win),
            _ => Err(()),
        }
    }
}

impl Modifier {
    /// Bit used for this modifier in [`modifiers_from_bits`].
    pub const fn bit(self) -> u8 {
        match self {
            Self::Alt => 1 << 0,
            Self::Control => 1 << 1,
            Self::Shift => 1 << 2,
            Self::Win => 1 << 3,
        }
    }

    /// Parses a modifier specification string via key specs, then converts.
    ///
    /// Accepts case-insensitive variant names and alias words
    /// (ctrl/alt/menu/win/super). Fails if the parsed key is not a modifier.
    pub fn from_spec(s: &str) -> Option<Self> {
        Key::from_spec(s).and_then(|k| Self::try_from(k).ok())
    }

    /// Returns the canonical spec string for this modifier, always lowercased.
    pub fn to_spec(self) -> String {
        match self {
            Self::Alt => "alt".to_string(),
            Self::Control => "ctrl".to_string(),
            Self::Shift => "shift".to_string(),
            Self::Win => "win".to_string(),
        }
    }
}

/// Construct a modifier set from packed modifier bits.
///
/// Bit layout matches [`Modifier::bit`]: Alt (1 << 0), Control (1 << 1),
/// Shift (1 << 2), Win (1 << 3). Hook code on Windows fills these from the
/// `LLKHF_ALTDOWN` flag and `GetAsyncKeyState`.
pub fn modifiers_from_bits(bits: u8) -> HashSet<Modifier> {
    [
        Modifier::Alt,
        Modifier::Control,
        Modifier::Shift,
        Modifier::Win,
    ]
    .into_iter()
    .filter(|m| bits & m.bit() != 0)
    .collect()
}

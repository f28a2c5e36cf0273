use crate::Key;

// Central mapping between enum variants and spec strings for shorthand/non-name specs.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Minus => "-",
            Equal => "=",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Quote => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Grave => "`",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s.to_string(), )*
            _ => $key.name().to_ascii_lowercase(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            Control => "ctrl",
            Alt => "menu",
            LeftWin => "win",
            LeftWin => "super",
            CapsLock => "caps",
            Return => "enter",
            Return => "ret",
            Escape => "esc",
            Delete => "del",
            Grave => "backtick",
            Grave => "oem3",
            LeftArrow => "left",
            RightArrow => "right",
            UpArrow => "up",
            DownArrow => "down",
            PageUp => "pgup",
            PageDown => "pgdn",
        }
    };
}

/// Parses a key specification into a `Key`.
///
/// First tries a case-insensitive enum name (via `Key::from_name`), then
/// shorthand symbols (digits and punctuation), then alias words.
pub fn from_spec(s: &str) -> Option<Key> {
    if let Some(k) = Key::from_name(s) {
        return Some(k);
    }
    if let some @ Some(_) = key_spec_map!(from_spec_match, s) {
        return some;
    }
    let lowered = s.to_ascii_lowercase();
    key_spec_aliases!(from_spec_match, lowered.as_str())
}

/// Returns the key specification string for a `Key`.
///
/// Uses shorthand first (digits, punctuation), then falls back to the
/// lowercased enum variant name.
pub fn to_spec(key: Key) -> String {
    key_spec_map!(to_spec_match, key)
}

impl Key {
    /// Parse a key spec string; see [`from_spec`].
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Canonical lowercase spec for this key; see [`to_spec`].
    pub fn to_spec(self) -> String {
        to_spec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_and_aliases() {
        assert_eq!(Key::from_spec("`"), Some(Key::Grave));
        assert_eq!(Key::from_spec("backtick"), Some(Key::Grave));
        assert_eq!(Key::from_spec("1"), Some(Key::Digit1));
        assert_eq!(Key::from_spec("ESC"), Some(Key::Escape));
        assert_eq!(Key::from_spec("tab"), Some(Key::Tab));
        assert_eq!(Key::from_spec("ctrl"), Some(Key::Control));
        assert_eq!(Key::from_spec("bogus"), None);
    }

    #[test]
    fn to_spec_prefers_shorthand() {
        assert_eq!(Key::Grave.to_spec(), "`");
        assert_eq!(Key::Digit0.to_spec(), "0");
        assert_eq!(Key::Tab.to_spec(), "tab");
        assert_eq!(Key::LeftArrow.to_spec(), "leftarrow");
    }

    #[test]
    fn every_spec_reparses() {
        for k in Key::ALL {
            assert_eq!(Key::from_spec(&k.to_spec()), Some(*k));
        }
    }
}

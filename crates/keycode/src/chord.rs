use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Key, Modifier};

/// A key chord: a set of modifiers plus a single key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Set of modifier keys held down for this chord.
    pub modifiers: HashSet<Modifier>,
    /// The non-modifier key for this chord.
    pub key: Key,
}

impl Chord {
    /// Build a chord from a key and modifiers.
    pub fn new(key: Key, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// The OS window-switch gesture, `alt+tab`.
    pub fn window_switch() -> Self {
        Self::new(Key::Tab, [Modifier::Alt])
    }

    /// Parses a chord specification of the form "ctrl+alt+k".
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by "+"; the last component is always the key spec.
    /// - Modifiers may use aliases handled by `Modifier::from_spec`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_raw = parts.pop()?;
        let key = Key::from_spec(key_raw.trim())?;
        let mut modifiers = HashSet::new();
        for m in parts {
            let mt = m.trim();
            if mt.is_empty() {
                return None;
            }
            modifiers.insert(Modifier::from_spec(mt)?);
        }
        Some(Self { modifiers, key })
    }

    /// True when `key` plus the held `modifiers` is exactly this chord.
    pub fn matches(&self, key: Key, modifiers: &HashSet<Modifier>) -> bool {
        self.key == key && &self.modifiers == modifiers
    }

    fn modifier_order(m: &Modifier) -> usize {
        match m {
            Modifier::Control => 0,
            Modifier::Alt => 1,
            Modifier::Shift => 2,
            Modifier::Win => 3,
        }
    }

    /// Returns the canonical string form of this chord: modifiers in
    /// Control, Alt, Shift, Win order followed by the key spec.
    pub fn to_string_canonical(&self) -> String {
        let mut mods: Vec<Modifier> = self.modifiers.iter().copied().collect();
        mods.sort_by_key(Self::modifier_order);
        let mut out: Vec<String> = mods.into_iter().map(Modifier::to_spec).collect();
        out.push(self.key.to_spec());
        out.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_chord() {
        let c = Chord::parse("shift+alt+k").expect("parse");
        assert!(c.modifiers.contains(&Modifier::Shift));
        assert!(c.modifiers.contains(&Modifier::Alt));
        assert_eq!(c.key, Key::K);
        assert_eq!(c.to_string(), "alt+shift+k");
    }

    #[test]
    fn parse_toggle_chord() {
        let c = Chord::parse("Alt+`").expect("parse");
        assert_eq!(c, Chord::new(Key::Grave, [Modifier::Alt]));
        assert_eq!(c.to_string(), "alt+`");
    }

    #[test]
    fn window_switch_is_alt_tab() {
        assert_eq!(Chord::parse("alt+tab"), Some(Chord::window_switch()));
    }

    #[test]
    fn rejects_empty_components() {
        assert!(Chord::parse("alt++k").is_none());
        assert!(Chord::parse("").is_none());
        assert!(Chord::parse("alt+nosuchkey").is_none());
        assert!(Chord::parse("k+a").is_none());
    }

    #[test]
    fn matches_requires_exact_modifiers() {
        let c = Chord::window_switch();
        let alt: HashSet<Modifier> = [Modifier::Alt].into_iter().collect();
        let alt_shift: HashSet<Modifier> = [Modifier::Alt, Modifier::Shift].into_iter().collect();
        assert!(c.matches(Key::Tab, &alt));
        assert!(!c.matches(Key::Tab, &alt_shift));
        assert!(!c.matches(Key::Q, &alt));
    }
}

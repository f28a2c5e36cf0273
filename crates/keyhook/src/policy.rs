use std::collections::HashSet;

use keycode::{Chord, Key, Modifier};

use crate::{HookSignal, KeyTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub emit: Option<HookSignal>,
    pub intercept: bool,
}

impl Decision {
    const PASS: Self = Self {
        emit: None,
        intercept: false,
    };
}

/// Classify how the hook should handle a given event.
///
/// - Events we injected ourselves are never emitted or intercepted.
/// - Unknown keys pass through.
/// - Tab going down while Alt is held is the window-switch gesture: emit
///   `AltCycleDetected` but let the OS see the key.
/// - A key-down matching the focus toggle chord emits `FocusToggle` and is
///   intercepted. Key-ups are not classified here; the caller swallows the
///   up that pairs with an intercepted down.
pub fn classify(
    injected: bool,
    key: Option<Key>,
    transition: KeyTransition,
    modifiers: &HashSet<Modifier>,
    toggle: Option<&Chord>,
) -> Decision {
    if injected {
        return Decision::PASS;
    }
    let Some(key) = key else {
        return Decision::PASS;
    };
    if transition != KeyTransition::Down {
        return Decision::PASS;
    }
    if let Some(chord) = toggle
        && chord.matches(key, modifiers)
    {
        return Decision {
            emit: Some(HookSignal::FocusToggle),
            intercept: true,
        };
    }
    if key == Key::Tab && modifiers.contains(&Modifier::Alt) {
        return Decision {
            emit: Some(HookSignal::AltCycleDetected),
            intercept: false,
        };
    }
    Decision::PASS
}

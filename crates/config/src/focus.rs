//! Focus coordination settings.

use keycode::{Chord, Key};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Settings consumed by the focus engine and the host adapter.
///
/// Every field is optional in RON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FocusConfig {
    /// Inject a Tab up/down pair when the window-switch gesture starts while
    /// an embedded session holds focus.
    pub alt_tab_fix: bool,
    /// Always draw the host caption as active.
    pub keep_caption_active: bool,
    /// Re-focus the session when its tab is selected or its header clicked.
    pub activate_on_tab_change: bool,
    /// Chord that toggles focus between the session and the host chrome.
    pub focus_toggle: Option<String>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            alt_tab_fix: true,
            keep_caption_active: true,
            activate_on_tab_change: true,
            focus_toggle: None,
        }
    }
}

impl FocusConfig {
    /// Parse and validate the focus toggle chord, if one is configured.
    pub fn focus_toggle_chord(&self) -> Result<Option<Chord>, Error> {
        let Some(spec) = self.focus_toggle.as_deref() else {
            return Ok(None);
        };
        let chord = Chord::parse(spec).ok_or_else(|| Error::Validation {
            message: format!("focus_toggle: cannot parse chord {spec:?}"),
        })?;
        if chord.key.is_modifier() {
            return Err(Error::Validation {
                message: format!("focus_toggle: {spec:?} needs a non-modifier key"),
            });
        }
        if chord == Chord::window_switch() {
            return Err(Error::Validation {
                message: "focus_toggle: alt+tab is reserved for window switching".into(),
            });
        }
        if chord.key == Key::Tab && chord.modifiers.is_empty() {
            return Err(Error::Validation {
                message: "focus_toggle: a bare tab would break keyboard navigation".into(),
            });
        }
        Ok(Some(chord))
    }

    /// Run every validation check.
    pub fn validate(&self) -> Result<(), Error> {
        self.focus_toggle_chord().map(|_| ())
    }
}

//! Trace file format.
//!
//! A trace lists the session tabs that exist, then the steps to replay:
//!
//! ```ron
//! (
//!     tabs: [(name: "prod", window: Some(100))],
//!     steps: [
//!         attach(session: "ssh-1", window: 100, tab: "prod"),
//!         select_tab("prod"),
//!         child_focus(session: "ssh-1", focused: true),
//!         message(activate_app(false)),
//!         key(key: "tab", down: true, mods: ["alt"]),
//!         expect(main_window_focused: Some(false), focus_requests: Some(1)),
//!     ],
//! )
//! ```

use config::FocusConfig;
use ron::{Options, extensions::Extensions};
use serde::Deserialize;

use crate::{Error, Result};

/// A whole trace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trace {
    /// Configuration used unless `--config` is given.
    #[serde(default)]
    pub config: Option<FocusConfig>,
    /// Session tabs known to the simulated host.
    #[serde(default)]
    pub tabs: Vec<TabSpec>,
    /// Steps to replay in order.
    pub steps: Vec<Step>,
}

/// A session tab and its embedded window handle, if any.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabSpec {
    /// Tab name.
    pub name: String,
    /// Embedded window handle.
    #[serde(default)]
    pub window: Option<isize>,
}

/// One replay step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// A session protocol docked a window.
    Attach {
        /// Session id.
        session: String,
        /// Embedded window handle.
        window: isize,
        /// Owning tab.
        tab: String,
    },
    /// A session disconnected.
    Detach(String),
    /// A session's window reported a focus change.
    ChildFocus {
        /// Session id.
        session: String,
        /// New focus state.
        focused: bool,
    },
    /// The user selected a tab.
    SelectTab(String),
    /// The user clicked the active tab's header.
    ClickTab,
    /// A window message reached the host.
    Message(Msg),
    /// A raw key event reached the keyboard hook.
    Key {
        /// Key spec, e.g. `"tab"` or `"`"`.
        key: String,
        /// Key-down when true.
        down: bool,
        /// Held modifiers.
        #[serde(default)]
        mods: Vec<String>,
        /// Event was synthesized by dockfocus itself.
        #[serde(default)]
        injected: bool,
    },
    /// Make embedded windows refuse focus requests from now on.
    FailFocusRequests(bool),
    /// Check the current state.
    Expect(Expect),
}

/// Host window messages a trace can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    /// `WM_ACTIVATEAPP`; true on activation.
    ActivateApp(bool),
    /// `WM_NCACTIVATE`; true when asked to draw active.
    NcActivate(bool),
    /// `WM_PARENTNOTIFY` for a mouse click.
    Click,
    /// `WM_ENTERSIZEMOVE`.
    EnterSizeMove,
    /// `WM_EXITSIZEMOVE`.
    ExitSizeMove,
    /// `WM_WINDOWPOSCHANGED`; true when the change activated the window.
    WindowPosChanged(bool),
    /// `WM_DRAWCLIPBOARD`.
    DrawClipboard,
    /// `WM_CHANGECBCHAIN`.
    ChangeCbChain {
        /// The leaving viewer.
        removed: isize,
        /// The viewer after it.
        replacement: isize,
    },
    /// Register the next clipboard viewer.
    ClipboardNext(isize),
}

/// State checks. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expect {
    /// Host window is focused.
    pub main_window_focused: Option<bool>,
    /// Embedded windows reporting focus.
    pub child_focus_count: Option<usize>,
    /// An embedded window held focus last.
    pub child_process_held_last_focus: Option<bool>,
    /// Embedded-window focus requests so far.
    pub focus_requests: Option<usize>,
    /// Host focus requests so far.
    pub host_focus_requests: Option<usize>,
    /// Synthesized key events so far, e.g. `["up tab", "down tab"]`.
    pub relayed: Option<Vec<String>>,
    /// The previous message or key event was consumed.
    pub consumed: Option<bool>,
    /// Current next clipboard viewer.
    pub clipboard_next: Option<Option<isize>>,
    /// Captions forced active so far.
    pub caption_draws: Option<usize>,
}

/// Parse a trace from RON text.
pub fn parse(text: &str) -> Result<Trace> {
    let options = Options::default()
        .with_default_extension(Extensions::UNWRAP_NEWTYPES)
        .with_default_extension(Extensions::UNWRAP_VARIANT_NEWTYPES);
    options
        .from_str(text)
        .map_err(|e| Error::TraceParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_example() {
        let t = parse(
            r#"(
                tabs: [(name: "prod", window: Some(100))],
                steps: [
                    attach(session: "ssh-1", window: 100, tab: "prod"),
                    select_tab("prod"),
                    child_focus(session: "ssh-1", focused: true),
                    message(activate_app(false)),
                    key(key: "tab", down: true, mods: ["alt"]),
                    expect(main_window_focused: Some(false), focus_requests: Some(1)),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(t.tabs[0].window, Some(100));
        assert_eq!(t.steps.len(), 6);
        assert_eq!(t.steps[3], Step::Message(Msg::ActivateApp(false)));
        assert_eq!(
            t.steps[5],
            Step::Expect(Expect {
                main_window_focused: Some(false),
                focus_requests: Some(1),
                ..Expect::default()
            })
        );
    }

    #[test]
    fn embedded_config() {
        let t = parse("(config: Some((alt_tab_fix: false)), steps: [])").unwrap();
        assert!(!t.config.unwrap().alt_tab_fix);
    }

    #[test]
    fn unknown_steps_are_rejected() {
        assert!(matches!(
            parse("(steps: [teleport])"),
            Err(Error::TraceParse(_))
        ));
    }
}

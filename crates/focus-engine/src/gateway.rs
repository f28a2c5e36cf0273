//! Collaborator interfaces the coordinator uses to find and focus sessions.
//!
//! The host application implements these over its docking and tab model.
//! Everything runs on the host's UI thread, so handles are `Rc`.

use std::{fmt, rc::Rc};

use crate::Result;

/// Opaque native window handle of an embedded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub isize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A child-process window docked inside a session tab.
pub trait EmbeddedWindow {
    /// Native handle.
    fn id(&self) -> WindowId;
    /// Ask the OS to give this window input focus. Fire-and-forget: success
    /// means the request was issued, not that focus moved.
    fn request_focus(&self) -> Result<()>;
}

/// One session tab in the host's workspace.
pub trait SessionTab {
    /// Display name, used in diagnostics.
    fn name(&self) -> String;
    /// The embedded window, if the session's protocol docks one.
    fn embedded_window(&self) -> Option<Rc<dyn EmbeddedWindow>>;
}

/// Host-side access to the current session and the host window itself.
pub trait ActivationGateway {
    /// The currently selected session tab.
    fn active_tab(&self) -> Option<Rc<dyn SessionTab>>;
    /// Ask the OS to bring the host window to the foreground.
    fn focus_host(&self) -> Result<()>;
}

//! Tracks embedded child-process windows and which of them report focus.

use std::{collections::HashMap, fmt};

use tracing::{debug, warn};

use crate::WindowId;

/// Identifier of a session whose protocol embeds an external window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub String);

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An attached embedded window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSession {
    /// Native handle of the embedded window.
    pub window: WindowId,
    /// Name of the owning session tab.
    pub tab: String,
    /// The window currently reports OS focus.
    pub has_focus: bool,
}

/// A focus transition the coordinator must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildFocusEvent {
    /// The session's window gained focus.
    Gained(SessionId),
    /// The session's window lost focus.
    Lost(SessionId),
}

/// Registry of attached child sessions.
///
/// Focus reports are de-duplicated so every `Gained` is paired with exactly
/// one `Lost`, which keeps the coordinator's count equal to the number of
/// sessions with `has_focus` set.
#[derive(Debug, Default)]
pub struct ChildSessionRegistry {
    sessions: HashMap<SessionId, ChildSession>,
}

impl ChildSessionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a session's embedded window. Re-attaching an existing
    /// session keeps its focus flag and updates the handle and tab.
    pub fn attach(&mut self, session: SessionId, window: WindowId, tab: &str) {
        debug!(%session, %window, tab, "child_session_attached");
        let entry = self.sessions.entry(session).or_insert(ChildSession {
            window,
            tab: tab.to_string(),
            has_focus: false,
        });
        entry.window = window;
        entry.tab = tab.to_string();
    }

    /// Stop tracking a session. Returns the `Lost` event owed when the
    /// session still held focus.
    pub fn detach(&mut self, session: &SessionId) -> Option<ChildFocusEvent> {
        let Some(removed) = self.sessions.remove(session) else {
            warn!(%session, "detach_unknown_session");
            return None;
        };
        debug!(%session, had_focus = removed.has_focus, "child_session_detached");
        removed
            .has_focus
            .then(|| ChildFocusEvent::Lost(session.clone()))
    }

    /// Record a focus report. Returns the transition, or `None` for repeated
    /// reports and unknown sessions.
    pub fn focus_changed(&mut self, session: &SessionId, has_focus: bool) -> Option<ChildFocusEvent> {
        let Some(entry) = self.sessions.get_mut(session) else {
            warn!(%session, has_focus, "focus_report_for_unknown_session");
            return None;
        };
        if entry.has_focus == has_focus {
            debug!(%session, has_focus, "duplicate_focus_report");
            return None;
        }
        entry.has_focus = has_focus;
        Some(if has_focus {
            ChildFocusEvent::Gained(session.clone())
        } else {
            ChildFocusEvent::Lost(session.clone())
        })
    }

    /// Number of sessions whose window reports focus.
    pub fn focused_count(&self) -> usize {
        self.sessions.values().filter(|s| s.has_focus).count()
    }

    /// Whether `session` currently reports focus.
    pub fn has_focus(&self, session: &SessionId) -> bool {
        self.sessions.get(session).is_some_and(|s| s.has_focus)
    }

    /// Look up an attached session.
    pub fn get(&self, session: &SessionId) -> Option<&ChildSession> {
        self.sessions.get(session)
    }

    /// Find the session embedding `window`.
    pub fn session_for_window(&self, window: WindowId) -> Option<&SessionId> {
        self.sessions
            .iter()
            .find(|(_, s)| s.window == window)
            .map(|(id, _)| id)
    }

    /// Number of attached sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// No sessions attached.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> (ChildSessionRegistry, SessionId) {
        let mut r = ChildSessionRegistry::new();
        let id = SessionId::from("ssh-1");
        r.attach(id.clone(), WindowId(100), "prod");
        (r, id)
    }

    #[test]
    fn gained_then_lost() {
        let (mut r, id) = reg();
        assert_eq!(
            r.focus_changed(&id, true),
            Some(ChildFocusEvent::Gained(id.clone()))
        );
        assert_eq!(r.focused_count(), 1);
        assert_eq!(
            r.focus_changed(&id, false),
            Some(ChildFocusEvent::Lost(id.clone()))
        );
        assert_eq!(r.focused_count(), 0);
    }

    #[test]
    fn duplicate_reports_are_ignored() {
        let (mut r, id) = reg();
        assert!(r.focus_changed(&id, false).is_none());
        assert!(r.focus_changed(&id, true).is_some());
        assert!(r.focus_changed(&id, true).is_none());
        assert_eq!(r.focused_count(), 1);
    }

    #[test]
    fn detach_with_focus_owes_a_lost_event() {
        let (mut r, id) = reg();
        r.focus_changed(&id, true);
        assert_eq!(r.detach(&id), Some(ChildFocusEvent::Lost(id.clone())));
        assert!(r.is_empty());
        assert!(r.detach(&id).is_none());
    }

    #[test]
    fn detach_without_focus_is_silent() {
        let (mut r, id) = reg();
        assert!(r.detach(&id).is_none());
    }

    #[test]
    fn unknown_session_reports_are_dropped() {
        let mut r = ChildSessionRegistry::new();
        assert!(r.focus_changed(&SessionId::from("ghost"), true).is_none());
        assert_eq!(r.focused_count(), 0);
    }

    #[test]
    fn reattach_keeps_focus_and_updates_window() {
        let (mut r, id) = reg();
        r.focus_changed(&id, true);
        r.attach(id.clone(), WindowId(200), "prod");
        assert!(r.has_focus(&id));
        assert_eq!(r.session_for_window(WindowId(200)), Some(&id));
        assert_eq!(r.len(), 1);
    }
}

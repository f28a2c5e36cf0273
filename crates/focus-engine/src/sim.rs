//! In-memory gateway for tests and trace replay.
//!
//! [`SimGateway`] owns a list of named tabs, each optionally embedding a
//! [`SimWindow`]. Focus requests are counted instead of sent to an OS.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{ActivationGateway, EmbeddedWindow, Error, Result, SessionTab, WindowId};

/// Embedded window that counts focus requests.
#[derive(Debug)]
pub struct SimWindow {
    id: WindowId,
    requests: Cell<usize>,
    fail: Rc<Cell<bool>>,
}

impl SimWindow {
    /// Number of successful focus requests.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl EmbeddedWindow for SimWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn request_focus(&self) -> Result<()> {
        if self.fail.get() {
            return Err(Error::FocusRequest(format!("window {} refused focus", self.id)));
        }
        self.requests.set(self.requests.get() + 1);
        Ok(())
    }
}

/// Session tab with an optional embedded window.
#[derive(Debug)]
pub struct SimTab {
    name: String,
    window: RefCell<Option<Rc<SimWindow>>>,
}

impl SessionTab for SimTab {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn embedded_window(&self) -> Option<Rc<dyn EmbeddedWindow>> {
        self.window
            .borrow()
            .clone()
            .map(|w| w as Rc<dyn EmbeddedWindow>)
    }
}

/// Gateway over a fixed set of simulated tabs.
#[derive(Debug, Default)]
pub struct SimGateway {
    tabs: RefCell<Vec<Rc<SimTab>>>,
    active: RefCell<Option<String>>,
    host_requests: Cell<usize>,
    fail: Rc<Cell<bool>>,
}

impl SimGateway {
    /// Gateway with no tabs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tab, replacing any tab with the same name.
    pub fn add_tab(&self, name: &str, window: Option<WindowId>) -> Rc<SimTab> {
        let tab = Rc::new(SimTab {
            name: name.to_string(),
            window: RefCell::new(window.map(|id| {
                Rc::new(SimWindow {
                    id,
                    requests: Cell::new(0),
                    fail: self.fail.clone(),
                })
            })),
        });
        let mut tabs = self.tabs.borrow_mut();
        tabs.retain(|t| t.name != name);
        tabs.push(tab.clone());
        tab
    }

    /// Remove a tab. Deselects it if it was active.
    pub fn remove_tab(&self, name: &str) -> bool {
        let mut tabs = self.tabs.borrow_mut();
        let before = tabs.len();
        tabs.retain(|t| t.name != name);
        if self.active.borrow().as_deref() == Some(name) {
            self.active.replace(None);
        }
        tabs.len() != before
    }

    /// Make `name` the active tab. Returns false for unknown tabs.
    pub fn select(&self, name: &str) -> bool {
        let known = self.tabs.borrow().iter().any(|t| t.name == name);
        if known {
            self.active.replace(Some(name.to_string()));
        }
        known
    }

    /// Clear the selection.
    pub fn deselect(&self) {
        self.active.replace(None);
    }

    /// Name of the active tab.
    pub fn active_name(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// Make every embedded window refuse focus requests.
    pub fn set_fail_requests(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Embedded window with handle `id`.
    pub fn window(&self, id: WindowId) -> Option<Rc<SimWindow>> {
        self.tabs
            .borrow()
            .iter()
            .filter_map(|t| t.window.borrow().clone())
            .find(|w| w.id == id)
    }

    /// Successful embedded-window focus requests across all tabs.
    pub fn focus_requests(&self) -> usize {
        self.tabs
            .borrow()
            .iter()
            .filter_map(|t| t.window.borrow().as_ref().map(|w| w.requests()))
            .sum()
    }

    /// Host focus requests.
    pub fn host_focus_requests(&self) -> usize {
        self.host_requests.get()
    }
}

impl ActivationGateway for SimGateway {
    fn active_tab(&self) -> Option<Rc<dyn SessionTab>> {
        let active = self.active.borrow();
        let name = active.as_deref()?;
        self.tabs
            .borrow()
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .map(|t| t as Rc<dyn SessionTab>)
    }

    fn focus_host(&self) -> Result<()> {
        self.host_requests.set(self.host_requests.get() + 1);
        Ok(())
    }
}

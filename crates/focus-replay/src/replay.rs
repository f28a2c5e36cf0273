//! Drives a trace through the real adapter, coordinator and interceptor
//! against simulated host collaborators.

use std::{collections::HashSet, rc::Rc, sync::Arc};

use config::FocusConfig;
use focus_engine::{FocusState, SessionId, WindowId, sim::SimGateway};
use host_adapter::{
    CountingWaker, HostWindowMessageAdapter, NativeMessage, SharedAdapter, sim::SimPlatform, wm,
};
use keycode::{Key, Modifier};
use keyhook::{HookDecision, Interceptor, KeyEvent, KeyTransition};
use relaykey::{RecordingPoster, RelayKey, Relayed};
use tracing::debug;

use crate::{
    Error, Result,
    trace::{Expect, Msg, Step, TabSpec, Trace},
};

/// Handle of the simulated host window.
const HOST: isize = 0x10;

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Zero-based step index.
    pub index: usize,
    /// Short description of the step.
    pub label: String,
    /// State after the step.
    pub state: FocusState,
    /// Failed checks, empty unless the step was an `expect`.
    pub failures: Vec<String>,
    /// Checks run by this step.
    pub checks: usize,
}

impl StepReport {
    /// One-line summary.
    pub fn line(&self) -> String {
        let s = &self.state;
        let mut out = format!(
            "{:>3} {:<34} main={} children={} held_last={}",
            self.index,
            self.label,
            u8::from(s.main_window_focused),
            s.child_focus_count,
            u8::from(s.child_process_held_last_focus),
        );
        if self.checks > 0 {
            if self.failures.is_empty() {
                out.push_str(" ok");
            } else {
                out.push_str(" FAILED");
            }
        }
        out
    }
}

/// A running replay.
pub struct Replay {
    shared: SharedAdapter,
    gateway: Rc<SimGateway>,
    platform: Rc<SimPlatform>,
    poster: Arc<RecordingPoster>,
    interceptor: Interceptor,
    waker: Arc<CountingWaker>,
    /// Wakes already delivered as `WM_DOCKFOCUS_SIGNAL`.
    delivered_wakes: usize,
    last_consumed: bool,
}

impl Replay {
    /// Build the simulated host for `tabs` with `config`.
    pub fn new(tabs: &[TabSpec], config: FocusConfig) -> Result<Self> {
        let gateway = Rc::new(SimGateway::new());
        for tab in tabs {
            gateway.add_tab(&tab.name, tab.window.map(WindowId));
        }
        let platform = Rc::new(SimPlatform::new());
        let poster = Arc::new(RecordingPoster::new());
        let mut adapter = HostWindowMessageAdapter::new(
            gateway.clone(),
            RelayKey::with_poster(poster.clone()),
            platform.clone(),
            config,
        );
        let waker = Arc::new(CountingWaker::new());
        let interceptor = adapter
            .interceptor(waker.clone())
            .map_err(|e| Error::step(0, e.to_string()))?;
        Ok(Self {
            shared: SharedAdapter::new(adapter),
            gateway,
            platform,
            poster,
            interceptor,
            waker,
            delivered_wakes: 0,
            last_consumed: false,
        })
    }

    /// Current coordinator state.
    pub fn state(&self) -> FocusState {
        self.shared.borrow().state()
    }

    fn send(&mut self, msg: u32, wparam: usize, lparam: isize) {
        let mut m = NativeMessage::new(HOST, msg, wparam, lparam);
        self.last_consumed = self.shared.handle_native_message(&mut m);
    }

    /// Deliver the posted wake messages the hook produced.
    fn pump_wakes(&mut self) {
        while self.delivered_wakes < self.waker.wakes() {
            self.delivered_wakes += 1;
            let mut m = NativeMessage::new(HOST, wm::WM_DOCKFOCUS_SIGNAL, 0, 0);
            self.shared.handle_native_message(&mut m);
        }
    }

    /// Run one step.
    pub fn step(&mut self, index: usize, step: &Step) -> Result<StepReport> {
        let mut failures = Vec::new();
        let mut checks = 0;
        let label = match step {
            Step::Attach {
                session,
                window,
                tab,
            } => {
                self.shared.with(|a| {
                    a.attach_session(SessionId::from(session.as_str()), WindowId(*window), tab)
                });
                format!("attach {session}")
            }
            Step::Detach(session) => {
                self.shared
                    .with(|a| a.detach_session(&SessionId::from(session.as_str())));
                format!("detach {session}")
            }
            Step::ChildFocus { session, focused } => {
                self.shared.with(|a| {
                    a.session_focus_changed(&SessionId::from(session.as_str()), *focused)
                });
                format!("child_focus {session} {focused}")
            }
            Step::SelectTab(name) => {
                if !self.gateway.select(name) {
                    return Err(Error::step(index, format!("unknown tab {name:?}")));
                }
                self.shared.with(HostWindowMessageAdapter::active_tab_changed);
                format!("select_tab {name}")
            }
            Step::ClickTab => {
                self.shared.with(HostWindowMessageAdapter::tab_clicked);
                "click_tab".to_string()
            }
            Step::Message(msg) => self.message(*msg),
            Step::Key {
                key,
                down,
                mods,
                injected,
            } => {
                let ev = key_event(index, key, *down, mods, *injected)?;
                let decision = self.interceptor.on_key_event(&ev);
                self.last_consumed = decision == HookDecision::Consume;
                self.pump_wakes();
                let dir = if *down { "down" } else { "up" };
                if mods.is_empty() {
                    format!("key {dir} {key}")
                } else {
                    format!("key {dir} {}+{key}", mods.join("+"))
                }
            }
            Step::FailFocusRequests(fail) => {
                self.gateway.set_fail_requests(*fail);
                format!("fail_focus_requests {fail}")
            }
            Step::Expect(expect) => {
                checks = self.check(expect, &mut failures);
                "expect".to_string()
            }
        };
        debug!(index, label = %label, "replay_step");
        Ok(StepReport {
            index,
            label,
            state: self.state(),
            failures,
            checks,
        })
    }

    fn message(&mut self, msg: Msg) -> String {
        match msg {
            Msg::ActivateApp(active) => {
                self.send(wm::WM_ACTIVATEAPP, usize::from(active), 0);
                format!("activate_app {active}")
            }
            Msg::NcActivate(active) => {
                self.send(wm::WM_NCACTIVATE, usize::from(active), 0);
                format!("nc_activate {active}")
            }
            Msg::Click => {
                // WM_LBUTTONDOWN as the PARENTNOTIFY sub-event.
                self.send(wm::WM_PARENTNOTIFY, 0x0201, 0);
                "click".to_string()
            }
            Msg::EnterSizeMove => {
                self.send(wm::WM_ENTERSIZEMOVE, 0, 0);
                "enter_size_move".to_string()
            }
            Msg::ExitSizeMove => {
                self.send(wm::WM_EXITSIZEMOVE, 0, 0);
                "exit_size_move".to_string()
            }
            Msg::WindowPosChanged(activating) => {
                let flags = if activating { 0 } else { wm::SWP_NOACTIVATE };
                self.send(wm::WM_WINDOWPOSCHANGED, 0, flags as isize);
                format!("window_pos_changed {activating}")
            }
            Msg::DrawClipboard => {
                self.send(wm::WM_DRAWCLIPBOARD, 0, 0);
                "draw_clipboard".to_string()
            }
            Msg::ChangeCbChain {
                removed,
                replacement,
            } => {
                self.send(wm::WM_CHANGECBCHAIN, removed as usize, replacement);
                format!("change_cb_chain {removed} {replacement}")
            }
            Msg::ClipboardNext(next) => {
                self.shared.with(|a| a.set_clipboard_next(Some(next)));
                format!("clipboard_next {next}")
            }
        }
    }

    fn check(&self, e: &Expect, failures: &mut Vec<String>) -> usize {
        let state = self.state();
        let mut checks = 0;
        let mut cmp = |name: &str, want: Option<String>, got: String| {
            if let Some(want) = want {
                checks += 1;
                if want != got {
                    failures.push(format!("{name}: expected {want}, got {got}"));
                }
            }
        };
        let show = |v: &dyn std::fmt::Debug| format!("{v:?}");
        cmp(
            "main_window_focused",
            e.main_window_focused.map(|v| show(&v)),
            show(&state.main_window_focused),
        );
        cmp(
            "child_focus_count",
            e.child_focus_count.map(|v| show(&v)),
            show(&state.child_focus_count),
        );
        cmp(
            "child_process_held_last_focus",
            e.child_process_held_last_focus.map(|v| show(&v)),
            show(&state.child_process_held_last_focus),
        );
        cmp(
            "focus_requests",
            e.focus_requests.map(|v| show(&v)),
            show(&self.gateway.focus_requests()),
        );
        cmp(
            "host_focus_requests",
            e.host_focus_requests.map(|v| show(&v)),
            show(&self.gateway.host_focus_requests()),
        );
        cmp(
            "relayed",
            e.relayed.as_ref().map(|v| show(v)),
            show(&self.relayed()),
        );
        cmp(
            "consumed",
            e.consumed.map(|v| show(&v)),
            show(&self.last_consumed),
        );
        cmp(
            "clipboard_next",
            e.clipboard_next.map(|v| show(&v)),
            show(&self.shared.borrow().clipboard_next()),
        );
        cmp(
            "caption_draws",
            e.caption_draws.map(|v| show(&v)),
            show(&self.platform.caption_draws()),
        );
        checks
    }

    /// Synthesized events so far, as `"up tab"` / `"down tab"`.
    pub fn relayed(&self) -> Vec<String> {
        self.poster
            .events()
            .into_iter()
            .map(|r| match r {
                Relayed::Down(k) => format!("down {}", k.to_spec()),
                Relayed::Up(k) => format!("up {}", k.to_spec()),
            })
            .collect()
    }

    /// Dispose the adapter.
    pub fn finish(self) {
        self.shared.dispose();
    }
}

fn key_event(index: usize, key: &str, down: bool, mods: &[String], injected: bool) -> Result<KeyEvent> {
    let k = Key::from_spec(key).ok_or_else(|| Error::step(index, format!("unknown key {key:?}")))?;
    let mut held = HashSet::new();
    for m in mods {
        let m = Modifier::from_spec(m)
            .ok_or_else(|| Error::step(index, format!("unknown modifier {m:?}")))?;
        held.insert(m);
    }
    let transition = if down {
        KeyTransition::Down
    } else {
        KeyTransition::Up
    };
    let mut ev = KeyEvent::new(k, transition, held);
    ev.injected = injected;
    Ok(ev)
}

/// Replay a whole trace. Returns every step report; the caller decides how
/// to treat failures.
pub fn run(trace: &Trace, config: FocusConfig) -> Result<Vec<StepReport>> {
    let mut replay = Replay::new(&trace.tabs, config)?;
    let mut reports = Vec::with_capacity(trace.steps.len());
    for (index, step) in trace.steps.iter().enumerate() {
        reports.push(replay.step(index, step)?);
    }
    replay.finish();
    Ok(reports)
}

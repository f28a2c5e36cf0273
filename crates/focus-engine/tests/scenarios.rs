use std::{rc::Rc, sync::Arc};

use config::FocusConfig;
use focus_engine::{FocusCoordinator, WindowId, sim::SimGateway};
use keycode::Key;
use relaykey::{RecordingPoster, RelayKey, Relayed};

struct Rig {
    coordinator: FocusCoordinator,
    gateway: Rc<SimGateway>,
    poster: Arc<RecordingPoster>,
}

fn rig() -> Rig {
    let gateway = Rc::new(SimGateway::new());
    gateway.add_tab("prod", Some(WindowId(0x100)));
    gateway.select("prod");
    let poster = Arc::new(RecordingPoster::new());
    let coordinator = FocusCoordinator::new(
        gateway.clone(),
        RelayKey::with_poster(poster.clone()),
        FocusConfig::default(),
    );
    Rig {
        coordinator,
        gateway,
        poster,
    }
}

#[test]
fn fresh_gain_lose_then_activate_refocuses_session() {
    let Rig {
        mut coordinator,
        gateway,
        ..
    } = rig();
    coordinator.child_gained_focus();
    let s = coordinator.state();
    assert_eq!(s.child_focus_count, 1);
    assert!(s.child_process_held_last_focus);

    coordinator.child_lost_focus();
    let s = coordinator.state();
    assert_eq!(s.child_focus_count, 0);
    assert!(s.child_process_held_last_focus);

    coordinator.host_activated();
    assert_eq!(gateway.focus_requests(), 1);
    assert!(coordinator.state().main_window_focused);
}

#[test]
fn click_suppresses_reactivation() {
    let Rig {
        mut coordinator,
        gateway,
        ..
    } = rig();
    coordinator.child_gained_focus();
    coordinator.child_lost_focus();
    coordinator.host_clicked();
    assert!(!coordinator.state().child_process_held_last_focus);
    coordinator.host_activated();
    assert_eq!(gateway.focus_requests(), 0);
}

#[test]
fn size_move_defers_activation_to_gesture_end() {
    let Rig {
        mut coordinator,
        gateway,
        ..
    } = rig();
    coordinator.host_activated();
    coordinator.size_move_begin();
    coordinator.window_position_changed(true);
    assert_eq!(gateway.focus_requests(), 0);
    coordinator.size_move_end();
    assert_eq!(gateway.focus_requests(), 1);
    assert!(!coordinator.state().in_size_move);
}

#[test]
fn alt_cycle_emits_one_tab_pair_and_drops_host_focus() {
    let Rig {
        mut coordinator,
        poster,
        ..
    } = rig();
    coordinator.host_activated();
    coordinator.child_gained_focus();
    assert!(coordinator.state().app_focused());

    assert!(coordinator.alt_cycle_detected());
    assert_eq!(
        poster.events(),
        vec![Relayed::Up(Key::Tab), Relayed::Down(Key::Tab)]
    );
    let s = coordinator.state();
    assert!(!s.main_window_focused);
    assert!(!s.fixing_alt_tab);
}

#[test]
fn alt_cycle_after_switch_completes_then_host_returns() {
    let Rig {
        mut coordinator,
        gateway,
        poster,
    } = rig();
    coordinator.child_gained_focus();
    coordinator.alt_cycle_detected();
    // The switch moves focus to another application.
    coordinator.child_lost_focus();
    assert!(coordinator.state().child_process_held_last_focus);
    assert!(!coordinator.state().app_focused());
    // A second Alt+Tab while nothing of ours is focused is left alone.
    poster.clear();
    assert!(!coordinator.alt_cycle_detected());
    assert!(poster.events().is_empty());
    // Switching back re-focuses the session.
    coordinator.host_activated();
    assert_eq!(gateway.focus_requests(), 1);
}

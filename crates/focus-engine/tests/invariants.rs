use std::{rc::Rc, sync::Arc};

use config::FocusConfig;
use focus_engine::{FocusCoordinator, WindowId, sim::SimGateway};
use proptest::prelude::*;
use relaykey::{RecordingPoster, RelayKey};

#[derive(Debug, Clone, Copy)]
enum Op {
    Gained,
    Lost,
    Activated,
    Deactivated,
    Clicked,
    SizeMoveBegin,
    SizeMoveEnd,
    PositionChanged(bool),
    AltCycle,
    Toggle,
    TabChanged,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Gained),
        3 => Just(Op::Lost),
        2 => Just(Op::Activated),
        2 => Just(Op::Deactivated),
        1 => Just(Op::Clicked),
        1 => Just(Op::SizeMoveBegin),
        1 => Just(Op::SizeMoveEnd),
        1 => any::<bool>().prop_map(Op::PositionChanged),
        2 => Just(Op::AltCycle),
        1 => Just(Op::Toggle),
        1 => Just(Op::TabChanged),
    ]
}

fn coordinator() -> (FocusCoordinator, Rc<SimGateway>) {
    let gw = Rc::new(SimGateway::new());
    gw.add_tab("prod", Some(WindowId(1)));
    gw.select("prod");
    let c = FocusCoordinator::new(
        gw.clone(),
        RelayKey::with_poster(Arc::new(RecordingPoster::new())),
        FocusConfig::default(),
    );
    (c, gw)
}

fn apply(c: &mut FocusCoordinator, op: Op) {
    match op {
        Op::Gained => c.child_gained_focus(),
        Op::Lost => c.child_lost_focus(),
        Op::Activated => c.host_activated(),
        Op::Deactivated => c.host_deactivated(),
        Op::Clicked => c.host_clicked(),
        Op::SizeMoveBegin => c.size_move_begin(),
        Op::SizeMoveEnd => c.size_move_end(),
        Op::PositionChanged(a) => c.window_position_changed(a),
        Op::AltCycle => {
            c.alt_cycle_detected();
        }
        Op::Toggle => c.focus_toggle_requested(),
        Op::TabChanged => c.active_tab_changed(),
    }
}

proptest! {
    #[test]
    fn count_tracks_gains_minus_losses(ops in prop::collection::vec(op(), 0..80)) {
        let (mut c, _) = coordinator();
        let mut expected = 0usize;
        for op in ops {
            match op {
                Op::Gained => expected += 1,
                Op::Lost => expected = expected.saturating_sub(1),
                _ => {}
            }
            apply(&mut c, op);
            prop_assert_eq!(c.state().child_focus_count, expected);
        }
    }

    #[test]
    fn guards_are_clear_between_calls(ops in prop::collection::vec(op(), 0..80)) {
        let (mut c, _) = coordinator();
        for op in ops {
            apply(&mut c, op);
            prop_assert!(c.state().guards_clear());
        }
    }

    #[test]
    fn gain_always_marks_child_held_last(ops in prop::collection::vec(op(), 0..40)) {
        let (mut c, _) = coordinator();
        for op in ops {
            apply(&mut c, op);
        }
        c.child_gained_focus();
        prop_assert!(c.state().child_process_held_last_focus);
    }

    #[test]
    fn lost_sets_flag_from_host_focus(ops in prop::collection::vec(op(), 0..40)) {
        let (mut c, _) = coordinator();
        for op in ops {
            apply(&mut c, op);
        }
        c.child_gained_focus();
        let main = c.state().main_window_focused;
        let last = c.state().child_focus_count == 1;
        c.child_lost_focus();
        let held = c.state().child_process_held_last_focus;
        if main {
            prop_assert!(!held);
        } else {
            prop_assert_eq!(held, last);
        }
    }

    #[test]
    fn activation_fires_once_iff_child_held_and_host_unfocused(ops in prop::collection::vec(op(), 0..40)) {
        let (mut c, gw) = coordinator();
        for op in ops {
            apply(&mut c, op);
        }
        let before = c.state();
        let requests = gw.focus_requests();
        c.host_activated();
        let fired = gw.focus_requests() - requests;
        let expected = before.child_process_held_last_focus && !before.main_window_focused;
        prop_assert_eq!(fired, usize::from(expected));
        prop_assert!(c.state().main_window_focused);
    }

    #[test]
    fn click_is_idempotent(ops in prop::collection::vec(op(), 0..40)) {
        let (mut c, _) = coordinator();
        for op in ops {
            apply(&mut c, op);
        }
        c.host_clicked();
        let once = c.state();
        c.host_clicked();
        prop_assert_eq!(c.state(), once);
    }
}

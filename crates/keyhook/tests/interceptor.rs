use crossbeam_channel::unbounded;
use keycode::{Chord, Key, Modifier};
use keyhook::{
    Error, HookDecision, HookSignal, Interceptor, KeyEvent, KeyTransition, KeyboardHook,
};
use proptest::prelude::*;

fn event_strategy() -> impl Strategy<Value = KeyEvent> {
    (
        prop::sample::select(vec![Key::Tab, Key::Grave, Key::A, Key::Alt]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(key, down, alt, injected)| {
            let transition = if down {
                KeyTransition::Down
            } else {
                KeyTransition::Up
            };
            let mods = if alt { vec![Modifier::Alt] } else { vec![] };
            let mut ev = KeyEvent::new(key, transition, mods);
            ev.injected = injected;
            ev
        })
}

proptest! {
    #[test]
    fn one_alt_cycle_signal_per_real_alt_tab_down(events in prop::collection::vec(event_strategy(), 0..64)) {
        let (tx, rx) = unbounded();
        let mut i = Interceptor::new(tx);
        for ev in &events {
            prop_assert_eq!(i.on_key_event(ev), HookDecision::PassThrough);
        }
        let expected = events
            .iter()
            .filter(|e| {
                !e.injected
                    && e.vk == u16::from(Key::Tab)
                    && e.transition == KeyTransition::Down
                    && e.modifiers.contains(&Modifier::Alt)
            })
            .count();
        let got: Vec<HookSignal> = rx.try_iter().collect();
        prop_assert_eq!(got.len(), expected);
        prop_assert!(got.iter().all(|s| *s == HookSignal::AltCycleDetected));
    }

    #[test]
    fn toggle_downs_and_ups_are_balanced(events in prop::collection::vec(event_strategy(), 0..64)) {
        let (tx, _rx) = unbounded();
        let mut i = Interceptor::new(tx).with_toggle(Chord::parse("alt+`"));
        let mut swallowed_downs = 0usize;
        let mut swallowed_ups = 0usize;
        let mut held = false;
        for ev in &events {
            let d = i.on_key_event(ev);
            if ev.injected || ev.vk != u16::from(Key::Grave) {
                continue;
            }
            match (ev.transition, d) {
                (KeyTransition::Down, HookDecision::Consume) => {
                    if !held {
                        swallowed_downs += 1;
                    }
                    held = true;
                }
                (KeyTransition::Up, HookDecision::Consume) => {
                    prop_assert!(held);
                    swallowed_ups += 1;
                    held = false;
                }
                _ => {}
            }
        }
        prop_assert!(swallowed_downs == swallowed_ups || swallowed_downs == swallowed_ups + 1);
    }
}

#[cfg(not(windows))]
#[test]
fn install_reports_unsupported_off_windows() {
    let (tx, _rx) = unbounded();
    let err = KeyboardHook::install(Interceptor::new(tx)).expect_err("no hook binding");
    assert_eq!(err, Error::Unsupported);
}

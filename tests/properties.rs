use padflow::backend::MemoryPlatform;
use padflow::input::{JoystickHandle, Suppression};
use padflow::{AxisState, InputContext, KeyboardKey, RawSample};
use proptest::prelude::*;

fn joypad_context() -> InputContext<MemoryPlatform> {
    let mut context = InputContext::new(MemoryPlatform::with_joysticks(1));
    context.set_joypad_enabled(true);
    context
}

fn ambiguous_value() -> impl Strategy<Value = i16> {
    prop_oneof![1001i16..10000, -9999i16..-1000]
}

fn decisive_value() -> impl Strategy<Value = i16> {
    prop_oneof![10000i16..=i16::MAX, i16::MIN..=-10000i16]
}

fn any_key() -> impl Strategy<Value = KeyboardKey> {
    prop::sample::select(KeyboardKey::ALL.to_vec())
}

proptest! {
    #[test]
    fn ambiguous_values_never_change_the_state(
        axis in 0u8..6,
        first in decisive_value(),
        noise in prop::collection::vec(ambiguous_value(), 1..20),
    ) {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(axis, first));
        prop_assert!(context.next_event().unwrap().is_valid());
        let recorded = context.axis_state(axis);

        for value in noise {
            context.platform_mut().push_sample(RawSample::axis(axis, value));
            let event = context.next_event().unwrap();
            prop_assert_eq!(event.suppression(), Some(Suppression::AxisDeadband));
            prop_assert_eq!(context.axis_state(axis), recorded);
        }
    }

    #[test]
    fn decisive_values_follow_the_sign(axis in 0u8..6, value in decisive_value()) {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(axis, value));
        context.platform_mut().push_sample(RawSample::axis(axis, value));

        let first = context.next_event().unwrap();
        let second = context.next_event().unwrap();
        let expected = if value > 0 { AxisState::Positive } else { AxisState::Negative };

        prop_assert!(first.is_valid());
        prop_assert_eq!(first.get_joypad_axis_state(), expected);
        prop_assert_eq!(second.suppression(), Some(Suppression::AxisUnchanged));
        prop_assert_eq!(context.axis_state(axis), expected);
    }

    #[test]
    fn presses_of_keys_not_held_are_stale(keys in prop::collection::vec(any_key(), 1..10)) {
        let mut context = InputContext::new(MemoryPlatform::new());
        for key in &keys {
            context.platform_mut().push_sample(RawSample::key_down(*key));
        }

        while let Some(event) = context.next_event() {
            prop_assert_eq!(event.suppression(), Some(Suppression::KeyNotHeld));
            prop_assert!(!event.is_pressed());
        }
        prop_assert_eq!(context.keys_pressed().count(), 0);
    }

    #[test]
    fn known_keys_match_held_keys(
        actions in prop::collection::vec((any_key(), any::<bool>()), 0..40),
    ) {
        let mut context = InputContext::new(MemoryPlatform::new());
        for (key, press) in &actions {
            if *press {
                context.platform_mut().press_key(*key);
            } else {
                context.platform_mut().release_key(*key);
            }
        }
        while context.next_event().is_some() {}

        let mut known: Vec<KeyboardKey> = context.keys_pressed().collect();
        known.sort();
        let mut held: Vec<KeyboardKey> = KeyboardKey::ALL
            .iter()
            .copied()
            .filter(|key| context.devices().is_key_down(*key))
            .collect();
        held.sort();
        prop_assert_eq!(known, held);
    }

    #[test]
    fn enabling_is_idempotent(times in 1usize..5) {
        let mut context = InputContext::new(MemoryPlatform::with_joysticks(2));
        for _ in 0..times {
            context.set_joypad_enabled(true);
        }
        prop_assert_eq!(context.devices().joystick(), Some(JoystickHandle(0)));
        prop_assert_eq!(context.platform().open_count(), 1);
        prop_assert_eq!(context.platform().open_calls(), 1);
    }
}

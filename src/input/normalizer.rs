//! Event Normalizer
//!
//! Turns one raw sample into one canonical [`InputEvent`]. Samples that carry
//! nothing new are not dropped: they come back as invalid events, so a host
//! draining the queue can tell "filtered" from "empty" and keeps going until
//! every sample of the frame has been seen.
//!
//! Filtering order:
//!
//! 1. joystick samples while joystick support is off
//! 2. axis values inside the deadzone band
//! 3. axis values whose classified state did not change
//! 4. key presses of keys that are not physically held (stale), or already
//!    known as pressed (marked repeat)
//! 5. key releases of keys still physically held (stale), or not known as
//!    pressed (marked repeat)

use crate::input::context::InputContext;
use crate::input::event::{InputEvent, Suppression};
use crate::input::keys::KeyboardKey;
use crate::input::platform::Platform;
use crate::input::raw::{AxisState, RawSample, AXIS_SLOTS};
use tracing::{debug, trace};

impl<P: Platform> InputContext<P> {
    /// Returns the next event, or `None` once the platform queue is empty
    ///
    /// Never blocks. The returned event may be invalid; callers must keep
    /// draining until `None`.
    pub fn next_event(&mut self) -> Option<InputEvent> {
        let mut sample = self.devices.platform_mut().poll_sample()?;
        trace!("Raw sample: {:?}", sample);

        let suppression = self.filter_sample(&mut sample);
        match suppression {
            Some(reason) => debug!("Suppressed {:?}: {:?}", sample, reason),
            None => debug!("Accepted {:?}", sample),
        }

        Some(InputEvent::new(
            sample,
            suppression,
            self.key_repeat,
            self.axis.press_threshold,
        ))
    }

    fn filter_sample(&mut self, sample: &mut RawSample) -> Option<Suppression> {
        if sample.is_joypad() && !self.devices.is_joypad_enabled() {
            return Some(Suppression::JoypadDisabled);
        }

        match sample {
            RawSample::JoyAxisMotion { axis, value } => self.filter_axis(*axis, *value),
            RawSample::KeyDown { key, repeat, .. } => self.filter_key_down(*key, repeat),
            RawSample::KeyUp { key, repeat, .. } => self.filter_key_up(*key, repeat),
            _ => None,
        }
    }

    fn filter_axis(&mut self, axis: u8, value: i16) -> Option<Suppression> {
        let magnitude = value.unsigned_abs();
        if magnitude > self.axis.release_threshold && magnitude < self.axis.press_threshold {
            return Some(Suppression::AxisDeadband);
        }

        let state = AxisState::classify(value, self.axis.press_threshold);
        let slot = usize::from(axis) % AXIS_SLOTS;
        if self.axis_states[slot] == state {
            return Some(Suppression::AxisUnchanged);
        }

        debug!(
            "Axis {} (slot {}): {:?} -> {:?}",
            axis, slot, self.axis_states[slot], state
        );
        self.axis_states[slot] = state;
        None
    }

    fn filter_key_down(&mut self, key: KeyboardKey, repeat: &mut bool) -> Option<Suppression> {
        if !self.devices.is_key_down(key) {
            return Some(Suppression::KeyNotHeld);
        }
        if !self.keys_pressed.insert(key) {
            *repeat = true;
        }
        None
    }

    fn filter_key_up(&mut self, key: KeyboardKey, repeat: &mut bool) -> Option<Suppression> {
        if self.devices.is_key_down(key) {
            return Some(Suppression::KeyStillHeld);
        }
        if !self.keys_pressed.remove(&key) {
            *repeat = true;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryPlatform;
    use crate::input::raw::HatPosition;

    fn joypad_context() -> InputContext<MemoryPlatform> {
        let mut context = InputContext::new(MemoryPlatform::new());
        context.set_joypad_enabled(true);
        context
    }

    fn drain(context: &mut InputContext<MemoryPlatform>) -> Vec<InputEvent> {
        std::iter::from_fn(|| context.next_event()).collect()
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut context = joypad_context();
        assert!(context.next_event().is_none());
    }

    #[test]
    fn axis_push_duplicate_and_recenter() {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(0, 12000));
        context.platform_mut().push_sample(RawSample::axis(0, 12000));
        context.platform_mut().push_sample(RawSample::axis(0, 500));

        let events = drain(&mut context);
        assert_eq!(events.len(), 3);
        assert!(events[0].is_valid());
        assert_eq!(events[0].get_joypad_axis_state(), AxisState::Positive);
        assert_eq!(events[1].suppression(), Some(Suppression::AxisUnchanged));
        assert!(events[2].is_valid());
        assert!(events[2].is_joypad_axis_centered());
        assert_eq!(context.axis_state(0), AxisState::Centered);
    }

    #[test]
    fn deadband_keeps_axis_state() {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(1, -15000));
        context.platform_mut().push_sample(RawSample::axis(1, -5000));
        context.platform_mut().push_sample(RawSample::axis(1, 9999));

        let events = drain(&mut context);
        assert!(events[0].is_valid());
        assert_eq!(events[1].suppression(), Some(Suppression::AxisDeadband));
        assert_eq!(events[2].suppression(), Some(Suppression::AxisDeadband));
        assert_eq!(context.axis_state(1), AxisState::Negative);
    }

    #[test]
    fn band_edges_are_accepted() {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(0, -10000));
        context.platform_mut().push_sample(RawSample::axis(0, 1000));

        let events = drain(&mut context);
        assert!(events[0].is_valid());
        assert_eq!(events[0].get_joypad_axis_state(), AxisState::Negative);
        assert!(events[1].is_valid());
        assert_eq!(context.axis_state(0), AxisState::Centered);
    }

    #[test]
    fn sign_flip_is_a_new_state() {
        let mut context = joypad_context();
        context.platform_mut().push_sample(RawSample::axis(0, 30000));
        context.platform_mut().push_sample(RawSample::axis(0, -30000));

        let events = drain(&mut context);
        assert!(events.iter().all(InputEvent::is_valid));
        assert_eq!(context.axis_state(0), AxisState::Negative);
    }

    #[test]
    fn joystick_samples_are_suppressed_while_disabled() {
        let mut context = InputContext::new(MemoryPlatform::new());
        context.platform_mut().push_sample(RawSample::axis(0, 20000));
        context
            .platform_mut()
            .push_sample(RawSample::JoyButtonDown { button: 1 });

        let events = drain(&mut context);
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|event| event.suppression() == Some(Suppression::JoypadDisabled)));
        assert_eq!(context.axis_state(0), AxisState::Centered);
    }

    #[test]
    fn stale_key_press_is_suppressed() {
        let mut context = joypad_context();
        context
            .platform_mut()
            .push_sample(RawSample::key_down(KeyboardKey::Space));

        let event = context.next_event().unwrap();
        assert_eq!(event.suppression(), Some(Suppression::KeyNotHeld));
        assert!(!context.is_known_pressed(KeyboardKey::Space));
    }

    #[test]
    fn second_press_is_a_repeat() {
        let mut context = joypad_context();
        context.platform_mut().press_key(KeyboardKey::X);
        context.platform_mut().press_key(KeyboardKey::X);

        let events = drain(&mut context);
        assert!(events[0].is_keyboard_key_pressed());
        assert!(events[1].is_valid());
        assert!(matches!(
            events[1].sample(),
            RawSample::KeyDown { repeat: true, .. }
        ));
        assert!(!events[1].is_keyboard_key_pressed());
        assert_eq!(context.keys_pressed().count(), 1);
    }

    #[test]
    fn release_of_held_key_is_suppressed() {
        let mut context = joypad_context();
        context.platform_mut().press_key(KeyboardKey::Z);
        context
            .platform_mut()
            .push_sample(RawSample::key_up(KeyboardKey::Z));

        let events = drain(&mut context);
        assert!(events[0].is_valid());
        assert_eq!(events[1].suppression(), Some(Suppression::KeyStillHeld));
        assert!(context.is_known_pressed(KeyboardKey::Z));
    }

    #[test]
    fn release_then_unknown_release() {
        let mut context = joypad_context();
        context.platform_mut().press_key(KeyboardKey::Z);
        context.platform_mut().release_key(KeyboardKey::Z);
        context.platform_mut().release_key(KeyboardKey::Z);

        let events = drain(&mut context);
        assert!(events[1].is_keyboard_key_released());
        assert!(events[2].is_valid());
        assert!(!events[2].is_keyboard_key_released());
        assert!(!context.is_known_pressed(KeyboardKey::Z));
    }

    #[test]
    fn repeat_policy_is_captured_per_event() {
        let mut context = joypad_context();
        context.platform_mut().press_key(KeyboardKey::A);
        context.platform_mut().press_key(KeyboardKey::A);
        let first = context.next_event().unwrap();

        context.set_key_repeat(true);
        let second = context.next_event().unwrap();
        context.set_key_repeat(false);

        assert!(first.is_keyboard_key_pressed());
        assert!(second.is_keyboard_key_pressed());
    }

    #[test]
    fn other_samples_pass_through() {
        let mut context = joypad_context();
        context.platform_mut().push_text("é");
        context
            .platform_mut()
            .push_sample(RawSample::hat(0, HatPosition::Down));
        context.platform_mut().push_sample(RawSample::WindowClose);

        let events = drain(&mut context);
        assert!(events.iter().all(InputEvent::is_valid));
        assert_eq!(events[0].get_character(), "é");
        assert!(events[1].is_joypad_hat_moved());
        assert!(events[2].is_window_closing());
    }
}

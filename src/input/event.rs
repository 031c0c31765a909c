//! Canonical input events and their query façade
//!
//! Every accessor is total. A question that does not apply to the event's
//! category gets a neutral answer (`false`, `None`, `""` or
//! [`AxisState::Centered`]), and an invalid event answers every question as if
//! it carried no input at all.

use crate::config::AxisConfig;
use crate::input::direction::Direction8;
use crate::input::keys::{KeyModifiers, KeyboardKey, DIRECTIONAL_KEYS};
use crate::input::raw::{AxisState, RawSample};

/// Why the normalizer turned a sample into an invalid event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suppression {
    /// Joystick support is disabled
    JoypadDisabled,
    /// Axis value between the release and press thresholds
    AxisDeadband,
    /// Axis state equals the one already reported
    AxisUnchanged,
    /// Key press for a key that is not physically held
    KeyNotHeld,
    /// Key release for a key that is still physically held
    KeyStillHeld,
}

/// One normalized input event
///
/// Produced by [`InputContext::next_event`](crate::input::InputContext::next_event),
/// handled during the same frame and then dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    sample: RawSample,
    suppression: Option<Suppression>,
    repeat_enabled: bool,
    press_threshold: u16,
}

impl InputEvent {
    pub(crate) fn new(
        sample: RawSample,
        suppression: Option<Suppression>,
        repeat_enabled: bool,
        press_threshold: u16,
    ) -> Self {
        Self {
            sample,
            suppression,
            repeat_enabled,
            press_threshold,
        }
    }

    /// Wraps a sample as an accepted event under the default policy
    /// (repeat delivery off, default press threshold), bypassing the normalizer
    pub fn from_sample(sample: RawSample) -> Self {
        Self::new(sample, None, false, AxisConfig::default().press_threshold)
    }

    /// The wrapped sample, as it left the normalizer
    pub fn sample(&self) -> &RawSample {
        &self.sample
    }

    pub fn suppression(&self) -> Option<Suppression> {
        self.suppression
    }

    /// The sample, unless this event was suppressed
    fn live(&self) -> Option<&RawSample> {
        match self.suppression {
            None => Some(&self.sample),
            Some(_) => None,
        }
    }

    fn passes_repeat_gate(&self, repeat: bool) -> bool {
        !repeat || self.repeat_enabled
    }

    // event type

    /// Returns `false` if the sample was suppressed and must be ignored
    pub fn is_valid(&self) -> bool {
        self.suppression.is_none()
    }

    /// Key press or release that passes the repeat policy
    pub fn is_keyboard_event(&self) -> bool {
        match self.live() {
            Some(RawSample::KeyDown { repeat, .. }) | Some(RawSample::KeyUp { repeat, .. }) => {
                self.passes_repeat_gate(*repeat)
            }
            _ => false,
        }
    }

    pub fn is_joypad_event(&self) -> bool {
        self.live().is_some_and(RawSample::is_joypad)
    }

    pub fn is_window_event(&self) -> bool {
        matches!(self.live(), Some(RawSample::WindowClose))
    }

    // keyboard

    pub fn is_keyboard_key_pressed(&self) -> bool {
        match self.live() {
            Some(RawSample::KeyDown { repeat, .. }) => self.passes_repeat_gate(*repeat),
            _ => false,
        }
    }

    pub fn is_key_pressed(&self, key: KeyboardKey) -> bool {
        self.is_keyboard_key_pressed() && self.get_keyboard_key() == Some(key)
    }

    pub fn is_one_of_keys_pressed(&self, keys: &[KeyboardKey]) -> bool {
        keys.iter().any(|key| self.is_key_pressed(*key))
    }

    /// Press of one of the four arrow keys
    pub fn is_keyboard_direction_key_pressed(&self) -> bool {
        self.is_one_of_keys_pressed(&DIRECTIONAL_KEYS)
    }

    pub fn is_keyboard_non_direction_key_pressed(&self) -> bool {
        self.is_keyboard_key_pressed() && !self.is_keyboard_direction_key_pressed()
    }

    pub fn is_keyboard_key_released(&self) -> bool {
        match self.live() {
            Some(RawSample::KeyUp { repeat, .. }) => self.passes_repeat_gate(*repeat),
            _ => false,
        }
    }

    pub fn is_key_released(&self, key: KeyboardKey) -> bool {
        self.is_keyboard_key_released() && self.get_keyboard_key() == Some(key)
    }

    pub fn is_one_of_keys_released(&self, keys: &[KeyboardKey]) -> bool {
        keys.iter().any(|key| self.is_key_released(*key))
    }

    pub fn is_keyboard_direction_key_released(&self) -> bool {
        self.is_one_of_keys_released(&DIRECTIONAL_KEYS)
    }

    pub fn is_keyboard_non_direction_key_released(&self) -> bool {
        self.is_keyboard_key_released() && !self.is_keyboard_direction_key_released()
    }

    /// Modifiers held during this keyboard event, empty for anything else
    pub fn modifiers(&self) -> KeyModifiers {
        if !self.is_keyboard_event() {
            return KeyModifiers::empty();
        }
        match &self.sample {
            RawSample::KeyDown { modifiers, .. } | RawSample::KeyUp { modifiers, .. } => {
                *modifiers
            }
            _ => KeyModifiers::empty(),
        }
    }

    pub fn is_with_shift(&self) -> bool {
        self.modifiers().contains(KeyModifiers::SHIFT)
    }

    pub fn is_with_control(&self) -> bool {
        self.modifiers().contains(KeyModifiers::CTRL)
    }

    pub fn is_with_alt(&self) -> bool {
        self.modifiers().contains(KeyModifiers::ALT)
    }

    /// Key pressed or released, `None` if this is not a keyboard event.
    /// See [`get_character`](Self::get_character) for the text it produced.
    pub fn get_keyboard_key(&self) -> Option<KeyboardKey> {
        if !self.is_keyboard_event() {
            return None;
        }
        match &self.sample {
            RawSample::KeyDown { key, .. } | RawSample::KeyUp { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Returns whether this event carries entered text
    pub fn is_character_pressed(&self) -> bool {
        matches!(self.live(), Some(RawSample::TextInput { .. }))
    }

    /// UTF-8 text entered, empty if this is not a text event
    pub fn get_character(&self) -> &str {
        match self.live() {
            Some(RawSample::TextInput { text }) => text.as_str(),
            _ => "",
        }
    }

    // joypad

    pub fn is_joypad_button_pressed(&self) -> bool {
        matches!(self.live(), Some(RawSample::JoyButtonDown { .. }))
    }

    pub fn is_joypad_button_released(&self) -> bool {
        matches!(self.live(), Some(RawSample::JoyButtonUp { .. }))
    }

    /// Button pressed or released, `None` if this is not a button event
    pub fn get_joypad_button(&self) -> Option<u8> {
        match self.live() {
            Some(RawSample::JoyButtonDown { button }) | Some(RawSample::JoyButtonUp { button }) => {
                Some(*button)
            }
            _ => None,
        }
    }

    pub fn is_joypad_axis_moved(&self) -> bool {
        matches!(self.live(), Some(RawSample::JoyAxisMotion { .. }))
    }

    /// Axis moved (0 and 1 are usually x and y), `None` if not an axis event
    pub fn get_joypad_axis(&self) -> Option<u8> {
        match self.live() {
            Some(RawSample::JoyAxisMotion { axis, .. }) => Some(*axis),
            _ => None,
        }
    }

    /// New state of the moved axis, `Centered` if not an axis event
    pub fn get_joypad_axis_state(&self) -> AxisState {
        match self.live() {
            Some(RawSample::JoyAxisMotion { value, .. }) => {
                AxisState::classify(*value, self.press_threshold)
            }
            _ => AxisState::Centered,
        }
    }

    /// Returns whether the moved axis is back at rest
    pub fn is_joypad_axis_centered(&self) -> bool {
        self.is_joypad_axis_moved() && self.get_joypad_axis_state().is_centered()
    }

    pub fn is_joypad_hat_moved(&self) -> bool {
        matches!(self.live(), Some(RawSample::JoyHatMotion { .. }))
    }

    pub fn get_joypad_hat(&self) -> Option<u8> {
        match self.live() {
            Some(RawSample::JoyHatMotion { hat, .. }) => Some(*hat),
            _ => None,
        }
    }

    /// New direction of the moved hat, `None` if centered or not a hat event
    pub fn get_joypad_hat_direction(&self) -> Option<Direction8> {
        match self.live() {
            Some(RawSample::JoyHatMotion { position, .. }) => position.direction(),
            _ => None,
        }
    }

    pub fn is_joypad_hat_centered(&self) -> bool {
        self.is_joypad_hat_moved() && self.get_joypad_hat_direction().is_none()
    }

    // window

    pub fn is_window_closing(&self) -> bool {
        matches!(self.live(), Some(RawSample::WindowClose))
    }
}

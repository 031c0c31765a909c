//! Device State Tracker
//!
//! Answers questions about the live state of the keyboard and of the opened
//! joystick, and owns the joystick handle. Every query is side-effect free and
//! falls back to a neutral answer when no joystick is open.

use crate::input::direction::Direction8;
use crate::input::keys::{KeyModifiers, KeyboardKey};
use crate::input::platform::{JoystickHandle, Platform};
use crate::input::raw::AxisState;
use tracing::{debug, info, warn};

/// Live device state on top of a platform backend
///
/// The joystick handle is closed when support is disabled, on
/// [`shutdown`](DeviceTracker::shutdown), and at the latest when the tracker is
/// dropped.
pub struct DeviceTracker<P: Platform> {
    platform: P,
    joypad_enabled: bool,
    joystick: Option<JoystickHandle>,
    press_threshold: u16,
}

impl<P: Platform> DeviceTracker<P> {
    /// Creates a tracker with joystick support disabled
    pub fn new(platform: P, press_threshold: u16) -> Self {
        Self {
            platform,
            joypad_enabled: false,
            joystick: None,
            press_threshold,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub(crate) fn set_press_threshold(&mut self, press_threshold: u16) {
        self.press_threshold = press_threshold;
    }

    pub fn is_shift_down(&self) -> bool {
        self.platform.key_modifiers().contains(KeyModifiers::SHIFT)
    }

    pub fn is_control_down(&self) -> bool {
        self.platform.key_modifiers().contains(KeyModifiers::CTRL)
    }

    pub fn is_alt_down(&self) -> bool {
        self.platform.key_modifiers().contains(KeyModifiers::ALT)
    }

    pub fn is_caps_lock_on(&self) -> bool {
        self.platform.key_modifiers().contains(KeyModifiers::CAPS_LOCK)
    }

    pub fn is_num_lock_on(&self) -> bool {
        self.platform.key_modifiers().contains(KeyModifiers::NUM_LOCK)
    }

    /// Returns whether the key is physically held right now
    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.platform.is_key_down(key)
    }

    /// Returns whether joystick support is on (possibly with nothing plugged)
    pub fn is_joypad_enabled(&self) -> bool {
        self.joypad_enabled
    }

    /// Handle of the opened joystick, if any
    pub fn joystick(&self) -> Option<JoystickHandle> {
        self.joystick
    }

    /// Turns joystick support on or off
    ///
    /// Enabling opens the first attached device if there is one; disabling
    /// closes the open device. Setting the current value again does nothing.
    pub fn set_joypad_enabled(&mut self, enabled: bool) {
        if enabled == self.joypad_enabled {
            debug!("Joypad support already {}", on_off(enabled));
            return;
        }

        self.joypad_enabled = enabled;
        self.close_joystick();

        if !enabled {
            info!("Joypad support disabled");
            return;
        }

        let count = self.platform.joystick_count();
        if count == 0 {
            info!("Joypad support enabled, no joystick plugged");
            return;
        }

        match self.platform.open_joystick(0) {
            Some(handle) => {
                info!(
                    "Joypad support enabled, opened joystick {:?} ({} attached)",
                    handle, count
                );
                self.joystick = Some(handle);
            }
            None => {
                warn!("Failed to open joystick 0, continuing without joystick");
            }
        }
    }

    /// Returns whether a joystick button is held right now
    pub fn is_joypad_button_down(&self, button: u8) -> bool {
        match self.joystick {
            Some(handle) => self.platform.joystick_button(handle, button),
            None => false,
        }
    }

    /// Live state of a joystick axis, `Centered` without a joystick
    pub fn get_joypad_axis_state(&self, axis: u8) -> AxisState {
        match self.joystick {
            Some(handle) => AxisState::classify(
                self.platform.joystick_axis(handle, axis),
                self.press_threshold,
            ),
            None => AxisState::Centered,
        }
    }

    /// Live direction of a joystick hat, `None` if centered or without a joystick
    pub fn get_joypad_hat_direction(&self, hat: u8) -> Option<Direction8> {
        self.joystick
            .and_then(|handle| self.platform.joystick_hat(handle, hat).direction())
    }

    /// Closes the open joystick, if any
    pub fn shutdown(&mut self) {
        self.close_joystick();
    }

    fn close_joystick(&mut self) {
        if let Some(handle) = self.joystick.take() {
            self.platform.close_joystick(handle);
            info!("Closed joystick {:?}", handle);
        }
    }
}

impl<P: Platform> Drop for DeviceTracker<P> {
    fn drop(&mut self) {
        self.close_joystick();
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryPlatform;
    use crate::input::raw::HatPosition;

    #[test]
    fn modifiers_come_from_live_state() {
        let mut platform = MemoryPlatform::new();
        platform.set_modifiers(KeyModifiers::SHIFT | KeyModifiers::CAPS_LOCK);
        let tracker = DeviceTracker::new(platform, 10000);

        assert!(tracker.is_shift_down());
        assert!(tracker.is_caps_lock_on());
        assert!(!tracker.is_control_down());
        assert!(!tracker.is_alt_down());
        assert!(!tracker.is_num_lock_on());
    }

    #[test]
    fn enabling_without_devices_is_neutral() {
        let mut tracker = DeviceTracker::new(MemoryPlatform::new(), 10000);
        tracker.set_joypad_enabled(true);

        assert!(tracker.is_joypad_enabled());
        assert_eq!(tracker.joystick(), None);
        assert!(!tracker.is_joypad_button_down(0));
        assert_eq!(tracker.get_joypad_axis_state(0), AxisState::Centered);
        assert_eq!(tracker.get_joypad_hat_direction(0), None);
    }

    #[test]
    fn refused_open_leaves_support_on_without_a_joystick() {
        let mut platform = MemoryPlatform::new();
        let index = platform.attach_joystick();
        platform.set_joystick_button(index, 1, true);
        platform.set_joystick_axis(index, 0, 20000);
        platform.refuse_open(true);
        let mut tracker = DeviceTracker::new(platform, 10000);

        tracker.set_joypad_enabled(true);
        assert!(tracker.is_joypad_enabled());
        assert_eq!(tracker.joystick(), None);
        assert!(!tracker.is_joypad_button_down(1));
        assert_eq!(tracker.get_joypad_axis_state(0), AxisState::Centered);
        assert_eq!(tracker.platform().open_count(), 0);

        tracker.platform_mut().refuse_open(false);
        tracker.set_joypad_enabled(false);
        tracker.set_joypad_enabled(true);
        assert_eq!(tracker.joystick(), Some(JoystickHandle(0)));
        assert!(tracker.is_joypad_button_down(1));
        assert_eq!(tracker.get_joypad_axis_state(0), AxisState::Positive);
        assert_eq!(tracker.platform().open_count(), 1);
    }

    #[test]
    fn enabling_twice_opens_once() {
        let mut tracker = DeviceTracker::new(MemoryPlatform::with_joysticks(2), 10000);
        tracker.set_joypad_enabled(true);
        let first = tracker.joystick();
        tracker.set_joypad_enabled(true);

        assert_eq!(tracker.joystick(), first);
        assert_eq!(first, Some(JoystickHandle(0)));
        assert_eq!(tracker.platform().open_count(), 1);
        assert_eq!(tracker.platform().open_calls(), 1);
    }

    #[test]
    fn disabling_closes_the_device() {
        let mut tracker = DeviceTracker::new(MemoryPlatform::with_joysticks(1), 10000);
        tracker.set_joypad_enabled(true);
        tracker.set_joypad_enabled(false);

        assert!(!tracker.is_joypad_enabled());
        assert_eq!(tracker.joystick(), None);
        assert_eq!(tracker.platform().open_count(), 0);
    }

    #[test]
    fn live_joystick_queries() {
        let mut platform = MemoryPlatform::with_joysticks(1);
        platform.set_joystick_button(0, 3, true);
        platform.set_joystick_axis(0, 1, -20000);
        platform.set_joystick_axis(0, 0, 4000);
        platform.set_joystick_hat(0, 0, HatPosition::LeftUp);
        let mut tracker = DeviceTracker::new(platform, 10000);

        assert!(!tracker.is_joypad_button_down(3));
        tracker.set_joypad_enabled(true);

        assert!(tracker.is_joypad_button_down(3));
        assert!(!tracker.is_joypad_button_down(4));
        assert_eq!(tracker.get_joypad_axis_state(1), AxisState::Negative);
        assert_eq!(tracker.get_joypad_axis_state(0), AxisState::Centered);
        assert_eq!(tracker.get_joypad_hat_direction(0), Some(Direction8::UpLeft));
    }

    #[test]
    fn drop_closes_the_device() {
        let platform = MemoryPlatform::with_joysticks(1);
        let open_devices = platform.open_device_counter();
        {
            let mut tracker = DeviceTracker::new(platform, 10000);
            tracker.set_joypad_enabled(true);
            assert_eq!(open_devices.get(), 1);
        }
        assert_eq!(open_devices.get(), 0);
    }
}

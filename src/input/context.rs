//! Input context owned by the host loop
//!
//! Holds everything the normalizer remembers between samples: the recorded
//! axis states, the keys known as pressed, the repeat policy and the device
//! tracker. The host owns one context and lends it mutably to each
//! [`next_event`](InputContext::next_event) call; nothing here is global.

use crate::config::{AxisConfig, InputConfig};
use crate::input::device::DeviceTracker;
use crate::input::keys::KeyboardKey;
use crate::input::platform::Platform;
use crate::input::raw::{AxisState, AXIS_SLOTS};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct InputContext<P: Platform> {
    pub(crate) devices: DeviceTracker<P>,
    pub(crate) axis_states: [AxisState; AXIS_SLOTS],
    pub(crate) keys_pressed: HashSet<KeyboardKey>,
    pub(crate) key_repeat: bool,
    pub(crate) axis: AxisConfig,
}

impl<P: Platform> InputContext<P> {
    /// Creates a context with default thresholds, repeat delivery off and
    /// joystick support off
    pub fn new(platform: P) -> Self {
        let axis = AxisConfig::default();
        Self {
            devices: DeviceTracker::new(platform, axis.press_threshold),
            axis_states: [AxisState::Centered; AXIS_SLOTS],
            keys_pressed: HashSet::new(),
            key_repeat: false,
            axis,
        }
    }

    /// Creates a context and applies `config` to it
    pub fn with_config(platform: P, config: &InputConfig) -> Self {
        let mut context = Self::new(platform);
        context.set_axis_config(config.axis);
        context.set_key_repeat(config.key_repeat);
        context.set_joypad_enabled(config.joypad_enabled);
        context
    }

    pub fn devices(&self) -> &DeviceTracker<P> {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut DeviceTracker<P> {
        &mut self.devices
    }

    pub fn platform(&self) -> &P {
        self.devices.platform()
    }

    pub fn platform_mut(&mut self) -> &mut P {
        self.devices.platform_mut()
    }

    /// Recorded state of the slot that `axis` folds onto
    pub fn axis_state(&self, axis: u8) -> AxisState {
        self.axis_states[usize::from(axis) % AXIS_SLOTS]
    }

    /// Returns whether the key is known as pressed from accepted events
    pub fn is_known_pressed(&self, key: KeyboardKey) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Keys known as pressed from accepted events, in no particular order
    pub fn keys_pressed(&self) -> impl Iterator<Item = KeyboardKey> + '_ {
        self.keys_pressed.iter().copied()
    }

    pub fn is_key_repeat(&self) -> bool {
        self.key_repeat
    }

    /// Sets whether repeated presses and releases reach consumers
    ///
    /// Applies to events produced after this call only.
    pub fn set_key_repeat(&mut self, repeat: bool) {
        if self.key_repeat != repeat {
            info!("Keyboard repeat delivery {}", if repeat { "on" } else { "off" });
        }
        self.key_repeat = repeat;
    }

    pub fn is_joypad_enabled(&self) -> bool {
        self.devices.is_joypad_enabled()
    }

    /// Turns joystick support on or off
    ///
    /// Axis samples are not tracked while support is off, so on every change
    /// the recorded axis states are re-read from the live device (`Centered`
    /// when none is open).
    pub fn set_joypad_enabled(&mut self, enabled: bool) {
        if enabled == self.devices.is_joypad_enabled() {
            return;
        }
        self.devices.set_joypad_enabled(enabled);
        for (slot, state) in self.axis_states.iter_mut().enumerate() {
            *state = self.devices.get_joypad_axis_state(slot as u8);
        }
        debug!("Axis states reseeded: {:?}", self.axis_states);
    }

    pub fn axis_config(&self) -> AxisConfig {
        self.axis
    }

    pub fn set_axis_config(&mut self, axis: AxisConfig) {
        debug!(
            "Axis band set to release <= {}, press >= {}",
            axis.release_threshold, axis.press_threshold
        );
        self.axis = axis;
        self.devices.set_press_threshold(axis.press_threshold);
    }

    /// Closes any open joystick; the context stays usable without it
    pub fn shutdown(&mut self) {
        self.devices.shutdown();
    }
}

//! In-memory platform
//!
//! Scripted backend used by tests and replays. Samples are queued by hand, the
//! live keyboard state and the attached joysticks are plain fields.
//! [`press_key`](MemoryPlatform::press_key) and
//! [`release_key`](MemoryPlatform::release_key) change the live key state at
//! the moment their sample is polled, the way a real keyboard has already
//! changed state by the time its event is read.

use crate::input::keys::{KeyModifiers, KeyboardKey};
use crate::input::platform::{EventSource, JoystickDriver, JoystickHandle, KeyboardProbe};
use crate::input::raw::{HatPosition, RawSample};
use std::cell::Cell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use tracing::trace;

#[derive(Clone, Copy, Debug)]
enum HeldEffect {
    None,
    Hold(KeyboardKey),
    Lift(KeyboardKey),
}

#[derive(Clone, Debug, Default)]
struct MemoryJoystick {
    buttons: HashSet<u8>,
    axes: HashMap<u8, i16>,
    hats: HashMap<u8, HatPosition>,
}

#[derive(Debug, Default)]
pub struct MemoryPlatform {
    queue: VecDeque<(RawSample, HeldEffect)>,
    held: HashSet<KeyboardKey>,
    modifiers: KeyModifiers,
    joysticks: Vec<MemoryJoystick>,
    open: HashSet<usize>,
    open_devices: Rc<Cell<usize>>,
    open_calls: usize,
    refuse_open: bool,
}

impl MemoryPlatform {
    /// Platform with an empty queue, nothing held and no joystick attached
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joysticks(count: usize) -> Self {
        let mut platform = Self::new();
        platform.joysticks = vec![MemoryJoystick::default(); count];
        platform
    }

    /// Queues a sample without touching the live state
    pub fn push_sample(&mut self, sample: RawSample) {
        self.queue.push_back((sample, HeldEffect::None));
    }

    pub fn push_samples(&mut self, samples: impl IntoIterator<Item = RawSample>) {
        for sample in samples {
            self.push_sample(sample);
        }
    }

    /// Queues a key press; the key counts as held once the sample is polled
    pub fn press_key(&mut self, key: KeyboardKey) {
        let sample = RawSample::KeyDown {
            key,
            modifiers: self.modifiers,
            repeat: false,
        };
        self.queue.push_back((sample, HeldEffect::Hold(key)));
    }

    /// Queues a key release; the key stops being held once the sample is polled
    pub fn release_key(&mut self, key: KeyboardKey) {
        let sample = RawSample::KeyUp {
            key,
            modifiers: self.modifiers,
            repeat: false,
        };
        self.queue.push_back((sample, HeldEffect::Lift(key)));
    }

    pub fn push_text(&mut self, text: &str) {
        self.push_sample(RawSample::TextInput {
            text: text.to_owned(),
        });
    }

    /// Marks a key as physically held right away
    pub fn hold_key(&mut self, key: KeyboardKey) {
        self.held.insert(key);
    }

    /// Marks a key as physically released right away
    pub fn lift_key(&mut self, key: KeyboardKey) {
        self.held.remove(&key);
    }

    pub fn set_modifiers(&mut self, modifiers: KeyModifiers) {
        self.modifiers = modifiers;
    }

    /// Number of samples not polled yet
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn attach_joystick(&mut self) -> usize {
        self.joysticks.push(MemoryJoystick::default());
        self.joysticks.len() - 1
    }

    /// Makes every subsequent open attempt fail
    pub fn refuse_open(&mut self, refuse: bool) {
        self.refuse_open = refuse;
    }

    pub fn set_joystick_button(&mut self, joystick: usize, button: u8, down: bool) {
        if let Some(device) = self.joysticks.get_mut(joystick) {
            if down {
                device.buttons.insert(button);
            } else {
                device.buttons.remove(&button);
            }
        }
    }

    pub fn set_joystick_axis(&mut self, joystick: usize, axis: u8, value: i16) {
        if let Some(device) = self.joysticks.get_mut(joystick) {
            device.axes.insert(axis, value);
        }
    }

    pub fn set_joystick_hat(&mut self, joystick: usize, hat: u8, position: HatPosition) {
        if let Some(device) = self.joysticks.get_mut(joystick) {
            device.hats.insert(hat, position);
        }
    }

    /// Number of devices currently open
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Number of successful open calls so far
    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    /// Shared view of the open device count that outlives the platform
    pub fn open_device_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.open_devices)
    }

    fn joystick(&self, handle: JoystickHandle) -> Option<&MemoryJoystick> {
        if self.open.contains(&handle.0) {
            self.joysticks.get(handle.0)
        } else {
            None
        }
    }
}

impl EventSource for MemoryPlatform {
    fn poll_sample(&mut self) -> Option<RawSample> {
        let (sample, effect) = self.queue.pop_front()?;
        match effect {
            HeldEffect::None => {}
            HeldEffect::Hold(key) => {
                self.held.insert(key);
            }
            HeldEffect::Lift(key) => {
                self.held.remove(&key);
            }
        }
        trace!("Memory platform polled {:?}", sample);
        Some(sample)
    }
}

impl KeyboardProbe for MemoryPlatform {
    fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.held.contains(&key)
    }

    fn key_modifiers(&self) -> KeyModifiers {
        self.modifiers
    }
}

impl JoystickDriver for MemoryPlatform {
    fn joystick_count(&self) -> usize {
        self.joysticks.len()
    }

    fn open_joystick(&mut self, index: usize) -> Option<JoystickHandle> {
        if self.refuse_open || index >= self.joysticks.len() {
            return None;
        }
        if self.open.insert(index) {
            self.open_devices.set(self.open.len());
        }
        self.open_calls += 1;
        Some(JoystickHandle(index))
    }

    fn close_joystick(&mut self, handle: JoystickHandle) {
        if self.open.remove(&handle.0) {
            self.open_devices.set(self.open.len());
        }
    }

    fn joystick_button(&self, handle: JoystickHandle, button: u8) -> bool {
        self.joystick(handle)
            .is_some_and(|device| device.buttons.contains(&button))
    }

    fn joystick_axis(&self, handle: JoystickHandle, axis: u8) -> i16 {
        self.joystick(handle)
            .and_then(|device| device.axes.get(&axis).copied())
            .unwrap_or(0)
    }

    fn joystick_hat(&self, handle: JoystickHandle, hat: u8) -> HatPosition {
        self.joystick(handle)
            .and_then(|device| device.hats.get(&hat).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_state_changes_when_polled() {
        let mut platform = MemoryPlatform::new();
        platform.press_key(KeyboardKey::A);
        assert!(!platform.is_key_down(KeyboardKey::A));

        assert!(platform.poll_sample().is_some());
        assert!(platform.is_key_down(KeyboardKey::A));

        platform.release_key(KeyboardKey::A);
        platform.poll_sample();
        assert!(!platform.is_key_down(KeyboardKey::A));
        assert!(platform.poll_sample().is_none());
    }

    #[test]
    fn hold_and_lift_bypass_the_queue() {
        let mut platform = MemoryPlatform::new();
        platform.hold_key(KeyboardKey::Return);
        assert!(platform.is_key_down(KeyboardKey::Return));

        platform.lift_key(KeyboardKey::Return);
        assert!(!platform.is_key_down(KeyboardKey::Return));
        assert_eq!(platform.pending(), 0);
    }

    #[test]
    fn queue_is_fifo() {
        let mut platform = MemoryPlatform::new();
        platform.push_samples([RawSample::axis(0, 1), RawSample::WindowClose]);
        assert_eq!(platform.pending(), 2);
        assert_eq!(platform.poll_sample(), Some(RawSample::axis(0, 1)));
        assert_eq!(platform.poll_sample(), Some(RawSample::WindowClose));
    }

    #[test]
    fn closed_joysticks_read_neutral() {
        let mut platform = MemoryPlatform::with_joysticks(1);
        platform.set_joystick_button(0, 1, true);
        platform.set_joystick_axis(0, 0, 5000);
        let handle = JoystickHandle(0);
        assert!(!platform.joystick_button(handle, 1));
        assert_eq!(platform.joystick_axis(handle, 0), 0);

        assert_eq!(platform.open_joystick(0), Some(handle));
        assert!(platform.joystick_button(handle, 1));
        assert_eq!(platform.joystick_axis(handle, 0), 5000);
        assert_eq!(platform.joystick_hat(handle, 0), HatPosition::Centered);

        platform.close_joystick(handle);
        assert_eq!(platform.open_count(), 0);
    }

    #[test]
    fn refused_or_missing_devices_do_not_open() {
        let mut platform = MemoryPlatform::with_joysticks(1);
        assert_eq!(platform.open_joystick(3), None);
        platform.refuse_open(true);
        assert_eq!(platform.open_joystick(0), None);
        assert_eq!(platform.open_calls(), 0);
    }
}

//! Seams between the input engine and the platform
//!
//! A backend provides three things: a non-blocking queue of raw samples, the
//! live keyboard state, and access to joystick devices. [`Platform`] bundles
//! them so the engine can own a single backend value.

use crate::input::keys::{KeyModifiers, KeyboardKey};
use crate::input::raw::{HatPosition, RawSample};

/// Non-blocking source of raw samples
pub trait EventSource {
    /// Returns the next pending sample, or `None` if the queue is empty.
    /// Must never block.
    fn poll_sample(&mut self) -> Option<RawSample>;
}

/// Live keyboard state, independent of the event queue
pub trait KeyboardProbe {
    /// Returns whether the key is physically held right now
    fn is_key_down(&self, key: KeyboardKey) -> bool;

    /// Returns the modifiers and lock states active right now
    fn key_modifiers(&self) -> KeyModifiers;
}

/// Opaque handle to an opened joystick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JoystickHandle(pub usize);

/// Access to joystick devices
pub trait JoystickDriver {
    /// Number of devices currently attached
    fn joystick_count(&self) -> usize;

    /// Opens the device at `index`, returning `None` if it cannot be opened
    fn open_joystick(&mut self, index: usize) -> Option<JoystickHandle>;

    fn close_joystick(&mut self, handle: JoystickHandle);

    fn joystick_button(&self, handle: JoystickHandle, button: u8) -> bool;

    /// Raw signed value of an axis; positive means right or down
    fn joystick_axis(&self, handle: JoystickHandle, axis: u8) -> i16;

    fn joystick_hat(&self, handle: JoystickHandle, hat: u8) -> HatPosition;
}

/// Everything the engine needs from a backend
pub trait Platform: EventSource + KeyboardProbe + JoystickDriver {}

impl<T: EventSource + KeyboardProbe + JoystickDriver> Platform for T {}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn poll_sample(&mut self) -> Option<RawSample> {
        (**self).poll_sample()
    }
}

impl<T: KeyboardProbe + ?Sized> KeyboardProbe for Box<T> {
    fn is_key_down(&self, key: KeyboardKey) -> bool {
        (**self).is_key_down(key)
    }

    fn key_modifiers(&self) -> KeyModifiers {
        (**self).key_modifiers()
    }
}

impl<T: JoystickDriver + ?Sized> JoystickDriver for Box<T> {
    fn joystick_count(&self) -> usize {
        (**self).joystick_count()
    }

    fn open_joystick(&mut self, index: usize) -> Option<JoystickHandle> {
        (**self).open_joystick(index)
    }

    fn close_joystick(&mut self, handle: JoystickHandle) {
        (**self).close_joystick(handle)
    }

    fn joystick_button(&self, handle: JoystickHandle, button: u8) -> bool {
        (**self).joystick_button(handle, button)
    }

    fn joystick_axis(&self, handle: JoystickHandle, axis: u8) -> i16 {
        (**self).joystick_axis(handle, axis)
    }

    fn joystick_hat(&self, handle: JoystickHandle, hat: u8) -> HatPosition {
        (**self).joystick_hat(handle, hat)
    }
}

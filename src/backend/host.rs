//! Host platform: terminal keyboard plus an optional gamepad
//!
//! The keyboard is mandatory. When gilrs cannot start, the platform keeps
//! running keyboard-only and reports no joystick.

use crate::backend::gamepad::GamepadBackend;
use crate::backend::terminal::TerminalKeyboard;
use crate::error::InputError;
use crate::input::keys::{KeyModifiers, KeyboardKey};
use crate::input::platform::{EventSource, JoystickDriver, JoystickHandle, KeyboardProbe};
use crate::input::raw::{HatPosition, RawSample};
use tracing::{info, warn};

pub struct HostPlatform {
    keyboard: TerminalKeyboard,
    gamepad: Option<GamepadBackend>,
}

impl HostPlatform {
    pub fn create() -> Result<Self, InputError> {
        let keyboard = TerminalKeyboard::create()?;
        let gamepad = match GamepadBackend::create() {
            Ok(gamepad) => Some(gamepad),
            Err(e) => {
                warn!("Gamepad backend unavailable ({}), keyboard only", e);
                None
            }
        };
        info!(
            "Host platform ready (gamepad backend: {})",
            if gamepad.is_some() { "yes" } else { "no" }
        );
        Ok(Self { keyboard, gamepad })
    }
}

impl EventSource for HostPlatform {
    fn poll_sample(&mut self) -> Option<RawSample> {
        self.keyboard
            .poll_sample()
            .or_else(|| self.gamepad.as_mut().and_then(GamepadBackend::poll_sample))
    }
}

impl KeyboardProbe for HostPlatform {
    fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.keyboard.is_key_down(key)
    }

    fn key_modifiers(&self) -> KeyModifiers {
        self.keyboard.key_modifiers()
    }
}

impl JoystickDriver for HostPlatform {
    fn joystick_count(&self) -> usize {
        self.gamepad.as_ref().map_or(0, GamepadBackend::joystick_count)
    }

    fn open_joystick(&mut self, index: usize) -> Option<JoystickHandle> {
        self.gamepad.as_mut()?.open_joystick(index)
    }

    fn close_joystick(&mut self, handle: JoystickHandle) {
        if let Some(gamepad) = self.gamepad.as_mut() {
            gamepad.close_joystick(handle);
        }
    }

    fn joystick_button(&self, handle: JoystickHandle, button: u8) -> bool {
        self.gamepad
            .as_ref()
            .is_some_and(|gamepad| gamepad.joystick_button(handle, button))
    }

    fn joystick_axis(&self, handle: JoystickHandle, axis: u8) -> i16 {
        self.gamepad
            .as_ref()
            .map_or(0, |gamepad| gamepad.joystick_axis(handle, axis))
    }

    fn joystick_hat(&self, handle: JoystickHandle, hat: u8) -> HatPosition {
        self.gamepad
            .as_ref()
            .map_or(HatPosition::Centered, |gamepad| gamepad.joystick_hat(handle, hat))
    }
}

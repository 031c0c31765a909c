//! Gamepad backend over gilrs
//!
//! Exposes the gilrs gamepads as numbered joysticks. Only the opened gamepad
//! produces samples; events from every other device are skipped. Stick values
//! are scaled to `i16` with the vertical axes flipped so that positive means
//! down, and the d-pad buttons are reported as hat 0.

use crate::error::InputError;
use crate::input::platform::{EventSource, JoystickDriver, JoystickHandle};
use crate::input::raw::{HatPosition, RawSample};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

/// Axes in index order
const AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

/// Buttons in index order; the d-pad is not a button here
const BUTTONS: [Button; 13] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::LeftTrigger2,
    Button::RightTrigger2,
];

pub struct GamepadBackend {
    gilrs: Gilrs,
    opened: Option<(JoystickHandle, GamepadId)>,
}

impl GamepadBackend {
    pub fn create() -> Result<Self, InputError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(InputError::InitializationError(e.to_string()));
            }
        };

        let backend = Self {
            gilrs,
            opened: None,
        };
        for (idx, (id, gamepad)) in backend.gilrs.gamepads().enumerate() {
            info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
        }
        Ok(backend)
    }

    fn active_gamepad(&self, handle: JoystickHandle) -> Option<Gamepad<'_>> {
        match self.opened {
            Some((opened, id)) if opened == handle => self.gilrs.connected_gamepad(id),
            _ => None,
        }
    }

    fn hat_sample(&self, id: GamepadId) -> Option<RawSample> {
        let gamepad = self.gilrs.connected_gamepad(id)?;
        Some(RawSample::hat(0, dpad_position(&gamepad)))
    }

    fn convert_event(&mut self, id: GamepadId, event: EventType) -> Option<RawSample> {
        match event {
            EventType::AxisChanged(axis, value, _) => {
                let index = axis_index(axis)?;
                let value = scale_axis(axis, value);
                debug!("Axis changed: {:?} (#{}) = {}", axis, index, value);
                Some(RawSample::axis(index, value))
            }
            EventType::ButtonPressed(button, _) if is_dpad(button) => self.hat_sample(id),
            EventType::ButtonReleased(button, _) if is_dpad(button) => self.hat_sample(id),
            EventType::ButtonPressed(button, _) => {
                button_index(button).map(|button| RawSample::JoyButtonDown { button })
            }
            EventType::ButtonReleased(button, _) => {
                button_index(button).map(|button| RawSample::JoyButtonUp { button })
            }
            EventType::Connected => {
                info!("Gamepad {} connected", id);
                None
            }
            EventType::Disconnected => {
                warn!("Active gamepad {} disconnected", id);
                None
            }
            _ => {
                debug!("Unhandled gamepad event type: {:?}", event);
                None
            }
        }
    }
}

impl EventSource for GamepadBackend {
    fn poll_sample(&mut self) -> Option<RawSample> {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            let Some((_, active_id)) = self.opened else {
                debug!("No gamepad open, dropping {:?}", event);
                continue;
            };
            if id != active_id {
                debug!("Skipping event from non-active gamepad: {:?}", id);
                continue;
            }
            if let Some(sample) = self.convert_event(id, event) {
                return Some(sample);
            }
        }
        None
    }
}

impl JoystickDriver for GamepadBackend {
    fn joystick_count(&self) -> usize {
        self.gilrs.gamepads().count()
    }

    fn open_joystick(&mut self, index: usize) -> Option<JoystickHandle> {
        let (id, gamepad) = self.gilrs.gamepads().nth(index)?;
        info!("Selected gamepad: {} ({})", gamepad.name(), id);
        let handle = JoystickHandle(index);
        self.opened = Some((handle, id));
        Some(handle)
    }

    fn close_joystick(&mut self, handle: JoystickHandle) {
        if matches!(self.opened, Some((opened, _)) if opened == handle) {
            debug!("Releasing gamepad {:?}", handle);
            self.opened = None;
        }
    }

    fn joystick_button(&self, handle: JoystickHandle, button: u8) -> bool {
        match (self.active_gamepad(handle), button_from_index(button)) {
            (Some(gamepad), Some(button)) => gamepad.is_pressed(button),
            _ => false,
        }
    }

    fn joystick_axis(&self, handle: JoystickHandle, axis: u8) -> i16 {
        match (self.active_gamepad(handle), axis_from_index(axis)) {
            (Some(gamepad), Some(axis)) => scale_axis(axis, gamepad.value(axis)),
            _ => 0,
        }
    }

    fn joystick_hat(&self, handle: JoystickHandle, hat: u8) -> HatPosition {
        match self.active_gamepad(handle) {
            Some(gamepad) if hat == 0 => dpad_position(&gamepad),
            _ => HatPosition::Centered,
        }
    }
}

fn dpad_position(gamepad: &Gamepad<'_>) -> HatPosition {
    HatPosition::from_switches(
        gamepad.is_pressed(Button::DPadUp),
        gamepad.is_pressed(Button::DPadRight),
        gamepad.is_pressed(Button::DPadDown),
        gamepad.is_pressed(Button::DPadLeft),
    )
}

fn is_dpad(button: Button) -> bool {
    matches!(
        button,
        Button::DPadUp | Button::DPadDown | Button::DPadLeft | Button::DPadRight
    )
}

fn axis_index(axis: Axis) -> Option<u8> {
    AXES.iter().position(|a| *a == axis).map(|i| i as u8)
}

fn axis_from_index(index: u8) -> Option<Axis> {
    AXES.get(usize::from(index)).copied()
}

fn button_index(button: Button) -> Option<u8> {
    BUTTONS.iter().position(|b| *b == button).map(|i| i as u8)
}

fn button_from_index(index: u8) -> Option<Button> {
    BUTTONS.get(usize::from(index)).copied()
}

/// Scales a gilrs value in -1.0..=1.0 to `i16`, flipping stick Y so that
/// positive means down
fn scale_axis(axis: Axis, value: f32) -> i16 {
    let value = match axis {
        Axis::LeftStickY | Axis::RightStickY => -value,
        _ => value,
    };
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_indices_put_vertical_on_odd_slots() {
        assert_eq!(axis_index(Axis::LeftStickX), Some(0));
        assert_eq!(axis_index(Axis::LeftStickY), Some(1));
        assert_eq!(axis_index(Axis::RightStickY), Some(3));
        assert_eq!(axis_index(Axis::DPadX), None);
        for index in 0..AXES.len() as u8 {
            assert_eq!(axis_from_index(index).and_then(axis_index), Some(index));
        }
    }

    #[test]
    fn stick_y_is_flipped() {
        assert_eq!(scale_axis(Axis::LeftStickX, 1.0), i16::MAX);
        assert_eq!(scale_axis(Axis::LeftStickX, -1.0), -i16::MAX);
        assert_eq!(scale_axis(Axis::LeftStickY, 1.0), -i16::MAX);
        assert_eq!(scale_axis(Axis::RightStickY, -0.5), 16384);
        assert_eq!(scale_axis(Axis::LeftZ, 2.0), i16::MAX);
        assert_eq!(scale_axis(Axis::RightStickX, 0.0), 0);
    }

    #[test]
    fn dpad_is_not_a_button() {
        assert!(is_dpad(Button::DPadLeft));
        assert_eq!(button_index(Button::DPadLeft), None);
        assert_eq!(button_index(Button::South), Some(0));
        assert_eq!(button_from_index(7), Some(Button::Start));
        assert_eq!(button_from_index(13), None);
    }
}

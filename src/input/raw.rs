//! Raw device samples as delivered by a platform backend

use crate::input::direction::Direction8;
use crate::input::keys::{KeyModifiers, KeyboardKey};

/// Number of axis slots whose state is tracked (horizontal and vertical)
///
/// Axis indices are folded onto these slots modulo `AXIS_SLOTS`.
pub const AXIS_SLOTS: usize = 2;

/// One raw input sample, before any filtering
#[derive(Clone, Debug, PartialEq)]
pub enum RawSample {
    KeyDown {
        key: KeyboardKey,
        modifiers: KeyModifiers,
        repeat: bool,
    },
    KeyUp {
        key: KeyboardKey,
        modifiers: KeyModifiers,
        repeat: bool,
    },
    /// UTF-8 text entered by the user (may be more than one character)
    TextInput {
        text: String,
    },
    JoyButtonDown {
        button: u8,
    },
    JoyButtonUp {
        button: u8,
    },
    /// Signed axis value; positive means right or down
    JoyAxisMotion {
        axis: u8,
        value: i16,
    },
    JoyHatMotion {
        hat: u8,
        position: HatPosition,
    },
    WindowClose,
}

impl RawSample {
    /// Key press without modifiers, as delivered on first press
    pub fn key_down(key: KeyboardKey) -> Self {
        RawSample::KeyDown {
            key,
            modifiers: KeyModifiers::empty(),
            repeat: false,
        }
    }

    /// Key release without modifiers
    pub fn key_up(key: KeyboardKey) -> Self {
        RawSample::KeyUp {
            key,
            modifiers: KeyModifiers::empty(),
            repeat: false,
        }
    }

    pub fn axis(axis: u8, value: i16) -> Self {
        RawSample::JoyAxisMotion { axis, value }
    }

    pub fn hat(hat: u8, position: HatPosition) -> Self {
        RawSample::JoyHatMotion { hat, position }
    }

    /// Returns whether this sample comes from a joystick
    pub fn is_joypad(&self) -> bool {
        matches!(
            self,
            RawSample::JoyButtonDown { .. }
                | RawSample::JoyButtonUp { .. }
                | RawSample::JoyAxisMotion { .. }
                | RawSample::JoyHatMotion { .. }
        )
    }
}

/// Classified state of one joystick axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AxisState {
    #[default]
    Centered,
    /// Left or up
    Negative,
    /// Right or down
    Positive,
}

impl AxisState {
    /// Classifies a raw axis value: anything below `press_threshold` in
    /// magnitude counts as centered
    pub fn classify(value: i16, press_threshold: u16) -> Self {
        if value.unsigned_abs() < press_threshold {
            AxisState::Centered
        } else if value > 0 {
            AxisState::Positive
        } else {
            AxisState::Negative
        }
    }

    /// -1, 0 or 1
    pub fn as_i8(self) -> i8 {
        match self {
            AxisState::Centered => 0,
            AxisState::Negative => -1,
            AxisState::Positive => 1,
        }
    }

    pub fn is_centered(self) -> bool {
        self == AxisState::Centered
    }
}

/// Position of a digital hat (d-pad)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HatPosition {
    #[default]
    Centered,
    Up,
    RightUp,
    Right,
    RightDown,
    Down,
    LeftDown,
    Left,
    LeftUp,
}

impl HatPosition {
    /// Builds a hat position from the four d-pad switches
    ///
    /// Opposite switches cancel each other out.
    pub fn from_switches(up: bool, right: bool, down: bool, left: bool) -> Self {
        let vertical = i8::from(down) - i8::from(up);
        let horizontal = i8::from(right) - i8::from(left);
        match (horizontal, vertical) {
            (0, -1) => HatPosition::Up,
            (1, -1) => HatPosition::RightUp,
            (1, 0) => HatPosition::Right,
            (1, 1) => HatPosition::RightDown,
            (0, 1) => HatPosition::Down,
            (-1, 1) => HatPosition::LeftDown,
            (-1, 0) => HatPosition::Left,
            (-1, -1) => HatPosition::LeftUp,
            _ => HatPosition::Centered,
        }
    }

    /// Compass direction of this position, `None` when centered
    pub fn direction(self) -> Option<Direction8> {
        match self {
            HatPosition::Centered => None,
            HatPosition::Right => Some(Direction8::Right),
            HatPosition::RightUp => Some(Direction8::UpRight),
            HatPosition::Up => Some(Direction8::Up),
            HatPosition::LeftUp => Some(Direction8::UpLeft),
            HatPosition::Left => Some(Direction8::Left),
            HatPosition::LeftDown => Some(Direction8::DownLeft),
            HatPosition::Down => Some(Direction8::Down),
            HatPosition::RightDown => Some(Direction8::DownRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_classification_boundaries() {
        assert_eq!(AxisState::classify(0, 10000), AxisState::Centered);
        assert_eq!(AxisState::classify(9999, 10000), AxisState::Centered);
        assert_eq!(AxisState::classify(10000, 10000), AxisState::Positive);
        assert_eq!(AxisState::classify(-10000, 10000), AxisState::Negative);
        assert_eq!(AxisState::classify(i16::MIN, 10000), AxisState::Negative);
        assert_eq!(AxisState::classify(i16::MAX, 10000), AxisState::Positive);
    }

    #[test]
    fn hat_switches() {
        assert_eq!(
            HatPosition::from_switches(true, false, false, true),
            HatPosition::LeftUp
        );
        assert_eq!(
            HatPosition::from_switches(false, true, true, false),
            HatPosition::RightDown
        );
        assert_eq!(
            HatPosition::from_switches(true, false, true, false),
            HatPosition::Centered
        );
        assert_eq!(
            HatPosition::from_switches(false, false, false, false),
            HatPosition::Centered
        );
    }

    #[test]
    fn hat_directions_follow_compass_indices() {
        assert_eq!(HatPosition::Right.direction().map(Direction8::index), Some(0));
        assert_eq!(HatPosition::LeftUp.direction().map(Direction8::index), Some(3));
        assert_eq!(HatPosition::RightDown.direction().map(Direction8::index), Some(7));
        assert_eq!(HatPosition::Centered.direction(), None);
    }

    #[test]
    fn joypad_category() {
        assert!(RawSample::axis(0, 1).is_joypad());
        assert!(RawSample::JoyButtonUp { button: 2 }.is_joypad());
        assert!(!RawSample::key_down(KeyboardKey::A).is_joypad());
        assert!(!RawSample::WindowClose.is_joypad());
    }
}

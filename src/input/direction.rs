//! Directional Projector
//!
//! Two views of direction. Per event, [`InputEvent::get_direction`] tells which
//! compass direction a single press designates. Over time, [`DirectionIntent`]
//! folds accepted events into the set of held directions and reports the
//! 8-way direction the player wants to move in.

use crate::config::DirectionKeys;
use crate::input::context::InputContext;
use crate::input::event::InputEvent;
use crate::input::keys::KeyboardKey;
use crate::input::platform::Platform;
use crate::input::raw::{AxisState, AXIS_SLOTS};
use std::f32::consts::FRAC_PI_4;
use tracing::debug;

/// One of the eight compass directions, counter-clockwise from right
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction8 {
    Right = 0,
    UpRight = 1,
    Up = 2,
    UpLeft = 3,
    Left = 4,
    DownLeft = 5,
    Down = 6,
    DownRight = 7,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::Right,
        Direction8::UpRight,
        Direction8::Up,
        Direction8::UpLeft,
        Direction8::Left,
        Direction8::DownLeft,
        Direction8::Down,
        Direction8::DownRight,
    ];

    /// 0 to 7
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Direction8> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Angle in radians, counter-clockwise from the positive x axis
    pub fn to_radians(self) -> f32 {
        f32::from(self.index()) * FRAC_PI_4
    }

    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    pub fn opposite(self) -> Direction8 {
        Self::ALL[usize::from((self.index() + 4) % 8)]
    }
}

impl InputEvent {
    /// Direction designated by this event, if any
    ///
    /// First match wins: an arrow key press, then a non-centered axis (even
    /// axes are horizontal, odd axes vertical), then a hat. Only one source is
    /// consulted per event.
    pub fn get_direction(&self) -> Option<Direction8> {
        if self.is_keyboard_direction_key_pressed() {
            match self.get_keyboard_key() {
                Some(KeyboardKey::Right) => Some(Direction8::Right),
                Some(KeyboardKey::Up) => Some(Direction8::Up),
                Some(KeyboardKey::Left) => Some(Direction8::Left),
                Some(KeyboardKey::Down) => Some(Direction8::Down),
                _ => None,
            }
        } else if self.is_joypad_axis_moved() && !self.is_joypad_axis_centered() {
            let positive = self.get_joypad_axis_state() == AxisState::Positive;
            let horizontal = self.get_joypad_axis().is_some_and(|axis| axis % 2 == 0);
            match (horizontal, positive) {
                (true, true) => Some(Direction8::Right),
                (true, false) => Some(Direction8::Left),
                (false, true) => Some(Direction8::Down),
                (false, false) => Some(Direction8::Up),
            }
        } else if self.is_joypad_hat_moved() {
            self.get_joypad_hat_direction()
        } else {
            None
        }
    }

    /// Something was pressed: a key, a direction or a joypad button
    pub fn is_pressed(&self) -> bool {
        self.is_keyboard_key_pressed()
            || self.is_direction_pressed()
            || self.is_joypad_button_pressed()
    }

    /// An arrow key, an axis leaving the center, or a hat leaving the center
    pub fn is_direction_pressed(&self) -> bool {
        self.is_keyboard_direction_key_pressed()
            || (self.is_joypad_axis_moved() && !self.is_joypad_axis_centered())
            || (self.is_joypad_hat_moved() && !self.is_joypad_hat_centered())
    }

    pub fn is_non_direction_pressed(&self) -> bool {
        self.is_pressed() && !self.is_direction_pressed()
    }

    /// Something was released: a key, a joypad button, or an axis or hat
    /// returning to the center
    pub fn is_released(&self) -> bool {
        self.is_keyboard_key_released()
            || self.is_joypad_button_released()
            || self.is_joypad_axis_centered()
            || self.is_joypad_hat_centered()
    }
}

const RIGHT: u8 = 1;
const UP: u8 = 1 << 1;
const LEFT: u8 = 1 << 2;
const DOWN: u8 = 1 << 3;

/// Held-direction mask of each [`Direction8`], by index
const DIRECTION_MASKS: [u8; 8] = [
    RIGHT,
    RIGHT | UP,
    UP,
    UP | LEFT,
    LEFT,
    LEFT | DOWN,
    DOWN,
    DOWN | RIGHT,
];

/// Tracks held directions across events and derives the wanted direction
///
/// Keyboard, axis and hat contributions are kept apart so that releasing one
/// source does not cancel another one still held.
#[derive(Clone, Debug, Default)]
pub struct DirectionIntent {
    keys: DirectionKeys,
    keyboard: u8,
    axes: [u8; AXIS_SLOTS],
    hat: u8,
}

impl DirectionIntent {
    pub fn new(keys: DirectionKeys) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    /// Updates the held set from one event; returns `true` if it changed
    ///
    /// Invalid events and filtered repeats leave the set untouched.
    pub fn notify(&mut self, event: &InputEvent) -> bool {
        let before = self.held_mask();

        if let Some(bit) = event.get_keyboard_key().and_then(|key| self.key_bit(key)) {
            if event.is_keyboard_key_pressed() {
                self.keyboard |= bit;
            } else if event.is_keyboard_key_released() {
                self.keyboard &= !bit;
            }
        } else if let Some(axis) = event.get_joypad_axis() {
            self.axes[usize::from(axis) % AXIS_SLOTS] =
                axis_bit(event.get_joypad_axis_state(), axis % 2 == 0);
        } else if event.is_joypad_hat_moved() {
            self.hat = event
                .get_joypad_hat_direction()
                .map_or(0, |direction| DIRECTION_MASKS[usize::from(direction.index())]);
        }

        let after = self.held_mask();
        if after != before {
            debug!(
                "Held directions {:04b} -> {:04b}, wanted {:?}",
                before,
                after,
                self.wanted_direction8()
            );
        }
        after != before
    }

    /// Folds a whole frame of events; returns `true` if anything changed
    pub fn notify_all<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) -> bool {
        events
            .into_iter()
            .fold(false, |changed, event| self.notify(event) || changed)
    }

    /// Union of the held directions of all sources
    pub fn held_mask(&self) -> u8 {
        self.axes.iter().fold(self.keyboard | self.hat, |mask, axis| mask | axis)
    }

    /// Direction the player wants to go, `None` when nothing or a
    /// contradictory combination (such as left and right) is held
    pub fn wanted_direction8(&self) -> Option<Direction8> {
        let mask = self.held_mask();
        DIRECTION_MASKS
            .iter()
            .position(|candidate| *candidate == mask)
            .and_then(|index| Direction8::from_index(index as u8))
    }

    /// Rebuilds the held set from the context instead of from events: the
    /// keys known as pressed and the live state of axes 0, 1 and hat 0 (all
    /// neutral while joystick support is off). Used when events may have been missed, for instance right after
    /// joystick support is toggled.
    pub fn resync<P: Platform>(&mut self, context: &InputContext<P>) {
        self.keyboard = [
            (self.keys.right, RIGHT),
            (self.keys.up, UP),
            (self.keys.left, LEFT),
            (self.keys.down, DOWN),
        ]
        .into_iter()
        .filter(|(key, _)| context.is_known_pressed(*key))
        .fold(0, |mask, (_, bit)| mask | bit);

        let devices = context.devices();
        for slot in 0..AXIS_SLOTS {
            let state = devices.get_joypad_axis_state(slot as u8);
            self.axes[slot] = axis_bit(state, slot % 2 == 0);
        }
        self.hat = devices
            .get_joypad_hat_direction(0)
            .map_or(0, |direction| DIRECTION_MASKS[usize::from(direction.index())]);
    }

    /// Forgets everything held, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.keyboard = 0;
        self.axes = [0; AXIS_SLOTS];
        self.hat = 0;
    }

    fn key_bit(&self, key: KeyboardKey) -> Option<u8> {
        if key == self.keys.right {
            Some(RIGHT)
        } else if key == self.keys.up {
            Some(UP)
        } else if key == self.keys.left {
            Some(LEFT)
        } else if key == self.keys.down {
            Some(DOWN)
        } else {
            None
        }
    }
}

fn axis_bit(state: AxisState, horizontal: bool) -> u8 {
    match (state, horizontal) {
        (AxisState::Centered, _) => 0,
        (AxisState::Positive, true) => RIGHT,
        (AxisState::Negative, true) => LEFT,
        (AxisState::Positive, false) => DOWN,
        (AxisState::Negative, false) => UP,
    }
}

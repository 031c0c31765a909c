//! Keyboard key symbols, their stable names and modifier flags
//!
//! [`KeyboardKey`] is an opaque symbol set. Its discriminants carry no meaning
//! and may change between versions; anything persisted uses [`KeyboardKey::name`]
//! instead. Translating a physical key code into a symbol is the job of the
//! platform backends.

use crate::error::InputError;
use bitflags::bitflags;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! keyboard_keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A keyboard key, independent of any device layout
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KeyboardKey {
            $($variant),+
        }

        impl KeyboardKey {
            /// Every known key, in name-table order
            pub const ALL: &'static [KeyboardKey] = &[$(KeyboardKey::$variant),+];

            /// Returns the save-stable name of this key
            pub fn name(self) -> &'static str {
                match self {
                    $(KeyboardKey::$variant => $name),+
                }
            }
        }
    };
}

keyboard_keys! {
    Backspace => "backspace",
    Tab => "tab",
    Clear => "clear",
    Return => "return",
    Pause => "pause",
    Escape => "escape",
    Space => "space",
    Exclamation => "!",
    DoubleQuote => "\"",
    Hash => "#",
    Dollar => "$",
    Ampersand => "&",
    Quote => "'",
    LeftParenthesis => "(",
    RightParenthesis => ")",
    Asterisk => "*",
    Plus => "+",
    Comma => ",",
    Minus => "-",
    Period => ".",
    Slash => "/",
    Num0 => "0",
    Num1 => "1",
    Num2 => "2",
    Num3 => "3",
    Num4 => "4",
    Num5 => "5",
    Num6 => "6",
    Num7 => "7",
    Num8 => "8",
    Num9 => "9",
    Colon => ":",
    Semicolon => ";",
    Less => "<",
    Equals => "=",
    Greater => ">",
    QuestionMark => "?",
    At => "@",
    LeftBracket => "[",
    Backslash => "\\",
    RightBracket => "]",
    Caret => "^",
    Underscore => "_",
    Backquote => "`",
    A => "a",
    B => "b",
    C => "c",
    D => "d",
    E => "e",
    F => "f",
    G => "g",
    H => "h",
    I => "i",
    J => "j",
    K => "k",
    L => "l",
    M => "m",
    N => "n",
    O => "o",
    P => "p",
    Q => "q",
    R => "r",
    S => "s",
    T => "t",
    U => "u",
    V => "v",
    W => "w",
    X => "x",
    Y => "y",
    Z => "z",
    Delete => "delete",
    Kp0 => "kp 0",
    Kp1 => "kp 1",
    Kp2 => "kp 2",
    Kp3 => "kp 3",
    Kp4 => "kp 4",
    Kp5 => "kp 5",
    Kp6 => "kp 6",
    Kp7 => "kp 7",
    Kp8 => "kp 8",
    Kp9 => "kp 9",
    KpPeriod => "kp .",
    KpDivide => "kp /",
    KpMultiply => "kp *",
    KpMinus => "kp -",
    KpPlus => "kp +",
    KpEnter => "kp return",
    KpEquals => "kp =",
    Up => "up",
    Down => "down",
    Right => "right",
    Left => "left",
    Insert => "insert",
    Home => "home",
    End => "end",
    PageUp => "page up",
    PageDown => "page down",
    F1 => "f1",
    F2 => "f2",
    F3 => "f3",
    F4 => "f4",
    F5 => "f5",
    F6 => "f6",
    F7 => "f7",
    F8 => "f8",
    F9 => "f9",
    F10 => "f10",
    F11 => "f11",
    F12 => "f12",
    NumLock => "num lock",
    CapsLock => "caps lock",
    ScrollLock => "scroll lock",
    RightShift => "right shift",
    LeftShift => "left shift",
    RightControl => "right control",
    LeftControl => "left control",
    RightAlt => "right alt",
    LeftAlt => "left alt",
    RightMeta => "right meta",
    LeftMeta => "left meta",
}

/// The four keys that move in a cardinal direction, in direction order
/// (right, up, left, down)
pub const DIRECTIONAL_KEYS: [KeyboardKey; 4] = [
    KeyboardKey::Right,
    KeyboardKey::Up,
    KeyboardKey::Left,
    KeyboardKey::Down,
];

impl KeyboardKey {
    /// Looks a key up by its stable name
    ///
    /// Linear scan of the name table; the table is small and static.
    pub fn from_name(name: &str) -> Option<KeyboardKey> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }

    /// Returns whether this is one of the four arrow keys
    pub fn is_directional(self) -> bool {
        DIRECTIONAL_KEYS.contains(&self)
    }
}

impl fmt::Display for KeyboardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyboardKey {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyboardKey::from_name(s).ok_or_else(|| InputError::UnknownKeyName(s.to_string()))
    }
}

impl Serialize for KeyboardKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for KeyboardKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        KeyboardKey::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown keyboard key name: '{name}'")))
    }
}

bitflags! {
    /// Modifier keys and lock states
    ///
    /// Left and right variants of a modifier are not distinguished.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const CAPS_LOCK = 1 << 3;
        const NUM_LOCK = 1 << 4;
    }
}

//! Terminal keyboard over crossterm
//!
//! Puts the terminal in raw mode and turns crossterm key events into raw
//! samples. Terminals that report key releases get the kitty enhancement
//! flags pushed. On the others a key counts as held from its press until the
//! terminal stops auto-repeating it: the release is synthesized once no press
//! arrived for [`FIRST_PRESS_HOLD`] (or [`REPEAT_HOLD`] once repeats started),
//! never within the frame of the press. Ctrl+C is reported as a window close.
//!
//! A terminal cannot be asked which keys are down. The [`KeyboardProbe`] view
//! is rebuilt from the samples already handed out, so the normalizer's
//! stale press/release checks always pass for this backend.

use crate::error::InputError;
use crate::input::keys::{KeyModifiers, KeyboardKey};
use crate::input::platform::{EventSource, KeyboardProbe};
use crate::input::raw::RawSample;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers as TermModifiers,
    KeyboardEnhancementFlags, ModifierKeyCode, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Hold after a first press, longer than common autorepeat delays
pub const FIRST_PRESS_HOLD: Duration = Duration::from_millis(600);
/// Hold after an auto-repeated press
pub const REPEAT_HOLD: Duration = Duration::from_millis(120);

/// Pending synthesized releases for terminals without release reporting
#[derive(Debug, Default)]
pub struct SyntheticReleases {
    deadlines: BTreeMap<KeyboardKey, (Instant, KeyModifiers)>,
}

impl SyntheticReleases {
    /// Records a press of `key` at `now`, pushing its release back
    pub fn pressed(&mut self, key: KeyboardKey, modifiers: KeyModifiers, now: Instant) {
        let hold = if self.deadlines.contains_key(&key) {
            REPEAT_HOLD
        } else {
            FIRST_PRESS_HOLD
        };
        self.deadlines.insert(key, (now + hold, modifiers));
    }

    /// Releases for every key whose hold ran out by `now`
    pub fn expired(&mut self, now: Instant) -> Vec<RawSample> {
        let mut released = Vec::new();
        self.deadlines.retain(|key, (deadline, modifiers)| {
            if *deadline > now {
                return true;
            }
            released.push(RawSample::KeyUp {
                key: *key,
                modifiers: *modifiers,
                repeat: false,
            });
            false
        });
        released
    }

    pub fn is_waiting(&self, key: KeyboardKey) -> bool {
        self.deadlines.contains_key(&key)
    }
}

pub struct TerminalKeyboard {
    pending: VecDeque<RawSample>,
    held: HashSet<KeyboardKey>,
    modifiers: KeyModifiers,
    release_events: bool,
    synthetic: SyntheticReleases,
}

impl TerminalKeyboard {
    pub fn create() -> Result<Self, InputError> {
        enable_raw_mode().map_err(|e| InputError::InitializationError(e.to_string()))?;

        let release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if release_events {
            let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
            if let Err(e) = crossterm::execute!(stdout(), PushKeyboardEnhancementFlags(flags)) {
                // Raw mode is already on; undo it before bailing out.
                let _ = disable_raw_mode();
                return Err(InputError::InitializationError(e.to_string()));
            }
            info!("Terminal keyboard ready, key releases reported");
        } else {
            warn!("Terminal does not report key releases, synthesizing them");
        }

        Ok(Self {
            pending: VecDeque::new(),
            held: HashSet::new(),
            modifiers: KeyModifiers::empty(),
            release_events,
            synthetic: SyntheticReleases::default(),
        })
    }

    fn read_pending_events(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    return;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) => {
                    debug!("Terminal key event: {:?}", key);
                    let samples = translate_key_event(key);
                    if !self.release_events {
                        let now = Instant::now();
                        for sample in &samples {
                            if let RawSample::KeyDown { key, modifiers, .. } = sample {
                                self.synthetic.pressed(*key, *modifiers, now);
                            }
                        }
                    }
                    self.pending.extend(samples);
                }
                Ok(other) => debug!("Ignoring terminal event: {:?}", other),
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    return;
                }
            }
        }
    }

    fn apply_live_state(&mut self, sample: &RawSample) {
        match sample {
            RawSample::KeyDown { key, modifiers, .. } => {
                self.held.insert(*key);
                self.modifiers = *modifiers;
            }
            RawSample::KeyUp { key, modifiers, .. } => {
                self.held.remove(key);
                self.modifiers = *modifiers;
            }
            _ => {}
        }
    }
}

impl EventSource for TerminalKeyboard {
    fn poll_sample(&mut self) -> Option<RawSample> {
        if self.pending.is_empty() {
            self.read_pending_events();
            if !self.release_events {
                self.pending.extend(self.synthetic.expired(Instant::now()));
            }
        }
        let sample = self.pending.pop_front()?;
        self.apply_live_state(&sample);
        Some(sample)
    }
}

// Held keys follow the samples already popped, not the hardware.
impl KeyboardProbe for TerminalKeyboard {
    fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.held.contains(&key)
    }

    fn key_modifiers(&self) -> KeyModifiers {
        self.modifiers
    }
}

impl Drop for TerminalKeyboard {
    fn drop(&mut self) {
        if self.release_events {
            if let Err(e) = crossterm::execute!(stdout(), PopKeyboardEnhancementFlags) {
                warn!("Failed to restore keyboard flags: {}", e);
            }
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
        debug!("Terminal restored");
    }
}

/// Raw samples for one crossterm key event, in delivery order
pub fn translate_key_event(event: KeyEvent) -> Vec<RawSample> {
    let modifiers = translate_modifiers(&event);

    if event.kind != KeyEventKind::Release
        && event.code == KeyCode::Char('c')
        && event.modifiers.contains(TermModifiers::CONTROL)
    {
        return vec![RawSample::WindowClose];
    }

    let key = translate_key_code(event.code);
    let mut samples = Vec::with_capacity(2);
    match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            if let Some(key) = key {
                samples.push(RawSample::KeyDown {
                    key,
                    modifiers,
                    repeat: event.kind == KeyEventKind::Repeat,
                });
            }
            if let KeyCode::Char(c) = event.code {
                if !modifiers.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
                    samples.push(RawSample::TextInput {
                        text: c.to_string(),
                    });
                }
            }
        }
        KeyEventKind::Release => {
            if let Some(key) = key {
                samples.push(RawSample::KeyUp {
                    key,
                    modifiers,
                    repeat: false,
                });
            }
        }
    }
    samples
}

fn translate_modifiers(event: &KeyEvent) -> KeyModifiers {
    let mut modifiers = KeyModifiers::empty();
    modifiers.set(
        KeyModifiers::SHIFT,
        event.modifiers.contains(TermModifiers::SHIFT),
    );
    modifiers.set(
        KeyModifiers::CTRL,
        event.modifiers.contains(TermModifiers::CONTROL),
    );
    modifiers.set(
        KeyModifiers::ALT,
        event.modifiers.contains(TermModifiers::ALT),
    );
    modifiers.set(
        KeyModifiers::CAPS_LOCK,
        event.state.contains(KeyEventState::CAPS_LOCK),
    );
    modifiers.set(
        KeyModifiers::NUM_LOCK,
        event.state.contains(KeyEventState::NUM_LOCK),
    );
    modifiers
}

fn translate_key_code(code: KeyCode) -> Option<KeyboardKey> {
    let key = match code {
        KeyCode::Char(' ') => KeyboardKey::Space,
        KeyCode::Char(c) => return KeyboardKey::from_name(&c.to_lowercase().to_string()),
        KeyCode::F(n) => return KeyboardKey::from_name(&format!("f{}", n)),
        KeyCode::Backspace => KeyboardKey::Backspace,
        KeyCode::Tab | KeyCode::BackTab => KeyboardKey::Tab,
        KeyCode::Enter => KeyboardKey::Return,
        KeyCode::Esc => KeyboardKey::Escape,
        KeyCode::Left => KeyboardKey::Left,
        KeyCode::Right => KeyboardKey::Right,
        KeyCode::Up => KeyboardKey::Up,
        KeyCode::Down => KeyboardKey::Down,
        KeyCode::Home => KeyboardKey::Home,
        KeyCode::End => KeyboardKey::End,
        KeyCode::PageUp => KeyboardKey::PageUp,
        KeyCode::PageDown => KeyboardKey::PageDown,
        KeyCode::Delete => KeyboardKey::Delete,
        KeyCode::Insert => KeyboardKey::Insert,
        KeyCode::CapsLock => KeyboardKey::CapsLock,
        KeyCode::ScrollLock => KeyboardKey::ScrollLock,
        KeyCode::NumLock => KeyboardKey::NumLock,
        KeyCode::Pause => KeyboardKey::Pause,
        KeyCode::Modifier(modifier) => match modifier {
            ModifierKeyCode::LeftShift => KeyboardKey::LeftShift,
            ModifierKeyCode::RightShift => KeyboardKey::RightShift,
            ModifierKeyCode::LeftControl => KeyboardKey::LeftControl,
            ModifierKeyCode::RightControl => KeyboardKey::RightControl,
            ModifierKeyCode::LeftAlt => KeyboardKey::LeftAlt,
            ModifierKeyCode::RightAlt => KeyboardKey::RightAlt,
            ModifierKeyCode::LeftSuper | ModifierKeyCode::LeftMeta => KeyboardKey::LeftMeta,
            ModifierKeyCode::RightSuper | ModifierKeyCode::RightMeta => KeyboardKey::RightMeta,
            _ => return None,
        },
        _ => return None,
    };
    Some(key)
}

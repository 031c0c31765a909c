//! Input subsystem: raw samples in, canonical events out
//!
//! 1. [`device`] - Live keyboard and joystick state
//! 2. [`normalizer`] - Filtering of raw samples into [`InputEvent`]s
//! 3. [`event`] - Category and payload queries on one event
//! 4. [`direction`] - Compass projection and the wanted direction
//! 5. [`system`] - Lifecycle and per-frame draining
//!
//! # Architecture
//!
//! ```text
//! Platform ──► InputContext::next_event ──► InputEvent ──► DirectionIntent
//!  (samples)   (deadzone, stale, repeat)    (queries)      (wanted 8-way)
//! ```
//!
//! All state lives in an [`InputContext`] owned by the host loop; each
//! `next_event` call consumes at most one sample and never blocks.

pub mod context;
pub mod device;
pub mod direction;
pub mod event;
pub mod keys;
pub mod normalizer;
pub mod platform;
pub mod raw;
pub mod system;

pub use context::InputContext;
pub use device::DeviceTracker;
pub use direction::{Direction8, DirectionIntent};
pub use event::{InputEvent, Suppression};
pub use keys::{KeyModifiers, KeyboardKey, DIRECTIONAL_KEYS};
pub use platform::{EventSource, JoystickDriver, JoystickHandle, KeyboardProbe, Platform};
pub use raw::{AxisState, HatPosition, RawSample};
pub use system::{InputSystem, SystemState};

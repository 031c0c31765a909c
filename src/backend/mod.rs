//! Platform backends
//!
//! - [`memory`] - scripted samples and device state, no hardware
//! - [`gamepad`] - gilrs gamepads as joysticks
//! - [`terminal`] - crossterm keyboard in raw mode
//! - [`host`] - terminal keyboard plus gamepad, used by the binary

pub mod gamepad;
pub mod host;
pub mod memory;
pub mod terminal;

pub use host::HostPlatform;
pub use memory::MemoryPlatform;

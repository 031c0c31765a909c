//! padflow - keyboard and joypad input normalization for frame-stepped games
//!
//! Raw platform samples go through an [`InputContext`] that filters stale,
//! duplicate and ambiguous samples and yields canonical [`InputEvent`]s. On
//! top of those, [`DirectionIntent`] derives the 8-way direction the player
//! wants and [`PlayerMovement`] turns it into a velocity.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod movement;

pub use config::InputConfig;
pub use error::InputError;
pub use input::{
    AxisState, Direction8, DirectionIntent, InputContext, InputEvent, InputSystem, KeyboardKey,
    Platform, RawSample,
};
pub use movement::PlayerMovement;

//! Player movement driven by the wanted 8-way direction
//!
//! A straight movement whose angle is `direction * 45°` and whose speed is the
//! configured moving speed, or no movement at all when nothing valid is wanted.
//! Screen coordinates: x grows right, y grows down.

use crate::input::direction::Direction8;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerMovement {
    moving_speed: f32,
    direction8: Option<Direction8>,
    suspended: bool,
    speed: f32,
    angle: f32,
}

impl PlayerMovement {
    /// Stopped movement with the given speed in pixels per second
    pub fn new(moving_speed: f32) -> Self {
        Self {
            moving_speed,
            direction8: None,
            suspended: false,
            speed: 0.0,
            angle: 0.0,
        }
    }

    /// Follows the wanted direction; returns `true` if the movement changed
    ///
    /// Nothing changes while suspended.
    pub fn update(&mut self, wanted: Option<Direction8>) -> bool {
        if self.suspended || wanted == self.direction8 {
            return false;
        }
        self.direction8 = wanted;
        self.compute_movement();
        true
    }

    pub fn stop(&mut self) {
        self.direction8 = None;
        self.compute_movement();
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }

    /// Direction currently followed
    pub fn get_wanted_direction8(&self) -> Option<Direction8> {
        self.direction8
    }

    pub fn moving_speed(&self) -> f32 {
        self.moving_speed
    }

    pub fn set_moving_speed(&mut self, moving_speed: f32) {
        self.moving_speed = moving_speed;
        self.compute_movement();
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Angle in radians, counter-clockwise from the positive x axis
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// `(dx, dy)` in pixels per second
    pub fn velocity(&self) -> (f32, f32) {
        (self.speed * self.angle.cos(), -self.speed * self.angle.sin())
    }

    /// Distance covered during `elapsed`, `(0, 0)` while suspended
    pub fn displacement(&self, elapsed: Duration) -> (f32, f32) {
        if self.suspended {
            return (0.0, 0.0);
        }
        let (dx, dy) = self.velocity();
        let seconds = elapsed.as_secs_f32();
        (dx * seconds, dy * seconds)
    }

    fn compute_movement(&mut self) {
        match self.direction8 {
            Some(direction) => {
                self.speed = self.moving_speed;
                self.angle = direction.to_radians();
            }
            None => self.speed = 0.0,
        }
        debug!(
            "Movement changed: direction {:?}, speed {}",
            self.direction8, self.speed
        );
    }
}

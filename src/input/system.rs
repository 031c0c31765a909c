//! Input System - lifecycle around one input context
//!
//! `InputSystem<Initializing>` validates the configuration and builds the
//! context; [`initialize`](InputSystem::initialize) applies the device
//! settings and moves to `InputSystem<Running>`, which drains one frame of
//! events at a time and keeps per-interval statistics.

use crate::config::InputConfig;
use crate::error::InputError;
use crate::input::context::InputContext;
use crate::input::event::InputEvent;
use crate::input::platform::Platform;
use chrono::{DateTime, Local};
use statum::{machine, state};
use tracing::{debug, info};

/// Platform type the system runs on
pub type BoxedPlatform = Box<dyn Platform>;

#[state]
#[derive(Debug, Clone)]
pub enum SystemState {
    Initializing,
    Running,
}

#[machine]
pub struct InputSystem<S: SystemState> {
    // Normalizer state and devices
    context: InputContext<BoxedPlatform>,

    // Configuration the system was created with
    config: InputConfig,

    // Frames drained since start
    frames: u64,

    // Stats since the last report
    events_since_report: u64,
    suppressed_since_report: u64,
    last_report: DateTime<Local>,
}

// Methods available in all states
impl<S: SystemState> InputSystem<S> {
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn context(&self) -> &InputContext<BoxedPlatform> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut InputContext<BoxedPlatform> {
        &mut self.context
    }
}

impl InputSystem<Initializing> {
    /// Validates `config` and builds the context on top of `platform`
    ///
    /// Nothing is opened yet; joystick support stays off until
    /// [`initialize`](Self::initialize).
    pub fn create(config: InputConfig, platform: BoxedPlatform) -> Result<Self, InputError> {
        debug!("Creating input system with config: {:?}", config);
        config.validate()?;

        let mut context = InputContext::new(platform);
        context.set_axis_config(config.axis);

        Ok(Self::new(context, config, 0, 0, 0, Local::now()))
    }

    /// Applies repeat delivery and joystick support, then starts running
    pub fn initialize(mut self) -> InputSystem<Running> {
        info!(
            "Initializing input system (joypad {}, key repeat {})",
            self.config.joypad_enabled, self.config.key_repeat
        );
        self.context.set_key_repeat(self.config.key_repeat);
        self.context.set_joypad_enabled(self.config.joypad_enabled);

        match self.context.devices().joystick() {
            Some(handle) => info!("Input system running with joystick {:?}", handle),
            None => info!("Input system running, keyboard only"),
        }

        self.last_report = Local::now();
        self.transition()
    }
}

impl InputSystem<Running> {
    /// Returns the next event of the current frame, `None` once it is drained
    pub fn poll_event(&mut self) -> Option<InputEvent> {
        let event = self.context.next_event()?;
        self.events_since_report += 1;
        if !event.is_valid() {
            self.suppressed_since_report += 1;
        }
        Some(event)
    }

    /// Drains every pending event, invalid ones included
    pub fn drain_frame(&mut self) -> Vec<InputEvent> {
        let events: Vec<InputEvent> = std::iter::from_fn(|| self.poll_event()).collect();
        self.frames += 1;

        if !events.is_empty() {
            debug!("Frame {}: {} events", self.frames, events.len());
        }

        self.report_stats(Local::now());
        events
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_joypad_enabled(&mut self, enabled: bool) {
        self.config.joypad_enabled = enabled;
        self.context.set_joypad_enabled(enabled);
    }

    pub fn set_key_repeat(&mut self, repeat: bool) {
        self.config.key_repeat = repeat;
        self.context.set_key_repeat(repeat);
    }

    /// Closes the devices and hands back the final configuration, with the
    /// settings changed at runtime
    pub fn shutdown(mut self) -> InputConfig {
        info!("Shutting down input system after {} frames", self.frames);
        self.context.shutdown();
        self.config
    }

    fn report_stats(&mut self, now: DateTime<Local>) {
        let Some(interval) = chrono::Duration::try_seconds(self.config.frame.stats_interval_secs)
        else {
            return;
        };
        if now - self.last_report <= interval {
            return;
        }

        let elapsed_seconds = (now - self.last_report).num_seconds().max(1);
        info!(
            "Input stats: {} frames, {} events ({} suppressed) in {} seconds (avg {:.2} events/sec)",
            self.frames,
            self.events_since_report,
            self.suppressed_since_report,
            elapsed_seconds,
            self.events_since_report as f64 / elapsed_seconds as f64
        );
        self.events_since_report = 0;
        self.suppressed_since_report = 0;
        self.last_report = now;
    }
}

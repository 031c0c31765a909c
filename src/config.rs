//! Input configuration persisted as TOML
//!
//! Keys are stored by their stable names, never by numeric identifier, so a
//! saved file keeps working when the key enumeration is reordered. A missing or
//! broken file never prevents startup: [`InputConfig::load_or_default`] falls
//! back to defaults and logs why.

use crate::error::InputError;
use crate::input::keys::KeyboardKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Top-level input configuration
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Open the first joystick at startup (support may be on with nothing plugged)
    pub joypad_enabled: bool,
    /// Deliver repeated key presses and releases to consumers
    pub key_repeat: bool,
    pub axis: AxisConfig,
    pub direction_keys: DirectionKeys,
    pub frame: FrameConfig,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            joypad_enabled: true,
            key_repeat: false,
            axis: AxisConfig::default(),
            direction_keys: DirectionKeys::default(),
            frame: FrameConfig::default(),
        }
    }
}

/// Deadzone band for joystick axes, in raw signed 16-bit units
///
/// Values at or above `press_threshold` leave the center, values at or below
/// `release_threshold` return to it; anything in between is ignored.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AxisConfig {
    pub press_threshold: u16,
    pub release_threshold: u16,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            press_threshold: 10000,
            release_threshold: 1000,
        }
    }
}

/// Keys that drive the held-direction tracker
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DirectionKeys {
    pub right: KeyboardKey,
    pub up: KeyboardKey,
    pub left: KeyboardKey,
    pub down: KeyboardKey,
}

impl Default for DirectionKeys {
    fn default() -> Self {
        Self {
            right: KeyboardKey::Right,
            up: KeyboardKey::Up,
            left: KeyboardKey::Left,
            down: KeyboardKey::Down,
        }
    }
}

/// Longest accepted statistics interval (one day)
pub const MAX_STATS_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Host loop timing
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FrameConfig {
    /// Length of one simulation tick in milliseconds
    pub tick_ms: u64,
    /// How often the input system logs throughput statistics
    pub stats_interval_secs: i64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            stats_interval_secs: 10,
        }
    }
}

impl InputConfig {
    /// Default location: `<config dir>/padflow/input.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("padflow").join("input.toml"))
    }

    /// Reads and validates a configuration file
    pub fn load(path: &Path) -> Result<Self, InputError> {
        debug!("Loading input configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| InputError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: InputConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` (or the default location), falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                warn!("No configuration directory available, using default input settings");
                return Self::default();
            }
        };

        if !path.exists() {
            info!(
                "No input configuration at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded input configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring input configuration {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Writes this configuration, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), InputError> {
        self.validate()?;
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| InputError::ConfigWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| InputError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved input configuration to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.axis.release_threshold >= self.axis.press_threshold {
            return Err(InputError::InvalidConfig(format!(
                "axis release threshold ({}) must be below the press threshold ({})",
                self.axis.release_threshold, self.axis.press_threshold
            )));
        }
        if self.frame.tick_ms == 0 {
            return Err(InputError::InvalidConfig(
                "frame tick must be at least 1 ms".to_string(),
            ));
        }
        if !(1..=MAX_STATS_INTERVAL_SECS).contains(&self.frame.stats_interval_secs) {
            return Err(InputError::InvalidConfig(format!(
                "stats interval ({} s) must be between 1 and {} seconds",
                self.frame.stats_interval_secs, MAX_STATS_INTERVAL_SECS
            )));
        }
        let keys = [
            self.direction_keys.right,
            self.direction_keys.up,
            self.direction_keys.left,
            self.direction_keys.down,
        ];
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(InputError::InvalidConfig(format!(
                    "key '{}' is bound to more than one direction",
                    key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_documented_band() {
        let config = InputConfig::default();
        assert!(config.joypad_enabled);
        assert!(!config.key_repeat);
        assert_eq!(config.axis.press_threshold, 10000);
        assert_eq!(config.axis.release_threshold, 1000);
        assert_eq!(config.direction_keys.up, KeyboardKey::Up);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: InputConfig = toml::from_str(
            r#"
            key_repeat = true

            [direction_keys]
            up = "w"
            left = "a"
            down = "s"
            right = "d"
            "#,
        )
        .unwrap();
        assert!(config.key_repeat);
        assert!(config.joypad_enabled);
        assert_eq!(config.direction_keys.left, KeyboardKey::A);
        assert_eq!(config.axis, AxisConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("input.toml");
        let mut config = InputConfig::default();
        config.joypad_enabled = false;
        config.axis.press_threshold = 16000;
        config.direction_keys.up = KeyboardKey::Kp8;

        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("up = \"kp 8\""));

        assert_eq!(InputConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn rejects_inverted_band() {
        let mut config = InputConfig::default();
        config.axis.release_threshold = 12000;
        assert!(matches!(
            config.validate(),
            Err(InputError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_stats_interval() {
        let mut config = InputConfig::default();
        for secs in [0, -5, MAX_STATS_INTERVAL_SECS + 1, i64::MAX] {
            config.frame.stats_interval_secs = secs;
            assert!(matches!(
                config.validate(),
                Err(InputError::InvalidConfig(_))
            ));
        }
        config.frame.stats_interval_secs = MAX_STATS_INTERVAL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_direction_keys() {
        let mut config = InputConfig::default();
        config.direction_keys.left = KeyboardKey::Right;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_key_name_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.toml");
        fs::write(&path, "[direction_keys]\nup = \"north\"\n").unwrap();
        assert!(matches!(
            InputConfig::load(&path),
            Err(InputError::ConfigParse(_))
        ));
    }

    #[test]
    fn broken_or_missing_files_fall_back() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(
            InputConfig::load_or_default(Some(&missing)),
            InputConfig::default()
        );

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "joypad_enabled = \"yes\"").unwrap();
        assert_eq!(
            InputConfig::load_or_default(Some(&broken)),
            InputConfig::default()
        );
    }
}

//! Error types for the outer surfaces of the input engine
//!
//! Input handling itself never fails: inapplicable questions, missing joysticks
//! and filtered samples are answered with neutral values. Errors only come from
//! configuration files and from bringing up platform backends.

use std::path::PathBuf;

/// Errors raised while loading configuration or initializing a backend
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The configuration file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be written
    #[error("Failed to write configuration {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unexpected fields
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration parsed but its values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted key name does not match any known keyboard key
    #[error("Unknown keyboard key name: '{0}'")]
    UnknownKeyName(String),

    /// A platform backend (gamepad library, terminal) could not be started
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

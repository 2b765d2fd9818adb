//! Error types for glide_motion
//!
//! Only configuration is fallible. Runtime motion code degrades instead of
//! failing: missing elements no-op, stale captures skip, and an unavailable
//! accessibility signal reads as "no preference".

use std::path::PathBuf;

use glide_animation::ParseEasingError;
use thiserror::Error;

/// Errors that can occur while loading or validating motion configuration
#[derive(Error, Debug)]
pub enum MotionError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or does not match the schema
    #[error("invalid motion config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written back out
    #[error("failed to serialize motion config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Unknown easing name or malformed `cubic-bezier(...)`
    #[error(transparent)]
    InvalidEasing(#[from] ParseEasingError),

    /// A value parsed but is out of range
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for glide_motion operations
pub type Result<T> = std::result::Result<T, MotionError>;

//! Error taxonomy
//!
//! The simulation itself never fails: numeric state is clamped where it is
//! mutated. Errors only exist at the boundaries (construction, configuration
//! parsing, the audio sink).

use thiserror::Error;

/// Construction of the core objects failed
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
    #[error("invalid level data for level {level}: {reason}")]
    InvalidLevel { level: u32, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A JSON configuration document could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An audio sink could not play a sound; always swallowed by the dispatcher
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,
}

//! Typed errors for configuration and collaborator failures
//!
//! None of these are fatal to a running session: audio and reporting errors
//! are logged and dropped, asset errors during loading become the terminal
//! `LoadFailed` phase.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or validating a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Asset collaborator failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset `{name}` not found at {path}")]
    Missing { name: String, path: String },
    #[error("failed to load asset `{name}`: {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Audio playback failure (always recovered by logging)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("unknown sound `{0}`")]
    UnknownSound(String),
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Score delivery failure (always recovered by logging)
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error("failed to persist leaderboard: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

//! Platform abstraction layer
//!
//! Narrow interfaces to everything outside the simulation:
//! - Asset loading and image lookup
//! - Sound playback
//! - Score reporting
//!
//! Implementations are constructed by the host and handed to the session;
//! nothing here is global.

pub mod assets;

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, AudioError, ReportError};

pub use assets::AssetManager;

/// Opaque handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// Progress of the one asynchronous operation the session waits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Ready,
    Failed(AssetError),
}

/// Image/asset collaborator
pub trait AssetSource {
    /// Drive loading forward and report where it stands
    fn poll_load(&mut self) -> LoadStatus;

    /// Handle for a loaded image, `None` if absent
    fn image(&self, name: &str) -> Option<ImageHandle>;
}

/// Sound collaborator. Failures are reported, never fatal.
pub trait AudioSink {
    fn play(&mut self, name: &str, volume: f32) -> Result<(), AudioError>;
}

/// What gets sent to the leaderboard at each checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub display_name: String,
    pub external_user_id: String,
    pub score: u64,
    pub wave_reached: u32,
}

/// Score reporting collaborator
pub trait ScoreReporter {
    fn submit(&mut self, entry: &ScoreEntry) -> Result<(), ReportError>;
}

/// Silent sink for headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _name: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that writes cues to the debug log
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, name: &str, volume: f32) -> Result<(), AudioError> {
        self.played += 1;
        log::debug!("Sound {name} at volume {volume:.2}");
        Ok(())
    }
}

/// Reporter that drops everything (no leaderboard configured)
#[derive(Debug, Default)]
pub struct NullReporter;

impl ScoreReporter for NullReporter {
    fn submit(&mut self, _entry: &ScoreEntry) -> Result<(), ReportError> {
        Ok(())
    }
}

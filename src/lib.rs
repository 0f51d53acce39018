//! Slice Siege - a wave-based arcade shooter session engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (schedule, entities, collisions, state machine)
//! - `session`: Collaborator wiring (assets, audio, score reporting) and render snapshots
//! - `driver`: Per-frame loop driver
//! - `platform`: Narrow collaborator interfaces and native implementations
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::SessionDriver;
pub use error::{AssetError, AudioError, ConfigError, ReportError};
pub use highscores::HighScores;
pub use session::{RenderSnapshot, Session};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default play field (portrait phone-ish)
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player sprite box
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Player rests this far above the bottom edge at session start
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Projectiles are 10x10 boxes
    pub const PROJECTILE_SIZE: f32 = 10.0;
    /// Pickups are 30x30 boxes
    pub const PICKUP_SIZE: f32 = 30.0;

    /// Enemies spawn this far above the top edge
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    /// Horizontal padding for regular spawns
    pub const SPAWN_PADDING: f32 = 60.0;
}

/// Straight up, the direction player shots travel
pub const UP: f32 = -std::f32::consts::FRAC_PI_2;

/// Unit vector for an angle (screen space, +y is down)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle pointing from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

//! Sound cues and the volume-aware audio front end
//!
//! The session only ever names a cue; the `AudioSink` collaborator decides
//! what that sounds like. Playback is best-effort: failures are logged and
//! dropped, never propagated into the simulation.

use serde::{Deserialize, Serialize};

use crate::platform::AudioSink;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired a volley
    Shoot,
    /// Enemy hit but not destroyed
    EnemyHit,
    EnemyDestroy,
    PlayerHit,
    /// Player HP reached zero
    PlayerDefeat,
    PickupCollect,
    BossSpawn,
    WaveClear,
    LevelUp,
    GameWon,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 10] = [
        SoundEffect::Shoot,
        SoundEffect::EnemyHit,
        SoundEffect::EnemyDestroy,
        SoundEffect::PlayerHit,
        SoundEffect::PlayerDefeat,
        SoundEffect::PickupCollect,
        SoundEffect::BossSpawn,
        SoundEffect::WaveClear,
        SoundEffect::LevelUp,
        SoundEffect::GameWon,
    ];

    /// Asset name the sink is asked to play
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::EnemyHit => "enemyHit",
            SoundEffect::EnemyDestroy => "enemyDestroy",
            SoundEffect::PlayerHit => "playerHit",
            SoundEffect::PlayerDefeat => "playerDefeat",
            SoundEffect::PickupCollect => "pickup",
            SoundEffect::BossSpawn => "bossSpawn",
            SoundEffect::WaveClear => "waveClear",
            SoundEffect::LevelUp => "levelUp",
            SoundEffect::GameWon => "gameWon",
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Pick up volume and mute preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Fire and forget. Returns whether the sink accepted the cue.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }

        match self.sink.play(effect.name(), vol) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Sound `{}` failed: {e}", effect.name());
                false
            }
        }
    }
}

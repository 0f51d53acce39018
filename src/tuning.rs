//! Data-driven game balance
//!
//! Every number a designer might want to tweak without recompiling. Loaded
//! from JSON; missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::ConfigError;
use crate::sim::ScheduleParams;

/// Balance values for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Pacing ===
    /// Seconds the "Level N - Wave M" card stays up
    pub wave_start_countdown: f32,

    // === Player ===
    /// Shots per second
    pub player_fire_rate: f32,
    pub player_damage: f32,
    pub player_max_hp: f32,
    pub upgrade_fire_rate_step: f32,
    pub upgrade_damage_step: f32,
    pub upgrade_max_hp_step: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub enemy_projectile_damage: f32,

    // === Pickups ===
    pub pickup_fall_speed: f32,
    pub health_drop_chance: f32,
    pub boost_drop_chance: f32,
    pub health_pickup_amount: f32,
    pub boost_multiplier: f32,
    /// Seconds of simulated time a boost lasts
    pub boost_duration: f32,

    // === Collisions ===
    /// Damage an enemy takes from ramming the player
    pub collision_kill_damage: f32,
    /// Damage the player takes from being rammed
    pub collision_player_damage: f32,

    // === Boss ===
    pub boss_base_hp: f32,
    pub boss_hp_increment: f32,

    // === Schedule ===
    pub schedule: ScheduleParams,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            wave_start_countdown: 2.0,

            player_fire_rate: 1.0,
            player_damage: 1.0,
            player_max_hp: 5.0,
            upgrade_fire_rate_step: 0.2,
            upgrade_damage_step: 0.2,
            upgrade_max_hp_step: 1.0,

            projectile_speed: 400.0,
            enemy_projectile_damage: 1.0,

            pickup_fall_speed: 80.0,
            health_drop_chance: 0.05,
            boost_drop_chance: 0.02,
            health_pickup_amount: 1.0,
            boost_multiplier: 1.5,
            boost_duration: 10.0,

            collision_kill_damage: 1000.0,
            collision_player_damage: 1.0,

            boss_base_hp: 50.0,
            boss_hp_increment: 25.0,

            schedule: ScheduleParams::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                })
            }
        }
        fn chance(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within [0, 1], got {value}"),
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("player_fire_rate", self.player_fire_rate)?;
        positive("player_damage", self.player_damage)?;
        positive("player_max_hp", self.player_max_hp)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("boost_multiplier", self.boost_multiplier)?;
        positive("boss_base_hp", self.boss_base_hp)?;
        chance("health_drop_chance", self.health_drop_chance)?;
        chance("boost_drop_chance", self.boost_drop_chance)?;

        non_negative("wave_start_countdown", self.wave_start_countdown)?;
        non_negative("upgrade_fire_rate_step", self.upgrade_fire_rate_step)?;
        non_negative("upgrade_damage_step", self.upgrade_damage_step)?;
        non_negative("upgrade_max_hp_step", self.upgrade_max_hp_step)?;
        non_negative("enemy_projectile_damage", self.enemy_projectile_damage)?;
        non_negative("pickup_fall_speed", self.pickup_fall_speed)?;
        non_negative("health_pickup_amount", self.health_pickup_amount)?;
        non_negative("boost_duration", self.boost_duration)?;
        non_negative("collision_kill_damage", self.collision_kill_damage)?;
        non_negative("collision_player_damage", self.collision_player_damage)?;
        non_negative("boss_hp_increment", self.boss_hp_increment)?;

        if self.schedule.boss_level_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "schedule.boss_level_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.schedule.waves_per_regular_level == 0 {
            return Err(ConfigError::Invalid {
                field: "schedule.waves_per_regular_level",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

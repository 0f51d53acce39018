//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt` only (no clocks)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform calls; side effects leave as `GameEvent`s

pub mod collision;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, ContactDamage, Field, Kill, resolve};
pub use enemy::{BossState, Enemy, EnemyBehavior, EnemyKind, MovementPattern, ROSTER, boss_hp};
pub use pickup::{DropTable, Pickup, PickupKind, roll_drops};
pub use player::{BoostStat, PizzaVariant, Player, PlayerParams, PlayerStats, Stat};
pub use projectile::{Projectile, ProjectileOwner};
pub use schedule::{LevelSchedule, ScheduleParams, WaveDescriptor, WaveEnemies};
pub use state::{CheckpointReason, GameEvent, GameState, ScoreCheckpoint, SessionPhase};
pub use tick::{TickInput, check_wave_completion, tick};

//! Session state and core simulation types
//!
//! `GameState` owns everything the session mutates: the schedule cursor,
//! spawn counters, score and every entity collection. Entities are never
//! removed mid-tick; they are flagged inactive and swept at the end.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Field;
use super::enemy::Enemy;
use super::pickup::Pickup;
use super::player::{Player, PlayerParams};
use super::projectile::Projectile;
use super::schedule::{LevelSchedule, WaveDescriptor, WaveEnemies};
use crate::audio::SoundEffect;
use crate::consts::PLAYER_BOTTOM_OFFSET;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to start
    Menu,
    /// Start requested, waiting on the asset collaborator
    Loading,
    /// Wave banner countdown; nothing but the countdown runs
    DisplayWaveStart,
    /// Active gameplay
    Running,
    /// Between levels, waiting for an upgrade choice
    UpgradingStats,
    GameOver,
    GameWon,
    /// Assets failed to load; the reason is kept on the state
    LoadFailed,
}

impl SessionPhase {
    /// Phases the simulation never leaves
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::GameOver | SessionPhase::GameWon | SessionPhase::LoadFailed
        )
    }
}

/// Why a score checkpoint was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointReason {
    LevelUp,
    GameOver,
    GameWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCheckpoint {
    pub reason: CheckpointReason,
    pub score: u64,
    /// Global number of the wave the session was on
    pub wave_reached: u32,
}

/// Things the outside world may want to react to. Drained once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    WaveStarted {
        level: u32,
        wave_in_level: u32,
        global_wave: u32,
        is_boss_wave: bool,
    },
    WaveCleared {
        level: u32,
        wave_in_level: u32,
    },
    ScoreCheckpoint(ScoreCheckpoint),
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub schedule: LevelSchedule,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: SessionPhase,
    /// Index into the schedule; `None` before the first wave
    pub wave_index: Option<usize>,
    /// Enemies the current wave will spawn in total
    pub planned_count: u32,
    pub spawned_count: u32,
    /// Seconds until the next regular spawn
    pub spawn_timer: f32,
    /// Per-kind spawns still owed by the current wave, in composition order
    pub remaining_by_kind: Vec<WaveEnemies>,
    /// Seconds left on the wave banner
    pub countdown: f32,
    pub score: u64,
    /// Display counters for the HUD
    pub level: u32,
    pub wave_in_level: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Simulated seconds spent in `Running`
    pub time: f32,
    /// Set on entering `LoadFailed`
    pub load_error: Option<String>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// A fresh session in `Menu` with the schedule generated from the tuning
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let schedule = LevelSchedule::generate_with(tuning.schedule);
        Self::with_schedule(tuning, schedule, seed)
    }

    /// A fresh session over a hand-built schedule
    pub fn with_schedule(tuning: Tuning, schedule: LevelSchedule, seed: u64) -> Self {
        let field = Field::new(tuning.field_width, tuning.field_height);
        let player = Player::new(PlayerParams::from(&tuning), Self::player_start(&field));
        Self {
            tuning,
            schedule,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Menu,
            wave_index: None,
            planned_count: 0,
            spawned_count: 0,
            spawn_timer: 0.0,
            remaining_by_kind: Vec::new(),
            countdown: 0.0,
            score: 0,
            level: 0,
            wave_in_level: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            time: 0.0,
            load_error: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn player_start(field: &Field) -> Vec2 {
        Vec2::new(field.center_x(), field.height - PLAYER_BOTTOM_OFFSET)
    }

    /// Put everything back to the start of a run (schedule, seed and tuning kept)
    pub(crate) fn reset_run(&mut self) {
        let field = self.field();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.player = Player::new(PlayerParams::from(&self.tuning), Self::player_start(&field));
        self.wave_index = None;
        self.planned_count = 0;
        self.spawned_count = 0;
        self.spawn_timer = 0.0;
        self.remaining_by_kind.clear();
        self.countdown = 0.0;
        self.score = 0;
        self.level = 0;
        self.wave_in_level = 0;
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.time = 0.0;
        self.load_error = None;
        self.next_id = 1;
    }

    pub fn field(&self) -> Field {
        Field::new(self.tuning.field_width, self.tuning.field_height)
    }

    pub fn current_wave(&self) -> Option<&WaveDescriptor> {
        self.wave_index.and_then(|i| self.schedule.get(i))
    }

    /// Global wave number for reporting (0 before the first wave)
    pub fn wave_reached(&self) -> u32 {
        self.current_wave().map_or(0, |w| w.global_wave_number)
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub(crate) fn checkpoint(&mut self, reason: CheckpointReason) {
        let checkpoint = ScoreCheckpoint {
            reason,
            score: self.score,
            wave_reached: self.wave_reached(),
        };
        self.events.push(GameEvent::ScoreCheckpoint(checkpoint));
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop inactive entities; preserves order
    pub(crate) fn sweep(&mut self) {
        self.enemies.retain(|e| e.active);
        self.projectiles.retain(|p| p.active);
        self.pickups.retain(|p| p.active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(Tuning::default(), 1);
        assert_eq!(state.phase, SessionPhase::Menu);
        assert_eq!(state.wave_index, None);
        assert_eq!(state.wave_reached(), 0);
        assert_eq!(state.schedule.len(), 22);
        assert_eq!(state.player.pos, Vec2::new(240.0, 740.0));
        assert_eq!(state.player.hp(), 5.0);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(SessionPhase::GameOver.is_terminal());
        assert!(SessionPhase::GameWon.is_terminal());
        assert!(SessionPhase::LoadFailed.is_terminal());
        assert!(!SessionPhase::UpgradingStats.is_terminal());
        assert!(!SessionPhase::Menu.is_terminal());
    }

    #[test]
    fn test_drain_events_empties_outbox() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.sound(SoundEffect::Shoot);
        state.checkpoint(CheckpointReason::GameOver);
        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            GameEvent::ScoreCheckpoint(ScoreCheckpoint {
                reason: CheckpointReason::GameOver,
                score: 0,
                wave_reached: 0
            })
        ));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(Tuning::default(), 1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}

//! Session state machine
//!
//! `tick` advances the session by one step; the commands (`request_start`,
//! `begin_session`, `fail_loading`, `select_upgrade`) are the only other way
//! the phase changes. Nothing here blocks, and every timer is fed by the
//! same `dt`, so a session replays identically for a given seed and input.

use glam::Vec2;
use rand::Rng;

use super::collision::{ContactDamage, resolve};
use super::enemy::{Enemy, EnemyKind, boss_hp};
use super::pickup::{DropTable, Pickup, roll_drops};
use super::player::Stat;
use super::projectile::{Projectile, ProjectileOwner};
use super::state::{CheckpointReason, GameEvent, GameState, SessionPhase};
use crate::audio::SoundEffect;
use crate::consts::{ENEMY_SPAWN_Y, SPAWN_PADDING};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Where the pointer is, in field coordinates
    pub pointer: Option<Vec2>,
    /// Fire button / touch held
    pub pressed: bool,
}

impl GameState {
    /// Menu -> Loading. Returns false when not in the menu.
    pub fn request_start(&mut self) -> bool {
        if self.phase != SessionPhase::Menu {
            log::debug!("Start ignored in {:?}", self.phase);
            return false;
        }
        self.phase = SessionPhase::Loading;
        log::info!("Session start requested, loading assets");
        true
    }

    /// Assets are ready: reset the run and head for the first wave
    pub fn begin_session(&mut self) -> bool {
        if self.phase != SessionPhase::Loading {
            log::debug!("Begin ignored in {:?}", self.phase);
            return false;
        }
        self.reset_run();
        log::info!("Session started (seed {})", self.seed);
        advance_to(self, 0);
        true
    }

    /// Loading -> LoadFailed with a reason that stays on screen
    pub fn fail_loading(&mut self, reason: impl Into<String>) -> bool {
        if self.phase != SessionPhase::Loading {
            return false;
        }
        let reason = reason.into();
        log::error!("Asset loading failed: {reason}");
        self.load_error = Some(reason);
        self.phase = SessionPhase::LoadFailed;
        true
    }

    /// GameOver/GameWon -> Menu, so a new run can be requested
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::GameOver | SessionPhase::GameWon) {
            return false;
        }
        self.phase = SessionPhase::Menu;
        true
    }

    /// Apply an upgrade choice and move on to the next level.
    ///
    /// Only honoured in `UpgradingStats`; returns whether it was applied.
    pub fn select_upgrade(&mut self, stat: Stat) -> bool {
        if self.phase != SessionPhase::UpgradingStats {
            log::debug!("Upgrade {stat:?} ignored in {:?}", self.phase);
            return false;
        }
        self.player.upgrade_stat(stat);

        match self.wave_index.and_then(|i| self.schedule.next_after_level(i)) {
            Some(next) => advance_to(self, next),
            None => win(self),
        }
        true
    }
}

/// Advance the session by `dt` simulated seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    match state.phase {
        SessionPhase::DisplayWaveStart => {
            state.countdown -= dt;
            if state.countdown <= 0.0 {
                state.countdown = 0.0;
                start_wave(state);
            }
        }
        SessionPhase::Running => update_running(state, input, dt),
        _ => {}
    }
}

/// Complete the current wave if its end condition holds.
///
/// Only acts in `Running`, so calling it again after the transition is a
/// no-op. Returns true if the wave completed on this call.
pub fn check_wave_completion(state: &mut GameState) -> bool {
    if state.phase != SessionPhase::Running {
        return false;
    }
    let Some(wave) = state.current_wave() else {
        return false;
    };

    let none_active = !state.enemies.iter().any(|e| e.active);
    let done = if wave.is_boss_wave {
        state.spawned_count > 0 && none_active
    } else {
        state.spawned_count >= state.planned_count && none_active
    };

    if done {
        complete_wave(state);
    }
    done
}

/// Point the session at wave `index` and start its banner countdown
fn advance_to(state: &mut GameState, index: usize) {
    let Some(wave) = state.schedule.get(index).cloned() else {
        win(state);
        return;
    };

    state.wave_index = Some(index);
    state.level = wave.level_number;
    state.wave_in_level = wave.wave_in_level;
    state.planned_count = wave.planned_spawns();
    state.spawned_count = 0;
    state.remaining_by_kind = wave.enemy_composition.clone();
    state.countdown = state.tuning.wave_start_countdown;
    state.phase = SessionPhase::DisplayWaveStart;

    log::info!(
        "Level {} wave {} (global {}){}",
        wave.level_number,
        wave.wave_in_level,
        wave.global_wave_number,
        if wave.is_boss_wave { " - boss" } else { "" }
    );
}

/// Countdown finished: clear the field and put the wave in motion
fn start_wave(state: &mut GameState) {
    let Some(wave) = state.current_wave().cloned() else {
        win(state);
        return;
    };

    state.enemies.clear();
    state.spawned_count = 0;
    state.spawn_timer = 0.0;
    state.planned_count = wave.planned_spawns();
    state.remaining_by_kind = wave.enemy_composition.clone();

    if !wave.is_boss_wave && state.planned_count == 0 {
        log::warn!(
            "Level {} wave {} has no enemies, skipping",
            wave.level_number,
            wave.wave_in_level
        );
        complete_wave(state);
        return;
    }

    state.phase = SessionPhase::Running;
    state.emit(GameEvent::WaveStarted {
        level: wave.level_number,
        wave_in_level: wave.wave_in_level,
        global_wave: wave.global_wave_number,
        is_boss_wave: wave.is_boss_wave,
    });

    if wave.is_boss_wave {
        spawn_boss(state, wave.boss_kind.unwrap_or(EnemyKind::Taco), wave.level_number);
    }
}

fn complete_wave(state: &mut GameState) {
    let Some(index) = state.wave_index else {
        return;
    };
    state.emit(GameEvent::WaveCleared {
        level: state.level,
        wave_in_level: state.wave_in_level,
    });
    state.sound(SoundEffect::WaveClear);

    if index + 1 >= state.schedule.len() {
        win(state);
    } else if state.schedule.is_last_wave_of_level(index) {
        state.phase = SessionPhase::UpgradingStats;
        state.sound(SoundEffect::LevelUp);
        state.checkpoint(CheckpointReason::LevelUp);
        log::info!("Level {} cleared, score {}", state.level, state.score);
    } else {
        advance_to(state, index + 1);
    }
}

fn win(state: &mut GameState) {
    state.phase = SessionPhase::GameWon;
    state.sound(SoundEffect::GameWon);
    state.checkpoint(CheckpointReason::GameWon);
    log::info!("All waves cleared! Final score {}", state.score);
}

fn game_over(state: &mut GameState) {
    state.phase = SessionPhase::GameOver;
    state.sound(SoundEffect::PlayerDefeat);
    state.checkpoint(CheckpointReason::GameOver);
    log::info!(
        "Game over at wave {} with score {}",
        state.wave_reached(),
        state.score
    );
}

fn spawn_boss(state: &mut GameState, kind: EnemyKind, level: u32) {
    let tuning = &state.tuning;
    let hp = boss_hp(
        level,
        tuning.boss_base_hp,
        tuning.boss_hp_increment,
        tuning.schedule.boss_level_interval,
    );
    let x = state.field().center_x();
    let id = state.next_entity_id();
    let boss = Enemy::boss(id, kind, x, hp, &mut state.rng);
    state.enemies.push(boss);
    state.spawned_count = 1;
    state.sound(SoundEffect::BossSpawn);
    log::info!("Boss {kind:?} spawned with {hp} HP");
}

/// Spawn one regular enemy of a kind that still has count left
fn spawn_regular(state: &mut GameState) {
    let open: Vec<usize> = state
        .remaining_by_kind
        .iter()
        .enumerate()
        .filter(|(_, e)| e.count > 0)
        .map(|(i, _)| i)
        .collect();
    if open.is_empty() {
        return;
    }
    let slot = open[state.rng.random_range(0..open.len())];
    state.remaining_by_kind[slot].count -= 1;
    let kind = state.remaining_by_kind[slot].kind;

    let field = state.field();
    let (min_x, max_x) = (SPAWN_PADDING, field.width - SPAWN_PADDING);
    let x = if max_x > min_x {
        state.rng.random_range(min_x..max_x)
    } else {
        field.center_x()
    };

    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(id, kind, Vec2::new(x, ENEMY_SPAWN_Y)));
    state.spawned_count += 1;
    log::debug!(
        "Spawned {kind:?} #{id} ({}/{})",
        state.spawned_count,
        state.planned_count
    );
}

fn update_spawning(state: &mut GameState, dt: f32) {
    let Some(wave) = state.current_wave() else {
        return;
    };
    if wave.is_boss_wave || state.spawned_count >= state.planned_count {
        return;
    }
    let interval = wave.spawn_interval;

    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        spawn_regular(state);
        state.spawn_timer += interval;
    }
}

fn update_running(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time += dt;
    let field = state.field();

    // Player
    let shots = state
        .player
        .update(dt, state.phase, input, &field, &mut state.rng);
    if !shots.is_empty() {
        state.sound(SoundEffect::Shoot);
    }
    state.projectiles.extend(shots);

    for projectile in &mut state.projectiles {
        projectile.update(dt, &field);
    }

    // Enemies; the boss may fire at the player
    let target = state.player.pos;
    let mut boss_shots = Vec::new();
    for enemy in &mut state.enemies {
        if let Some(shot) = enemy.update(dt, &field, target, &mut state.rng) {
            boss_shots.push(shot);
        }
    }
    for shot in boss_shots {
        state.projectiles.push(Projectile::new(
            shot.origin,
            shot.angle,
            state.tuning.projectile_speed,
            state.tuning.enemy_projectile_damage,
            ProjectileOwner::Enemy,
        ));
    }

    for pickup in &mut state.pickups {
        pickup.update(dt, &field);
    }

    update_spawning(state, dt);

    // Collisions
    let contact = ContactDamage {
        to_enemy: state.tuning.collision_kill_damage,
        to_player: state.tuning.collision_player_damage,
    };
    let report = resolve(
        &mut state.player,
        &mut state.enemies,
        &mut state.projectiles,
        &mut state.pickups,
        contact,
    );

    let kills = report.kills.len() as u32;
    if report.enemy_hits > kills {
        state.sound(SoundEffect::EnemyHit);
    }
    if report.player_hits > 0 && !report.player_killed {
        state.sound(SoundEffect::PlayerHit);
    }
    for _ in &report.collected {
        state.sound(SoundEffect::PickupCollect);
    }

    let table = DropTable {
        health_chance: state.tuning.health_drop_chance,
        boost_chance: state.tuning.boost_drop_chance,
    };
    for kill in &report.kills {
        state.score += kill.kind.profile().score;
        state.sound(SoundEffect::EnemyDestroy);

        let variant = state.player.variant();
        for kind in roll_drops(kill.was_boss, &table, variant, &mut state.rng) {
            let id = state.next_entity_id();
            state
                .pickups
                .push(Pickup::new(id, kind, kill.pos, state.tuning.pickup_fall_speed));
        }
    }

    state.sweep();

    // Death wins over wave completion
    if !state.player.is_alive() {
        game_over(state);
        return;
    }

    check_wave_completion(state);
}

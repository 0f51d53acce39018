//! Session façade
//!
//! Owns the `GameState` plus the collaborators it was constructed with and
//! is the only place simulation events turn into side effects. The UI talks
//! to it with discrete commands (`start`, `select_upgrade`) and reads back
//! `RenderSnapshot`s; it never reaches into the simulation directly.

use std::collections::HashSet;

use glam::Vec2;
use serde::Serialize;

use crate::audio::AudioManager;
use crate::platform::{AssetSource, ImageHandle, LoadStatus, ScoreEntry, ScoreReporter};
use crate::settings::Settings;
use crate::sim::{
    BoostStat, GameEvent, GameState, PizzaVariant, ScoreCheckpoint, SessionPhase, Stat, TickInput,
    tick,
};

/// Shape drawn when an image is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderShape {
    Rect,
    /// Pizza slice: point up
    Triangle,
}

/// How to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sprite {
    Image(ImageHandle),
    Placeholder {
        shape: PlaceholderShape,
        /// 0xRRGGBB
        color: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: Vec2,
    pub sprite: Sprite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub body: SpriteView,
    /// HP fraction for the health bar
    pub health: f32,
    pub is_boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub player_owned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub body: SpriteView,
    pub hp: f32,
    pub max_hp: f32,
    pub variant: PizzaVariant,
    pub fire_rate_boost: f32,
    pub damage_boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOption {
    pub stat: Stat,
    pub label: &'static str,
}

/// Read-only view of one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub level: u32,
    pub wave_in_level: u32,
    pub global_wave: u32,
    /// Seconds left on the wave banner, while it shows
    pub countdown: Option<f32>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<SpriteView>,
    /// Filled only while an upgrade choice is pending
    pub upgrade_options: Vec<UpgradeOption>,
    /// Persistent load failure message
    pub error: Option<String>,
}

const PLAYER_COLOR: u32 = 0xFFD700;
const ENEMY_COLOR: u32 = 0xCC3333;
const PICKUP_COLOR: u32 = 0x800080;

pub struct Session {
    state: GameState,
    assets: Box<dyn AssetSource>,
    audio: AudioManager,
    reporter: Box<dyn ScoreReporter>,
    display_name: String,
    user_id: String,
    input: TickInput,
    /// Images already reported missing (logged once each)
    missing_images: HashSet<String>,
}

impl Session {
    pub fn new(
        state: GameState,
        assets: Box<dyn AssetSource>,
        mut audio: AudioManager,
        reporter: Box<dyn ScoreReporter>,
        settings: &Settings,
    ) -> Self {
        audio.apply_settings(settings);
        Self {
            state,
            assets,
            audio,
            reporter,
            display_name: settings.display_name.clone(),
            user_id: settings.user_key().to_string(),
            input: TickInput::default(),
            missing_images: HashSet::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Latest pointer/press state, used by every following update
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// User asked to play
    pub fn start(&mut self) -> bool {
        if matches!(self.state.phase, SessionPhase::GameOver | SessionPhase::GameWon) {
            self.state.return_to_menu();
        }
        self.state.request_start()
    }

    pub fn select_upgrade(&mut self, stat: Stat) -> bool {
        let applied = self.state.select_upgrade(stat);
        self.dispatch_events();
        applied
    }

    /// While loading, ask the asset collaborator how it is going
    pub fn poll_assets(&mut self) {
        if self.state.phase != SessionPhase::Loading {
            return;
        }
        match self.assets.poll_load() {
            LoadStatus::Pending => {}
            LoadStatus::Ready => {
                self.state.begin_session();
            }
            LoadStatus::Failed(e) => {
                self.state.fail_loading(e.to_string());
            }
        }
        self.dispatch_events();
    }

    /// Advance by `dt` seconds and deliver whatever happened
    pub fn update(&mut self, dt: f32) {
        self.poll_assets();
        if !self.state.phase.is_terminal() {
            tick(&mut self.state, &self.input, dt);
        }
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(effect) => {
                    self.audio.play(effect);
                }
                GameEvent::ScoreCheckpoint(checkpoint) => self.report(checkpoint),
                GameEvent::WaveStarted {
                    level,
                    wave_in_level,
                    ..
                } => log::debug!("Wave {level}-{wave_in_level} running"),
                GameEvent::WaveCleared {
                    level,
                    wave_in_level,
                } => log::debug!("Wave {level}-{wave_in_level} cleared"),
            }
        }
    }

    /// Best-effort delivery; failures never touch the session
    fn report(&mut self, checkpoint: ScoreCheckpoint) {
        let entry = ScoreEntry {
            display_name: self.display_name.clone(),
            external_user_id: self.user_id.clone(),
            score: checkpoint.score,
            wave_reached: checkpoint.wave_reached,
        };
        match self.reporter.submit(&entry) {
            Ok(()) => log::debug!("Reported {:?} checkpoint: {}", checkpoint.reason, entry.score),
            Err(e) => log::warn!("Score report failed ({:?}): {e}", checkpoint.reason),
        }
    }

    fn sprite(&mut self, image: &str, shape: PlaceholderShape, color: u32) -> Sprite {
        match self.assets.image(image) {
            Some(handle) => Sprite::Image(handle),
            None => {
                if self.missing_images.insert(image.to_string()) {
                    log::warn!("Image `{image}` not loaded, drawing placeholder");
                }
                Sprite::Placeholder { shape, color }
            }
        }
    }

    /// Build the frame's read-only view
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let variant = self.state.player.variant();
        let player_sprite = self.sprite(variant.image_name(), PlaceholderShape::Triangle, PLAYER_COLOR);
        let player = &self.state.player;
        let player_view = PlayerView {
            body: SpriteView {
                pos: player.pos,
                size: player.size,
                sprite: player_sprite,
            },
            hp: player.hp(),
            max_hp: player.max_hp(),
            variant,
            fire_rate_boost: player.boost_remaining(BoostStat::FireRate),
            damage_boost: player.boost_remaining(BoostStat::Damage),
        };

        let enemy_parts: Vec<_> = self
            .state
            .enemies
            .iter()
            .filter(|e| e.active)
            .map(|e| (e.kind.image_name(), e.pos, e.size, e.health_fraction(), e.is_boss()))
            .collect();
        let enemies = enemy_parts
            .into_iter()
            .map(|(image, pos, size, health, is_boss)| EnemyView {
                body: SpriteView {
                    pos,
                    size,
                    sprite: self.sprite(image, PlaceholderShape::Rect, ENEMY_COLOR),
                },
                health,
                is_boss,
            })
            .collect();

        let pickup_parts: Vec<_> = self
            .state
            .pickups
            .iter()
            .filter(|p| p.active)
            .map(|p| (p.kind.image_name(), p.pos, p.aabb().size))
            .collect();
        let pickups = pickup_parts
            .into_iter()
            .map(|(image, pos, size)| SpriteView {
                pos,
                size,
                sprite: self.sprite(image, PlaceholderShape::Rect, PICKUP_COLOR),
            })
            .collect();

        let state = &self.state;
        RenderSnapshot {
            phase: state.phase,
            score: state.score,
            level: state.level,
            wave_in_level: state.wave_in_level,
            global_wave: state.wave_reached(),
            countdown: (state.phase == SessionPhase::DisplayWaveStart).then_some(state.countdown),
            player: player_view,
            enemies,
            projectiles: state
                .projectiles
                .iter()
                .filter(|p| p.active)
                .map(|p| ProjectileView {
                    pos: p.pos,
                    player_owned: p.is_player_owned(),
                })
                .collect(),
            pickups,
            upgrade_options: if state.phase == SessionPhase::UpgradingStats {
                Stat::ALL
                    .iter()
                    .map(|&stat| UpgradeOption {
                        stat,
                        label: stat.label(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
            error: state.load_error.clone(),
        }
    }
}

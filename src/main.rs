//! Slice Siege headless runner
//!
//! `slice-siege [seed] [tuning.json]` plays one session with an autopilot
//! (follow the lowest enemy, hold fire, cycle through upgrades) and prints a
//! JSON summary of how far it got. Scores go to `highscores.json` in the
//! working directory; `RUST_LOG` controls log output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use slice_siege::audio::AudioManager;
use slice_siege::platform::assets::DEFAULT_IMAGES;
use slice_siege::platform::{AssetManager, LogAudio};
use slice_siege::sim::{GameState, PizzaVariant, SessionPhase, Stat, TickInput};
use slice_siege::{HighScores, RenderSnapshot, Session, SessionDriver, Settings, Tuning};

const FRAME_SECONDS: f64 = 1.0 / 60.0;
/// Give up after this much simulated wall time
const MAX_RUN_SECONDS: f64 = 30.0 * 60.0;
const DEFAULT_SEED: u64 = 0x5EED;

const SETTINGS_PATH: &str = "settings.json";
const HIGHSCORES_PATH: &str = "highscores.json";

#[derive(Debug, Parser)]
#[command(name = "slice-siege")]
#[command(about = "Play a headless Slice Siege session with the autopilot")]
struct Args {
    /// RNG seed for the run
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Balance overrides (JSON); shipped defaults when omitted
    tuning: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    phase: SessionPhase,
    score: u64,
    level: u32,
    wave: u32,
    hp: f32,
    max_hp: f32,
    variant: PizzaVariant,
    seconds: f64,
    error: Option<String>,
}

/// Follow the enemy closest to the bottom, always firing
fn autopilot(snap: &RenderSnapshot) -> TickInput {
    let player = snap.player.body.pos;
    let target_x = snap
        .enemies
        .iter()
        .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
        .map_or(player.x, |e| e.body.pos.x);
    TickInput {
        pointer: Some(Vec2::new(target_x, player.y)),
        pressed: true,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let seed = args.seed;
    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::from(2);
            }
        },
        None => Tuning::default(),
    };
    log::info!("Slice Siege (headless) starting, seed {seed}");

    let settings = Settings::load(SETTINGS_PATH);
    let mut assets = AssetManager::in_memory();
    for (name, _) in DEFAULT_IMAGES {
        assets.register(name);
    }
    let session = Session::new(
        GameState::new(tuning, seed),
        Box::new(assets),
        AudioManager::new(Box::new(LogAudio::default())),
        Box::new(HighScores::load(HIGHSCORES_PATH)),
        &settings,
    );

    let mut driver = SessionDriver::new(session);
    driver.session_mut().start();

    let mut upgrades = Stat::ALL.into_iter().cycle();
    let mut now = 0.0;
    let mut snap = driver.frame(now);
    while !snap.phase.is_terminal() && now < MAX_RUN_SECONDS {
        if snap.phase == SessionPhase::UpgradingStats {
            if let Some(stat) = upgrades.next() {
                log::info!("Autopilot picks {}", stat.label());
                driver.session_mut().select_upgrade(stat);
            }
        }
        driver.set_input(autopilot(&snap));
        now += FRAME_SECONDS;
        snap = driver.frame(now);
    }

    let summary = Summary {
        seed,
        phase: snap.phase,
        score: snap.score,
        level: snap.level,
        wave: snap.global_wave,
        hp: snap.player.hp,
        max_hp: snap.player.max_hp,
        variant: snap.player.variant,
        seconds: now,
        error: snap.error.clone(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to encode summary: {e}");
            return ExitCode::FAILURE;
        }
    }

    if snap.phase == SessionPhase::LoadFailed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

//! Level/wave schedule generation
//!
//! The whole game's wave list is produced once, up front, from a handful of
//! constants. Difficulty scales with the global wave number; only boss HP
//! scales with the level number (see `enemy::boss_hp`).

use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, ROSTER};

/// Number of levels in a full game
pub const MAX_LEVELS: u32 = 10;
/// Regular waves per level; boss levels get one extra (the boss wave)
pub const WAVES_PER_REGULAR_LEVEL: u32 = 2;
/// Every Nth level ends with a boss wave
pub const BOSS_LEVEL_INTERVAL: u32 = 5;

/// Slowest and fastest spawn cadence (seconds between spawns)
pub const MAX_SPAWN_INTERVAL: f32 = 2.0;
pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
/// Cadence tightening per global wave
pub const SPAWN_INTERVAL_STEP: f32 = 0.05;
/// Enemies per available kind before wave scaling kicks in
const BASE_COUNT_PER_KIND: u32 = 2;

/// Knobs for the generator. Defaults are the shipped constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleParams {
    pub max_levels: u32,
    pub waves_per_regular_level: u32,
    pub boss_level_interval: u32,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            max_levels: MAX_LEVELS,
            waves_per_regular_level: WAVES_PER_REGULAR_LEVEL,
            boss_level_interval: BOSS_LEVEL_INTERVAL,
        }
    }
}

impl ScheduleParams {
    /// A level is a boss level iff it is a multiple of the interval
    pub fn is_boss_level(&self, level: u32) -> bool {
        self.boss_level_interval > 0 && level % self.boss_level_interval == 0
    }

    /// Waves in a given level, boss wave included
    pub fn waves_in_level(&self, level: u32) -> u32 {
        if self.is_boss_level(level) {
            self.waves_per_regular_level + 1
        } else {
            self.waves_per_regular_level
        }
    }
}

/// One entry of a wave's composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveEnemies {
    pub kind: EnemyKind,
    pub count: u32,
}

/// A single wave. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDescriptor {
    /// 1-based counter across the whole game (drives scaling)
    pub global_wave_number: u32,
    pub level_number: u32,
    /// 1-based, resets every level
    pub wave_in_level: u32,
    /// Empty for boss waves
    pub enemy_composition: Vec<WaveEnemies>,
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub is_boss_wave: bool,
    pub boss_kind: Option<EnemyKind>,
}

impl WaveDescriptor {
    /// Sum of the composition counts
    pub fn total_enemies(&self) -> u32 {
        self.enemy_composition.iter().map(|e| e.count).sum()
    }

    /// Enemies the wave must see spawned before it can complete
    pub fn planned_spawns(&self) -> u32 {
        if self.is_boss_wave { 1 } else { self.total_enemies() }
    }
}

/// Kinds unlocked for a given global wave, easiest first
pub fn available_kinds(global_wave: u32) -> &'static [EnemyKind] {
    let unlocked = (global_wave / 2 + 1) as usize;
    &ROSTER[..unlocked.min(ROSTER.len())]
}

/// Seconds between spawns for a given global wave
pub fn spawn_interval_for(global_wave: u32) -> f32 {
    (MAX_SPAWN_INTERVAL - global_wave as f32 * SPAWN_INTERVAL_STEP).max(MIN_SPAWN_INTERVAL)
}

/// Split a regular wave's enemy total across the unlocked kinds.
///
/// Every kind gets `total / n`; the remainder goes to the first (easiest)
/// kind. Totals are always at least `2n + 1`, so no kind ends up at zero.
fn regular_composition(global_wave: u32, wave_in_level: u32) -> Vec<WaveEnemies> {
    let kinds = available_kinds(global_wave);
    let n = kinds.len() as u32;
    let scaling = global_wave / 3;
    let total = (BASE_COUNT_PER_KIND + scaling) * n + wave_in_level;

    let share = total / n;
    let remainder = total % n;
    kinds
        .iter()
        .enumerate()
        .map(|(i, &kind)| WaveEnemies {
            kind,
            count: if i == 0 { share + remainder } else { share },
        })
        .filter(|e| e.count > 0)
        .collect()
}

/// Ordered wave list covering every level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSchedule {
    waves: Vec<WaveDescriptor>,
}

impl LevelSchedule {
    /// Generate the shipped schedule
    pub fn generate() -> Self {
        Self::generate_with(ScheduleParams::default())
    }

    /// Generate a schedule for arbitrary parameters. Pure and deterministic.
    pub fn generate_with(params: ScheduleParams) -> Self {
        let mut waves = Vec::new();
        let mut global_wave = 1;

        for level in 1..=params.max_levels {
            let boss_level = params.is_boss_level(level);
            let wave_count = params.waves_in_level(level);

            for wave_in_level in 1..=wave_count {
                let spawn_interval = spawn_interval_for(global_wave);
                let descriptor = if boss_level && wave_in_level == wave_count {
                    WaveDescriptor {
                        global_wave_number: global_wave,
                        level_number: level,
                        wave_in_level,
                        enemy_composition: Vec::new(),
                        spawn_interval,
                        is_boss_wave: true,
                        boss_kind: Some(EnemyKind::Taco),
                    }
                } else {
                    WaveDescriptor {
                        global_wave_number: global_wave,
                        level_number: level,
                        wave_in_level,
                        enemy_composition: regular_composition(global_wave, wave_in_level),
                        spawn_interval,
                        is_boss_wave: false,
                        boss_kind: None,
                    }
                };
                waves.push(descriptor);
                global_wave += 1;
            }
        }

        log::debug!(
            "Generated schedule: {} levels, {} waves",
            params.max_levels,
            waves.len()
        );
        Self { waves }
    }

    /// Wrap a hand-built wave list
    pub fn from_waves(waves: Vec<WaveDescriptor>) -> Self {
        Self { waves }
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WaveDescriptor> {
        self.waves.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaveDescriptor> {
        self.waves.iter()
    }

    /// True when no later wave belongs to the same level
    pub fn is_last_wave_of_level(&self, index: usize) -> bool {
        match (self.waves.get(index), self.waves.get(index + 1)) {
            (Some(current), Some(next)) => next.level_number != current.level_number,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Wave to resume at after the level containing `index` was finished.
    ///
    /// Prefers a later wave of the same level (should not exist once a level
    /// is done), then the first wave of the next level. `None` means the game
    /// has been won.
    pub fn next_after_level(&self, index: usize) -> Option<usize> {
        let level = self.waves.get(index)?.level_number;
        self.waves
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, w)| {
                w.level_number == level || (w.level_number == level + 1 && w.wave_in_level == 1)
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_level_without_boss() {
        let schedule = LevelSchedule::generate_with(ScheduleParams {
            max_levels: 1,
            waves_per_regular_level: WAVES_PER_REGULAR_LEVEL,
            boss_level_interval: 5,
        });

        assert_eq!(schedule.len(), 2);
        let first = schedule.get(0).unwrap();
        let second = schedule.get(1).unwrap();
        assert!(!first.is_boss_wave && !second.is_boss_wave);
        assert!(second.total_enemies() >= first.total_enemies());
        assert_eq!(first.total_enemies(), 3);
        assert_eq!(second.total_enemies(), 6);
    }

    #[test]
    fn test_default_schedule_shape() {
        let schedule = LevelSchedule::generate();
        // 8 regular levels x 2 + 2 boss levels x 3
        assert_eq!(schedule.len(), 22);

        let boss_waves: Vec<_> = schedule.iter().filter(|w| w.is_boss_wave).collect();
        assert_eq!(boss_waves.len(), 2);
        assert_eq!(boss_waves[0].level_number, 5);
        assert_eq!(boss_waves[0].wave_in_level, 3);
        assert_eq!(boss_waves[0].boss_kind, Some(EnemyKind::Taco));
        assert!(boss_waves[0].enemy_composition.is_empty());
        assert_eq!(boss_waves[1].level_number, 10);

        let last = schedule.get(schedule.len() - 1).unwrap();
        assert_eq!(last.global_wave_number, 22);
    }

    #[test]
    fn test_kind_unlock_preserves_order() {
        assert_eq!(available_kinds(1), &[EnemyKind::HotDog]);
        assert_eq!(available_kinds(2), &[EnemyKind::HotDog, EnemyKind::FrenchFries]);
        assert_eq!(available_kinds(6), &ROSTER[..]);
        assert_eq!(available_kinds(40), &ROSTER[..]);
    }

    #[test]
    fn test_remainder_goes_to_first_kind() {
        // wave 5: 3 kinds, total (2+1)*3 + 1 = 10 -> 4/3/3
        let comp = regular_composition(5, 1);
        let counts: Vec<u32> = comp.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![4, 3, 3]);
        assert_eq!(comp[0].kind, EnemyKind::HotDog);
    }

    #[test]
    fn test_next_after_level_moves_to_next_level_start() {
        let schedule = LevelSchedule::generate();
        // index 1 = level 1 wave 2 (last of level 1)
        assert!(schedule.is_last_wave_of_level(1));
        assert!(!schedule.is_last_wave_of_level(0));
        let next = schedule.next_after_level(1).unwrap();
        assert_eq!(next, 2);
        assert_eq!(schedule.get(next).unwrap().level_number, 2);
        assert_eq!(schedule.get(next).unwrap().wave_in_level, 1);

        assert_eq!(schedule.next_after_level(schedule.len() - 1), None);
    }

    proptest! {
        #[test]
        fn prop_boss_waves_only_end_boss_levels(
            max_levels in 1u32..16,
            per_level in 1u32..5,
            interval in 1u32..8,
        ) {
            let params = ScheduleParams {
                max_levels,
                waves_per_regular_level: per_level,
                boss_level_interval: interval,
            };
            let schedule = LevelSchedule::generate_with(params);

            for (i, wave) in schedule.iter().enumerate() {
                let last_of_level = schedule.is_last_wave_of_level(i);
                let boss_level = wave.level_number % interval == 0;
                prop_assert_eq!(wave.is_boss_wave, last_of_level && boss_level);
                if wave.is_boss_wave {
                    prop_assert!(wave.enemy_composition.is_empty());
                } else {
                    prop_assert!(wave.total_enemies() > 0);
                    prop_assert!(wave.enemy_composition.iter().all(|e| e.count > 0));
                }
            }
        }

        #[test]
        fn prop_wave_in_level_is_one_based_and_resets(
            max_levels in 1u32..16,
            per_level in 1u32..5,
            interval in 1u32..8,
        ) {
            let schedule = LevelSchedule::generate_with(ScheduleParams {
                max_levels,
                waves_per_regular_level: per_level,
                boss_level_interval: interval,
            });
            let mut prev: Option<&WaveDescriptor> = None;
            for wave in schedule.iter() {
                match prev {
                    Some(p) if p.level_number == wave.level_number => {
                        prop_assert_eq!(wave.wave_in_level, p.wave_in_level + 1);
                    }
                    Some(p) => {
                        prop_assert_eq!(wave.level_number, p.level_number + 1);
                        prop_assert_eq!(wave.wave_in_level, 1);
                    }
                    None => prop_assert_eq!(wave.wave_in_level, 1),
                }
                if let Some(p) = prev {
                    prop_assert_eq!(wave.global_wave_number, p.global_wave_number + 1);
                }
                prev = Some(wave);
            }
        }

        #[test]
        fn prop_spawn_interval_bounded_and_non_increasing(max_levels in 1u32..30) {
            let schedule = LevelSchedule::generate_with(ScheduleParams {
                max_levels,
                ..ScheduleParams::default()
            });
            let mut last = f32::INFINITY;
            for wave in schedule.iter() {
                prop_assert!(wave.spawn_interval >= MIN_SPAWN_INTERVAL);
                prop_assert!(wave.spawn_interval <= MAX_SPAWN_INTERVAL);
                prop_assert!(wave.spawn_interval <= last);
                last = wave.spawn_interval;
            }
        }
    }
}

//! Enemy roster and behaviours
//!
//! One `Enemy` type covers every kind. Regular kinds just fall; the boss
//! carries its patrol and attack timers in `EnemyBehavior::Boss`, and the
//! update dispatches on that.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Field};

/// Boss attack cadence before HP scaling (seconds)
pub const BOSS_BASE_SHOOT_INTERVAL: f32 = 2.0;
/// Fastest the boss will ever fire (seconds)
pub const BOSS_MIN_SHOOT_INTERVAL: f32 = 0.5;
/// Fraction of the field kept clear on each side of the boss patrol
const BOSS_PATROL_MARGIN: f32 = 0.1;
/// Patrol band (target heights)
const BOSS_MIN_Y: f32 = 80.0;
const BOSS_MAX_Y: f32 = 140.0;
const BOSS_START_Y: f32 = 100.0;
/// Vertical easing rate (~10% of the gap per 60 Hz frame)
const BOSS_EASE_RATE: f32 = 6.0;

/// Enemy kinds. Regular kinds are listed in introduction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    HotDog,
    FrenchFries,
    Donut,
    Hamburger,
    /// Boss
    Taco,
}

/// Regular kinds, easiest first
pub static ROSTER: [EnemyKind; 4] = [
    EnemyKind::HotDog,
    EnemyKind::FrenchFries,
    EnemyKind::Donut,
    EnemyKind::Hamburger,
];

/// How an enemy moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Straight down, gone past the bottom edge
    Fall,
    /// Straight down, reappears above the top edge
    FallWrap,
    /// Boss patrol near the top
    Patrol,
}

/// Static per-kind numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub size: Vec2,
    pub hp: f32,
    /// Pixels per second
    pub speed: f32,
    pub score: u64,
    pub movement: MovementPattern,
}

impl EnemyKind {
    pub fn profile(&self) -> EnemyProfile {
        let (w, h, hp, speed, score, movement) = match self {
            EnemyKind::HotDog => (50.0, 50.0, 1.0, 100.0, 10, MovementPattern::Fall),
            EnemyKind::FrenchFries => (40.0, 50.0, 2.0, 120.0, 20, MovementPattern::Fall),
            EnemyKind::Donut => (50.0, 50.0, 3.0, 80.0, 30, MovementPattern::FallWrap),
            EnemyKind::Hamburger => (60.0, 55.0, 5.0, 60.0, 50, MovementPattern::Fall),
            EnemyKind::Taco => (80.0, 65.0, 50.0, 150.0, 500, MovementPattern::Patrol),
        };
        EnemyProfile {
            size: Vec2::new(w, h),
            hp,
            speed,
            score,
            movement,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Taco)
    }

    pub fn image_name(&self) -> &'static str {
        match self {
            EnemyKind::HotDog => "hotdog",
            EnemyKind::FrenchFries => "frenchFries",
            EnemyKind::Donut => "donut",
            EnemyKind::Hamburger => "hamburger",
            EnemyKind::Taco => "taco",
        }
    }
}

/// Boss HP for a level: base plus one increment per boss tier already passed
pub fn boss_hp(level: u32, base: f32, increment: f32, boss_level_interval: u32) -> f32 {
    let tier = level.saturating_sub(1) / boss_level_interval.max(1);
    base + tier as f32 * increment
}

/// Seconds between boss shots; tougher bosses fire faster
pub fn boss_shoot_interval(max_hp: f32) -> f32 {
    let difficulty = ((max_hp - 50.0) / 50.0).floor().max(0.0);
    (BOSS_BASE_SHOOT_INTERVAL - difficulty * 0.2).max(BOSS_MIN_SHOOT_INTERVAL)
}

/// Boss-only movement and attack timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    /// +1 right, -1 left
    pub move_direction: f32,
    pub speed_multiplier: f32,
    pub target_y: f32,
    pub movement_change_timer: f32,
    pub vertical_timer: f32,
    pub shoot_timer: f32,
    /// Un-jittered cadence, fixed at spawn from max HP
    pub base_shoot_interval: f32,
}

/// Kind-specific runtime state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyBehavior {
    Grunt,
    Boss(BossState),
}

/// Where the boss wants to shoot from and at what angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossShot {
    pub origin: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    hp: f32,
    max_hp: f32,
    pub speed: f32,
    pub movement: MovementPattern,
    pub active: bool,
    pub behavior: EnemyBehavior,
}

fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

impl Enemy {
    /// A regular enemy with its kind's stats
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let profile = kind.profile();
        Self {
            id,
            kind,
            pos,
            size: profile.size,
            hp: profile.hp,
            max_hp: profile.hp,
            speed: profile.speed,
            movement: profile.movement,
            active: true,
            behavior: EnemyBehavior::Grunt,
        }
    }

    /// A boss with scaled HP, parked at its starting height
    pub fn boss(id: u32, kind: EnemyKind, x: f32, hp: f32, rng: &mut impl Rng) -> Self {
        let mut enemy = Self::new(id, kind, Vec2::new(x, BOSS_START_Y));
        enemy.hp = hp;
        enemy.max_hp = hp;
        enemy.movement = MovementPattern::Patrol;
        enemy.behavior = EnemyBehavior::Boss(BossState {
            move_direction: 1.0,
            speed_multiplier: 1.0,
            target_y: BOSS_START_Y,
            movement_change_timer: random_between(rng, 1.0, 3.0),
            vertical_timer: random_between(rng, 2.0, 4.0),
            shoot_timer: boss_shoot_interval(hp),
            base_shoot_interval: boss_shoot_interval(hp),
        });
        enemy
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.active && self.hp > 0.0
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Boss(_))
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Advance one step. A boss may return a shot aimed at `target`.
    pub fn update(
        &mut self,
        dt: f32,
        field: &Field,
        target: Vec2,
        rng: &mut impl Rng,
    ) -> Option<BossShot> {
        if !self.is_alive() {
            return None;
        }

        match &mut self.behavior {
            EnemyBehavior::Grunt => {
                self.pos.y += self.speed * dt;
                let half_h = self.size.y / 2.0;
                if self.pos.y > field.height + half_h {
                    match self.movement {
                        MovementPattern::FallWrap => self.pos.y = -half_h,
                        _ => self.active = false,
                    }
                }
                None
            }
            EnemyBehavior::Boss(boss) => {
                update_boss(boss, &mut self.pos, self.size, self.speed, dt, field, target, rng)
            }
        }
    }

    /// Apply damage, clamping at zero. Returns true on the hit that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        if self.hp <= 0.0 {
            self.active = false;
            log::debug!("{:?} #{} destroyed", self.kind, self.id);
            true
        } else {
            log::debug!(
                "{:?} #{} took {amount} damage, {}/{} HP left",
                self.kind,
                self.id,
                self.hp,
                self.max_hp
            );
            false
        }
    }

    /// Health fraction for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }
}

#[allow(clippy::too_many_arguments)]
fn update_boss(
    boss: &mut BossState,
    pos: &mut Vec2,
    size: Vec2,
    speed: f32,
    dt: f32,
    field: &Field,
    target: Vec2,
    rng: &mut impl Rng,
) -> Option<BossShot> {
    // Direction/speed changes
    boss.movement_change_timer -= dt;
    if boss.movement_change_timer <= 0.0 {
        if rng.random::<f32>() > 0.4 {
            boss.move_direction = -boss.move_direction;
        }
        boss.speed_multiplier = random_between(rng, 0.5, 1.25);
        boss.movement_change_timer = random_between(rng, 1.0, 3.0);
    }

    // New target height
    boss.vertical_timer -= dt;
    if boss.vertical_timer <= 0.0 {
        boss.target_y = random_between(rng, BOSS_MIN_Y, BOSS_MAX_Y);
        boss.vertical_timer = random_between(rng, 2.0, 4.0);
    }

    // Horizontal patrol inside the side margins
    pos.x += boss.move_direction * speed * boss.speed_multiplier * dt;
    let margin = field.width * BOSS_PATROL_MARGIN;
    let left = size.x / 2.0 + margin;
    let right = (field.width - size.x / 2.0 - margin).max(left);
    if boss.move_direction > 0.0 && pos.x >= right {
        pos.x = right;
        boss.move_direction = -1.0;
    } else if boss.move_direction < 0.0 && pos.x <= left {
        pos.x = left;
        boss.move_direction = 1.0;
    }

    // Ease toward the target height
    let gap = boss.target_y - pos.y;
    if gap.abs() > 1.0 {
        pos.y += gap * (BOSS_EASE_RATE * dt).min(1.0);
    }

    // Aimed fire with +-20% jitter on the interval
    boss.shoot_timer -= dt;
    if boss.shoot_timer > 0.0 {
        return None;
    }
    let origin = Vec2::new(pos.x, pos.y + size.y / 2.0);
    boss.shoot_timer = boss.base_shoot_interval * random_between(rng, 0.8, 1.2);
    Some(BossShot {
        origin,
        angle: crate::angle_between(origin, target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(480.0, 800.0)
    }

    #[test]
    fn test_grunt_falls_and_leaves() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(1, EnemyKind::HotDog, Vec2::new(100.0, -50.0));
        e.update(1.0, &field(), Vec2::ZERO, &mut rng);
        assert_eq!(e.pos.y, 50.0);
        assert!(e.active);

        e.pos.y = 820.0;
        e.update(0.1, &field(), Vec2::ZERO, &mut rng);
        assert!(!e.active);
    }

    #[test]
    fn test_donut_wraps_to_top() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(1, EnemyKind::Donut, Vec2::new(100.0, 824.0));
        e.update(0.1, &field(), Vec2::ZERO, &mut rng);
        assert!(e.active);
        assert_eq!(e.pos.y, -25.0);
    }

    #[test]
    fn test_take_damage_kills_once() {
        let mut e = Enemy::new(1, EnemyKind::FrenchFries, Vec2::ZERO);
        assert!(!e.take_damage(1.0));
        assert_eq!(e.hp(), 1.0);
        assert!(e.take_damage(5.0));
        assert_eq!(e.hp(), 0.0);
        assert!(!e.active);
        assert!(!e.take_damage(1.0));
    }

    #[test]
    fn test_boss_hp_scaling() {
        assert_eq!(boss_hp(5, 50.0, 25.0, 5), 50.0);
        assert_eq!(boss_hp(10, 50.0, 25.0, 5), 75.0);
        assert_eq!(boss_hp(11, 50.0, 25.0, 5), 100.0);
        assert_eq!(boss_hp(1, 50.0, 25.0, 5), 50.0);
    }

    #[test]
    fn test_boss_shoot_interval_tightens_with_hp() {
        assert_eq!(boss_shoot_interval(50.0), 2.0);
        assert_eq!(boss_shoot_interval(75.0), 2.0);
        assert!((boss_shoot_interval(100.0) - 1.8).abs() < 1e-6);
        assert_eq!(boss_shoot_interval(10_000.0), BOSS_MIN_SHOOT_INTERVAL);
    }

    #[test]
    fn test_boss_stays_in_patrol_band_and_fires() {
        let mut rng = Pcg32::seed_from_u64(42);
        let field = field();
        let mut boss = Enemy::boss(1, EnemyKind::Taco, 240.0, 50.0, &mut rng);
        assert!(boss.is_boss());
        let target = Vec2::new(240.0, 740.0);

        let mut shots = 0;
        for _ in 0..(60 * 20) {
            if let Some(shot) = boss.update(1.0 / 60.0, &field, target, &mut rng) {
                shots += 1;
                // Aimed downward at the player
                assert!(shot.angle > 0.0 && shot.angle < std::f32::consts::PI);
            }
            let margin = field.width * 0.1 + boss.size.x / 2.0;
            assert!(boss.pos.x >= margin - 1e-3);
            assert!(boss.pos.x <= field.width - margin + 1e-3);
            assert!(boss.pos.y >= BOSS_MIN_Y - 25.0 && boss.pos.y <= BOSS_MAX_Y + 5.0);
        }
        // ~2s cadence with jitter over 20s
        assert!((8..=14).contains(&shots), "unexpected shot count {shots}");
    }

    proptest! {
        #[test]
        fn prop_boss_hp_non_decreasing(level in 1u32..200, interval in 1u32..10) {
            prop_assert!(boss_hp(level + 1, 50.0, 25.0, interval) >= boss_hp(level, 50.0, 25.0, interval));
        }
    }
}

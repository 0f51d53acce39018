//! The player's pizza slice
//!
//! Stats come in two layers: the *base* stats (permanent upgrades with the
//! current variant's bonuses folded in) and the *effective* stats (base with
//! any running temporary boost applied). Boost expiry is an absolute
//! timestamp on the player's own simulated clock, so pausing the simulation
//! pauses the boost too.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Field};
use super::projectile::{Projectile, ProjectileOwner};
use super::state::SessionPhase;
use super::tick::TickInput;
use crate::UP;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::tuning::Tuning;

/// Spread between shots of a multi-shot volley (radians)
const VOLLEY_SPREAD: f32 = 0.2;

/// Stats the upgrade screen can raise permanently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    FireRate,
    ProjectileDamage,
    MaxHp,
}

impl Stat {
    /// The three choices offered between levels, in display order
    pub const ALL: [Stat; 3] = [Stat::FireRate, Stat::ProjectileDamage, Stat::MaxHp];

    pub fn label(&self) -> &'static str {
        match self {
            Stat::FireRate => "Upgrade Fire Rate",
            Stat::ProjectileDamage => "Upgrade Damage",
            Stat::MaxHp => "Upgrade Max HP",
        }
    }
}

/// Stats a timed pickup can boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostStat {
    FireRate,
    Damage,
}

/// Fire rate (shots/s), damage per projectile, max HP
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub fire_rate: f32,
    pub projectile_damage: f32,
    pub max_hp: f32,
}

/// Cosmetic variant with a permanent perk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PizzaVariant {
    #[default]
    Cheese,
    /// +15% fire rate
    Pepperoni,
    /// +20% max HP
    Veggie,
    /// Chance of double damage per shot
    Hawaiian,
    /// Three-way spread
    Supreme,
}

impl PizzaVariant {
    pub const ALL: [PizzaVariant; 5] = [
        PizzaVariant::Cheese,
        PizzaVariant::Pepperoni,
        PizzaVariant::Veggie,
        PizzaVariant::Hawaiian,
        PizzaVariant::Supreme,
    ];

    pub fn fire_rate_multiplier(&self) -> f32 {
        match self {
            PizzaVariant::Pepperoni => 1.15,
            _ => 1.0,
        }
    }

    pub fn max_hp_multiplier(&self) -> f32 {
        match self {
            PizzaVariant::Veggie => 1.2,
            _ => 1.0,
        }
    }

    /// Probability that a shot deals double damage
    pub fn bonus_damage_chance(&self) -> f32 {
        match self {
            PizzaVariant::Hawaiian => 0.25,
            _ => 0.0,
        }
    }

    pub fn shots_per_volley(&self) -> u32 {
        match self {
            PizzaVariant::Supreme => 3,
            _ => 1,
        }
    }

    pub fn image_name(&self) -> &'static str {
        match self {
            PizzaVariant::Cheese => "pizza-cheese",
            PizzaVariant::Pepperoni => "pizza-pepperoni",
            PizzaVariant::Veggie => "pizza-veggie",
            PizzaVariant::Hawaiian => "pizza-hawaiian",
            PizzaVariant::Supreme => "pizza-supreme",
        }
    }

    /// Pick a variant other than `current`
    pub fn random_other(current: PizzaVariant, rng: &mut impl Rng) -> PizzaVariant {
        let others: Vec<PizzaVariant> = Self::ALL.into_iter().filter(|v| *v != current).collect();
        others[rng.random_range(0..others.len())]
    }
}

/// Player-relevant slice of the tuning, copied in at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerParams {
    pub base: PlayerStats,
    pub upgrade_steps: PlayerStats,
    pub boost_multiplier: f32,
    pub boost_duration: f32,
    pub heal_amount: f32,
    pub projectile_speed: f32,
}

impl From<&Tuning> for PlayerParams {
    fn from(tuning: &Tuning) -> Self {
        Self {
            base: PlayerStats {
                fire_rate: tuning.player_fire_rate,
                projectile_damage: tuning.player_damage,
                max_hp: tuning.player_max_hp,
            },
            upgrade_steps: PlayerStats {
                fire_rate: tuning.upgrade_fire_rate_step,
                projectile_damage: tuning.upgrade_damage_step,
                max_hp: tuning.upgrade_max_hp_step,
            },
            boost_multiplier: tuning.boost_multiplier,
            boost_duration: tuning.boost_duration,
            heal_amount: tuning.health_pickup_amount,
            projectile_speed: tuning.projectile_speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    hp: f32,
    /// Permanently upgraded stats, before variant bonuses
    upgraded: PlayerStats,
    variant: PizzaVariant,
    /// Simulated seconds this player has been updated for
    clock: f32,
    fire_rate_boost_until: f32,
    damage_boost_until: f32,
    fire_cooldown: f32,
    params: PlayerParams,
}

impl Player {
    pub fn new(params: PlayerParams, pos: Vec2) -> Self {
        let mut player = Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            hp: 0.0,
            upgraded: params.base,
            variant: PizzaVariant::default(),
            clock: 0.0,
            fire_rate_boost_until: 0.0,
            damage_boost_until: 0.0,
            fire_cooldown: 0.0,
            params,
        };
        player.hp = player.max_hp();
        player
    }

    pub fn params(&self) -> &PlayerParams {
        &self.params
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn variant(&self) -> PizzaVariant {
        self.variant
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Upgraded stats with the variant's permanent bonuses
    pub fn base_stats(&self) -> PlayerStats {
        PlayerStats {
            fire_rate: self.upgraded.fire_rate * self.variant.fire_rate_multiplier(),
            projectile_damage: self.upgraded.projectile_damage,
            max_hp: (self.upgraded.max_hp * self.variant.max_hp_multiplier())
                .round()
                .max(1.0),
        }
    }

    /// Base stats with running boosts applied
    pub fn effective_stats(&self) -> PlayerStats {
        let base = self.base_stats();
        let boost = |active: bool| if active { self.params.boost_multiplier } else { 1.0 };
        PlayerStats {
            fire_rate: base.fire_rate * boost(self.is_boost_active(BoostStat::FireRate)),
            projectile_damage: base.projectile_damage
                * boost(self.is_boost_active(BoostStat::Damage)),
            max_hp: base.max_hp,
        }
    }

    pub fn max_hp(&self) -> f32 {
        self.base_stats().max_hp
    }

    pub fn is_boost_active(&self, stat: BoostStat) -> bool {
        let until = match stat {
            BoostStat::FireRate => self.fire_rate_boost_until,
            BoostStat::Damage => self.damage_boost_until,
        };
        self.clock < until
    }

    /// Seconds left on a boost (0 when inactive)
    pub fn boost_remaining(&self, stat: BoostStat) -> f32 {
        let until = match stat {
            BoostStat::FireRate => self.fire_rate_boost_until,
            BoostStat::Damage => self.damage_boost_until,
        };
        (until - self.clock).max(0.0)
    }

    /// Follow the pointer, advance timers, and fire when allowed.
    ///
    /// Returns the projectiles fired this update (empty most of the time).
    pub fn update(
        &mut self,
        dt: f32,
        phase: SessionPhase,
        input: &TickInput,
        field: &Field,
        rng: &mut impl Rng,
    ) -> Vec<Projectile> {
        self.clock += dt;

        if let Some(target) = input.pointer {
            self.pos = field.clamp_box(target, self.size);
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if phase != SessionPhase::Running || !input.pressed || self.fire_cooldown > 0.0 {
            return Vec::new();
        }

        let stats = self.effective_stats();
        self.fire_cooldown = 1.0 / stats.fire_rate;
        self.shoot(stats.projectile_damage, rng)
    }

    fn shoot(&self, damage: f32, rng: &mut impl Rng) -> Vec<Projectile> {
        let muzzle = Vec2::new(self.pos.x, self.pos.y - self.size.y / 2.0);
        let shots = self.variant.shots_per_volley();
        let bonus_chance = self.variant.bonus_damage_chance();

        (0..shots)
            .map(|i| {
                let offset = (i as f32 - (shots - 1) as f32 / 2.0) * VOLLEY_SPREAD;
                let crit = bonus_chance > 0.0 && rng.random::<f32>() < bonus_chance;
                let damage = if crit { damage * 2.0 } else { damage };
                Projectile::new(
                    muzzle,
                    UP + offset,
                    self.params.projectile_speed,
                    damage,
                    ProjectileOwner::Player,
                )
            })
            .collect()
    }

    /// Apply damage, clamping at zero. Returns true on the hit that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        log::debug!("Player took {amount} damage, {}/{} HP left", self.hp, self.max_hp());
        !self.is_alive()
    }

    /// Restore HP up to the max. The dead stay dead.
    pub fn heal(&mut self, amount: f32) {
        if !self.is_alive() {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp());
    }

    /// Permanent upgrade from the between-level screen
    pub fn upgrade_stat(&mut self, stat: Stat) {
        let steps = self.params.upgrade_steps;
        match stat {
            Stat::FireRate => self.upgraded.fire_rate += steps.fire_rate,
            Stat::ProjectileDamage => self.upgraded.projectile_damage += steps.projectile_damage,
            Stat::MaxHp => {
                self.upgraded.max_hp += steps.max_hp;
                self.hp = (self.hp + steps.max_hp).min(self.max_hp());
            }
        }
        log::info!("Upgraded {stat:?}: {:?}", self.base_stats());
    }

    /// Swap variant. Boost timers are left alone; a higher max HP heals the
    /// difference, a lower one clamps.
    pub fn change_variant(&mut self, variant: PizzaVariant) {
        let old_max = self.max_hp();
        self.variant = variant;
        let new_max = self.max_hp();
        if new_max > old_max {
            self.hp += new_max - old_max;
        }
        self.hp = self.hp.min(new_max);
        log::info!("Pizza variant is now {variant:?} (max HP {new_max})");
    }

    /// Multiply a stat for `duration` simulated seconds. Re-activating
    /// never shortens a running boost.
    pub fn activate_temporary_boost(&mut self, stat: BoostStat, duration: f32) {
        let until = self.clock + duration.max(0.0);
        let slot = match stat {
            BoostStat::FireRate => &mut self.fire_rate_boost_until,
            BoostStat::Damage => &mut self.damage_boost_until,
        };
        *slot = slot.max(until);
        log::debug!("{stat:?} boost active for {duration}s");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(PlayerParams::from(&Tuning::default()), Vec2::new(240.0, 740.0))
    }

    fn firing() -> TickInput {
        TickInput {
            pointer: None,
            pressed: true,
        }
    }

    #[test]
    fn test_damage_clamps_at_zero_once() {
        let mut p = player();
        assert_eq!(p.hp(), 5.0);
        assert!(p.take_damage(7.0));
        assert_eq!(p.hp(), 0.0);
        assert!(!p.take_damage(1.0));
        assert_eq!(p.hp(), 0.0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut p = player();
        p.take_damage(2.0);
        p.heal(10.0);
        assert_eq!(p.hp(), 5.0);
    }

    #[test]
    fn test_max_hp_upgrade_heals_one() {
        let mut p = player();
        p.take_damage(2.0);
        p.upgrade_stat(Stat::MaxHp);
        assert_eq!(p.max_hp(), 6.0);
        assert_eq!(p.hp(), 4.0);

        let mut full = player();
        full.upgrade_stat(Stat::MaxHp);
        assert_eq!(full.hp(), 6.0);
    }

    #[test]
    fn test_boost_expires_on_simulated_time() {
        let mut p = player();
        let field = Field::new(480.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let idle = TickInput::default();

        p.activate_temporary_boost(BoostStat::FireRate, 10.0);
        assert!((p.effective_stats().fire_rate - 1.5).abs() < 1e-6);
        assert_eq!(p.effective_stats().projectile_damage, 1.0);

        for _ in 0..19 {
            p.update(0.5, SessionPhase::Running, &idle, &field, &mut rng);
        }
        assert!(p.is_boost_active(BoostStat::FireRate));

        p.update(0.5, SessionPhase::Running, &idle, &field, &mut rng);
        assert!(!p.is_boost_active(BoostStat::FireRate));
        assert_eq!(p.effective_stats().fire_rate, 1.0);
    }

    #[test]
    fn test_boost_paused_while_not_updated() {
        let mut p = player();
        p.activate_temporary_boost(BoostStat::Damage, 2.0);
        // No updates happen while the session sits on the upgrade screen
        assert!(p.is_boost_active(BoostStat::Damage));
        assert_eq!(p.boost_remaining(BoostStat::Damage), 2.0);
    }

    #[test]
    fn test_variant_change_keeps_boosts() {
        let mut p = player();
        p.activate_temporary_boost(BoostStat::FireRate, 10.0);
        p.change_variant(PizzaVariant::Pepperoni);
        assert!(p.is_boost_active(BoostStat::FireRate));
        assert!((p.effective_stats().fire_rate - 1.15 * 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_veggie_raises_max_hp() {
        let mut p = player();
        p.take_damage(1.0);
        p.change_variant(PizzaVariant::Veggie);
        assert_eq!(p.max_hp(), 6.0);
        assert_eq!(p.hp(), 5.0);

        p.change_variant(PizzaVariant::Cheese);
        assert_eq!(p.max_hp(), 5.0);
        assert_eq!(p.hp(), 5.0);
    }

    #[test]
    fn test_fires_only_when_pressed_and_running() {
        let mut p = player();
        let field = Field::new(480.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(7);

        let shots = p.update(0.016, SessionPhase::DisplayWaveStart, &firing(), &field, &mut rng);
        assert!(shots.is_empty());
        let shots = p.update(0.016, SessionPhase::Running, &TickInput::default(), &field, &mut rng);
        assert!(shots.is_empty());

        let shots = p.update(0.016, SessionPhase::Running, &firing(), &field, &mut rng);
        assert_eq!(shots.len(), 1);
        assert!(shots[0].is_player_owned());

        // Cooldown of 1 / fire_rate = 1s
        let shots = p.update(0.5, SessionPhase::Running, &firing(), &field, &mut rng);
        assert!(shots.is_empty());
        let shots = p.update(0.5, SessionPhase::Running, &firing(), &field, &mut rng);
        assert_eq!(shots.len(), 1);
    }

    #[test]
    fn test_supreme_fires_spread() {
        let mut p = player();
        p.change_variant(PizzaVariant::Supreme);
        let field = Field::new(480.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let shots = p.update(0.016, SessionPhase::Running, &firing(), &field, &mut rng);
        assert_eq!(shots.len(), 3);
        assert!(shots[0].angle < shots[1].angle && shots[1].angle < shots[2].angle);
        assert!((shots[1].angle - UP).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_is_clamped_to_field() {
        let mut p = player();
        let field = Field::new(480.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let input = TickInput {
            pointer: Some(Vec2::new(-100.0, 2000.0)),
            pressed: false,
        };
        p.update(0.016, SessionPhase::Running, &input, &field, &mut rng);
        assert_eq!(p.pos, Vec2::new(PLAYER_WIDTH / 2.0, 800.0 - PLAYER_HEIGHT / 2.0));
    }

    #[test]
    fn test_random_other_variant_differs() {
        let mut rng = Pcg32::seed_from_u64(3);
        for variant in PizzaVariant::ALL {
            for _ in 0..20 {
                assert_ne!(PizzaVariant::random_other(variant, &mut rng), variant);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_hp_stays_in_range(hits in proptest::collection::vec((0.0f32..10.0, any::<bool>()), 0..40)) {
            let mut p = player();
            let mut deaths = 0;
            for (amount, is_heal) in hits {
                if is_heal {
                    p.heal(amount);
                } else if p.take_damage(amount) {
                    deaths += 1;
                }
                prop_assert!(p.hp() >= 0.0);
                prop_assert!(p.hp() <= p.max_hp());
            }
            prop_assert!(deaths <= 1);
        }
    }
}

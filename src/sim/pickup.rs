//! Falling collectibles dropped by destroyed enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Field};
use super::player::{BoostStat, PizzaVariant, Player};
use crate::consts::PICKUP_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    /// Switch the player to the carried variant
    VariantChange(PizzaVariant),
    FireRateBoost,
    DamageBoost,
}

impl PickupKind {
    pub fn image_name(&self) -> &'static str {
        match self {
            PickupKind::Health => "item-health",
            PickupKind::VariantChange(_) => "powerup-pizzachange",
            PickupKind::FireRateBoost => "powerup-firerate",
            PickupKind::DamageBoost => "powerup-damage",
        }
    }
}

/// Drop odds for regular enemies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTable {
    pub health_chance: f32,
    pub boost_chance: f32,
}

/// Roll what a destroyed enemy leaves behind.
///
/// Regular enemies roll health and boost independently. A boss always
/// drops a variant change to something other than `current`.
pub fn roll_drops(
    is_boss: bool,
    table: &DropTable,
    current: PizzaVariant,
    rng: &mut impl Rng,
) -> Vec<PickupKind> {
    if is_boss {
        return vec![PickupKind::VariantChange(PizzaVariant::random_other(current, rng))];
    }

    let mut drops = Vec::new();
    if rng.random::<f32>() < table.health_chance {
        drops.push(PickupKind::Health);
    }
    if rng.random::<f32>() < table.boost_chance {
        drops.push(if rng.random_bool(0.5) {
            PickupKind::FireRateBoost
        } else {
            PickupKind::DamageBoost
        });
    }
    drops
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    /// Fall speed, pixels per second
    pub speed: f32,
    pub active: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            speed,
            active: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PICKUP_SIZE))
    }

    pub fn update(&mut self, dt: f32, field: &Field) {
        if !self.active {
            return;
        }
        self.pos.y += self.speed * dt;
        if self.pos.y > field.height + PICKUP_SIZE / 2.0 {
            self.active = false;
        }
    }

    /// Hand the effect to the player and use the pickup up
    pub fn collect(&mut self, player: &mut Player) {
        if !self.active {
            return;
        }
        self.active = false;

        let params = *player.params();
        match self.kind {
            PickupKind::Health => player.heal(params.heal_amount),
            PickupKind::VariantChange(variant) => player.change_variant(variant),
            PickupKind::FireRateBoost => {
                player.activate_temporary_boost(BoostStat::FireRate, params.boost_duration)
            }
            PickupKind::DamageBoost => {
                player.activate_temporary_boost(BoostStat::Damage, params.boost_duration)
            }
        }
        log::debug!("Collected {:?}", self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerParams;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(PlayerParams::from(&Tuning::default()), Vec2::new(240.0, 740.0))
    }

    #[test]
    fn test_falls_and_leaves() {
        let field = Field::new(480.0, 800.0);
        let mut p = Pickup::new(1, PickupKind::Health, Vec2::new(10.0, 700.0), 80.0);
        p.update(1.0, &field);
        assert_eq!(p.pos.y, 780.0);
        assert!(p.active);
        p.update(1.0, &field);
        assert!(!p.active);
    }

    #[test]
    fn test_collect_dispatches_by_kind() {
        let mut player = player();
        player.take_damage(2.0);

        let mut health = Pickup::new(1, PickupKind::Health, Vec2::ZERO, 80.0);
        health.collect(&mut player);
        assert_eq!(player.hp(), 4.0);
        assert!(!health.active);

        // Spent pickups do nothing
        health.collect(&mut player);
        assert_eq!(player.hp(), 4.0);

        let mut boost = Pickup::new(2, PickupKind::DamageBoost, Vec2::ZERO, 80.0);
        boost.collect(&mut player);
        assert!(player.is_boost_active(BoostStat::Damage));
        assert!(!player.is_boost_active(BoostStat::FireRate));

        let mut swap = Pickup::new(3, PickupKind::VariantChange(PizzaVariant::Supreme), Vec2::ZERO, 80.0);
        swap.collect(&mut player);
        assert_eq!(player.variant(), PizzaVariant::Supreme);
    }

    #[test]
    fn test_boss_always_drops_variant_change() {
        let mut rng = Pcg32::seed_from_u64(9);
        let table = DropTable {
            health_chance: 0.0,
            boost_chance: 0.0,
        };
        for _ in 0..50 {
            let drops = roll_drops(true, &table, PizzaVariant::Cheese, &mut rng);
            assert_eq!(drops.len(), 1);
            assert!(matches!(drops[0], PickupKind::VariantChange(v) if v != PizzaVariant::Cheese));
        }
    }

    #[test]
    fn test_regular_drop_rates() {
        let mut rng = Pcg32::seed_from_u64(11);
        let never = DropTable {
            health_chance: 0.0,
            boost_chance: 0.0,
        };
        assert!(roll_drops(false, &never, PizzaVariant::Cheese, &mut rng).is_empty());

        let always = DropTable {
            health_chance: 1.0,
            boost_chance: 1.0,
        };
        let drops = roll_drops(false, &always, PizzaVariant::Cheese, &mut rng);
        assert_eq!(drops.len(), 2);
        assert_eq!(drops[0], PickupKind::Health);
        assert!(matches!(drops[1], PickupKind::FireRateBoost | PickupKind::DamageBoost));

        let table = DropTable {
            health_chance: 0.05,
            boost_chance: 0.02,
        };
        let health = (0..10_000)
            .flat_map(|_| roll_drops(false, &table, PizzaVariant::Cheese, &mut rng))
            .filter(|d| *d == PickupKind::Health)
            .count();
        assert!((350..650).contains(&health), "health drops {health}");
    }
}

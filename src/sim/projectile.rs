//! Straight-line projectiles fired by the player and the boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Field};
use crate::consts::PROJECTILE_SIZE;
use crate::direction;

/// Who fired a projectile; decides which targets it can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Travel direction in radians (screen space, +y down)
    pub angle: f32,
    /// Pixels per second
    pub speed: f32,
    pub damage: f32,
    pub owner: ProjectileOwner,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, speed: f32, damage: f32, owner: ProjectileOwner) -> Self {
        Self {
            pos,
            angle,
            speed,
            damage,
            owner,
            active: true,
        }
    }

    pub fn is_player_owned(&self) -> bool {
        self.owner == ProjectileOwner::Player
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    /// Move along the stored angle; leaves the field -> inactive
    pub fn update(&mut self, dt: f32, field: &Field) {
        if !self.active {
            return;
        }
        self.pos += direction(self.angle) * self.speed * dt;

        let margin = PROJECTILE_SIZE / 2.0;
        if !field.contains_with_margin(self.pos, margin) {
            self.active = false;
        }
    }

    /// A hit uses the projectile up
    pub fn consume(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UP;

    #[test]
    fn test_player_shot_travels_up() {
        let field = Field::new(480.0, 800.0);
        let mut shot = Projectile::new(Vec2::new(240.0, 700.0), UP, 400.0, 1.0, ProjectileOwner::Player);
        shot.update(0.5, &field);
        assert!(shot.active);
        assert!((shot.pos.y - 500.0).abs() < 0.01);
        assert!((shot.pos.x - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_deactivates_off_top() {
        let field = Field::new(480.0, 800.0);
        let mut shot = Projectile::new(Vec2::new(240.0, 10.0), UP, 400.0, 1.0, ProjectileOwner::Player);
        shot.update(0.1, &field);
        assert!(!shot.active);

        // Stays put once inactive
        let pos = shot.pos;
        shot.update(0.1, &field);
        assert_eq!(shot.pos, pos);
    }

    #[test]
    fn test_aimed_enemy_shot() {
        let field = Field::new(480.0, 800.0);
        let from = Vec2::new(100.0, 100.0);
        let to = Vec2::new(400.0, 500.0);
        let mut shot = Projectile::new(from, crate::angle_between(from, to), 500.0, 1.0, ProjectileOwner::Enemy);
        shot.update(1.0, &field);
        assert!((shot.pos - to).length() < 0.1);
        assert!(!shot.is_player_owned());
    }
}

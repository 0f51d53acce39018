//! Axis-aligned overlap tests and damage resolution
//!
//! Everything in the arena is a box defined by its center and size. The
//! resolver runs once per running tick after all entities have moved and
//! makes four independent passes. A projectile is deactivated the moment it
//! hits, so it can never damage twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::pickup::{Pickup, PickupKind};
use super::player::Player;
use super::projectile::Projectile;

/// Axis-aligned box from a center point and full width/height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// Strict overlap on both axes; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// The play field: origin top-left, +y down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Inside the field, allowing `margin` past every edge
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Clamp a box center so the whole box stays inside the field
    pub fn clamp_box(&self, center: Vec2, size: Vec2) -> Vec2 {
        let half = size / 2.0;
        let max = Vec2::new(self.width, self.height) - half;
        Vec2::new(
            center.x.clamp(half.x, max.x.max(half.x)),
            center.y.clamp(half.y, max.y.max(half.y)),
        )
    }
}

/// Fixed damages for body contact between an enemy and the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDamage {
    /// What the enemy takes (large enough to destroy regular kinds)
    pub to_enemy: f32,
    /// What the player takes
    pub to_player: f32,
}

/// An enemy destroyed during resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub enemy_id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub was_boss: bool,
}

/// What happened during one resolver run
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Player projectiles that landed on an enemy
    pub enemy_hits: u32,
    pub kills: Vec<Kill>,
    /// Times the player was damaged (contact or projectile)
    pub player_hits: u32,
    pub collected: Vec<PickupKind>,
    /// True if the player's HP reached zero during this run
    pub player_killed: bool,
}

/// Run all four overlap passes.
pub fn resolve(
    player: &mut Player,
    enemies: &mut [Enemy],
    projectiles: &mut [Projectile],
    pickups: &mut [Pickup],
    contact: ContactDamage,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    player_shots_vs_enemies(enemies, projectiles, &mut report);
    enemies_vs_player(player, enemies, contact, &mut report);
    player_vs_pickups(player, pickups, &mut report);
    enemy_shots_vs_player(player, projectiles, &mut report);

    report
}

fn record_kill(enemy: &Enemy, report: &mut CollisionReport) {
    report.kills.push(Kill {
        enemy_id: enemy.id,
        kind: enemy.kind,
        pos: enemy.pos,
        was_boss: enemy.is_boss(),
    });
}

fn player_shots_vs_enemies(
    enemies: &mut [Enemy],
    projectiles: &mut [Projectile],
    report: &mut CollisionReport,
) {
    for shot in projectiles.iter_mut().filter(|p| p.active && p.is_player_owned()) {
        let shot_box = shot.aabb();
        for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
            if !shot_box.overlaps(&enemy.aabb()) {
                continue;
            }
            shot.consume();
            report.enemy_hits += 1;
            if enemy.take_damage(shot.damage) {
                record_kill(enemy, report);
            }
            break;
        }
    }
}

fn enemies_vs_player(
    player: &mut Player,
    enemies: &mut [Enemy],
    contact: ContactDamage,
    report: &mut CollisionReport,
) {
    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        if !player.is_alive() {
            return;
        }
        if !enemy.aabb().overlaps(&player.aabb()) {
            continue;
        }
        if enemy.take_damage(contact.to_enemy) {
            record_kill(enemy, report);
        }
        report.player_hits += 1;
        if player.take_damage(contact.to_player) {
            report.player_killed = true;
        }
    }
}

fn player_vs_pickups(player: &mut Player, pickups: &mut [Pickup], report: &mut CollisionReport) {
    if !player.is_alive() {
        return;
    }
    let player_box = player.aabb();
    for pickup in pickups.iter_mut().filter(|p| p.active) {
        if pickup.aabb().overlaps(&player_box) {
            pickup.collect(player);
            report.collected.push(pickup.kind);
        }
    }
}

fn enemy_shots_vs_player(
    player: &mut Player,
    projectiles: &mut [Projectile],
    report: &mut CollisionReport,
) {
    for shot in projectiles.iter_mut().filter(|p| p.active && !p.is_player_owned()) {
        if !player.is_alive() {
            return;
        }
        if !shot.aabb().overlaps(&player.aabb()) {
            continue;
        }
        shot.consume();
        report.player_hits += 1;
        if player.take_damage(shot.damage) {
            report.player_killed = true;
        }
    }
}

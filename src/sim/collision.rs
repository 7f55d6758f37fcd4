//! Collision detection and response
//!
//! Everything is a circle: ship, asteroids and projectiles are tested by
//! centre distance against the sum of their radii.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::state::{Asteroid, Projectile, Ship, clear_position};
use crate::consts::*;

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Asteroids that struck the ship (each costs a life)
    pub ship_hits: u32,
    /// Asteroids split in two by projectiles
    pub splits: u32,
    /// Asteroids destroyed outright by projectiles
    pub kills: u32,
}

impl CollisionReport {
    /// Projectile hits of any kind
    pub fn asteroid_hits(&self) -> u32 {
        self.splits + self.kills
    }
}

/// Strict overlap test: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Ship vs every asteroid
///
/// Each overlapping asteroid costs a life, deducts the hit penalty (floored at
/// zero) and is pushed back to a random spot instead of being destroyed.
pub fn resolve_ship_hits(
    ship: &mut Ship,
    asteroids: &mut [Asteroid],
    score: &mut u32,
    rng: &mut Pcg32,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    for asteroid in asteroids.iter_mut() {
        if !circles_overlap(ship.pos, ship.radius(), asteroid.pos, asteroid.size) {
            continue;
        }
        report.ship_hits += 1;
        ship.lives = ship.lives.saturating_sub(1);
        *score = score.saturating_sub(HIT_PENALTY);
        asteroid.pos = clear_position(rng, ship, asteroid.size, 0.0);
        log::debug!(
            "Ship hit by asteroid (size {}), lives left {}",
            asteroid.size,
            ship.lives
        );
    }
    report
}

/// Projectiles vs asteroids
///
/// A projectile is spent on the first asteroid it overlaps. Struck asteroids
/// above the split threshold become two half-size children; smaller ones are
/// removed. Children join the field after the pass, so they can only be hit
/// from the next tick on.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Projectile>,
    asteroids: &mut Vec<Asteroid>,
    score: &mut u32,
    rng: &mut Pcg32,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if projectiles.is_empty() || asteroids.is_empty() {
        return report;
    }

    let mut struck = vec![false; asteroids.len()];
    let mut children = Vec::new();

    projectiles.retain(|p| {
        let target = asteroids
            .iter()
            .enumerate()
            .find(|(i, a)| !struck[*i] && circles_overlap(p.pos, p.radius(), a.pos, a.size))
            .map(|(i, _)| i);

        let Some(i) = target else {
            return true;
        };

        struck[i] = true;
        *score = score.saturating_add(KILL_SCORE);
        let asteroid = &asteroids[i];
        if asteroid.can_split() {
            children.extend(asteroid.split(rng));
            report.splits += 1;
            log::debug!("Asteroid split at ({:.0}, {:.0})", asteroid.pos.x, asteroid.pos.y);
        } else {
            report.kills += 1;
            log::debug!("Asteroid destroyed at ({:.0}, {:.0})", asteroid.pos.x, asteroid.pos.y);
        }
        false
    });

    if report.asteroid_hits() > 0 {
        let mut index = 0;
        asteroids.retain(|_| {
            let keep = !struck[index];
            index += 1;
            keep
        });
        asteroids.extend(children);
    }

    report
}

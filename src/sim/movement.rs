//! Per-tick movement
//!
//! Arcade model: thrust sets the ship's displacement directly, there is no
//! momentum. The ship is clamped to the playfield, asteroids wrap, and
//! projectiles that leave are dropped.

use super::state::{Asteroid, Projectile, Ship};
use crate::consts::*;
use crate::heading;

/// Apply this tick's rotation sign and engine flag to the ship
pub fn steer_ship(ship: &mut Ship, rotating: i8, thrusting: bool) {
    ship.rotation += f32::from(rotating.signum()) * ROTATION_SPEED;
    ship.thrust = thrusting;
}

/// Advance the ship one tick, stopping at the playfield edge
pub fn move_ship(ship: &mut Ship) {
    if ship.thrust {
        ship.pos += heading(ship.rotation) * THRUST_SPEED;
    }
    ship.pos.x = ship.pos.x.clamp(0.0, PLAYFIELD_WIDTH);
    ship.pos.y = ship.pos.y.clamp(0.0, PLAYFIELD_HEIGHT);
}

/// Wrap a coordinate that crossed an edge to the opposite edge
#[inline]
fn wrap(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        max
    } else if value > max {
        0.0
    } else {
        value
    }
}

/// Drift every asteroid one tick with toroidal wraparound
pub fn move_asteroids(asteroids: &mut [Asteroid]) {
    for asteroid in asteroids {
        asteroid.pos += asteroid.vel;
        asteroid.pos.x = wrap(asteroid.pos.x, PLAYFIELD_WIDTH);
        asteroid.pos.y = wrap(asteroid.pos.y, PLAYFIELD_HEIGHT);
    }
}

/// Advance projectiles and drop those outside the open playfield rectangle
///
/// Returns how many were dropped.
pub fn move_projectiles(projectiles: &mut Vec<Projectile>) -> usize {
    let before = projectiles.len();
    projectiles.retain_mut(|p| {
        p.pos += heading(p.rotation) * p.speed;
        p.pos.x > 0.0 && p.pos.x < PLAYFIELD_WIDTH && p.pos.y > 0.0 && p.pos.y < PLAYFIELD_HEIGHT
    });
    before - projectiles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_thrust_moves_along_heading() {
        let mut ship = Ship::default();
        let start = ship.pos;
        steer_ship(&mut ship, 0, true);
        move_ship(&mut ship);
        assert!((ship.pos.x - start.x).abs() < 1e-4);
        assert!((ship.pos.y - (start.y - THRUST_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_no_thrust_no_drift() {
        let mut ship = Ship::default();
        let start = ship.pos;
        steer_ship(&mut ship, 1, false);
        move_ship(&mut ship);
        assert_eq!(ship.pos, start);
        assert!((ship.rotation - ROTATION_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_sign_is_normalized() {
        let mut ship = Ship::default();
        steer_ship(&mut ship, -5, false);
        assert!((ship.rotation + ROTATION_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_ship_stops_at_edge() {
        let mut ship = Ship {
            pos: Vec2::new(PLAYFIELD_WIDTH - 1.0, 100.0),
            rotation: FRAC_PI_2,
            thrust: true,
            ..Default::default()
        };
        move_ship(&mut ship);
        assert_eq!(ship.pos.x, PLAYFIELD_WIDTH);
        move_ship(&mut ship);
        assert_eq!(ship.pos.x, PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_asteroid_wraps_each_edge() {
        let mut asteroids = vec![
            Asteroid { pos: Vec2::new(0.5, 300.0), size: 50.0, vel: Vec2::new(-1.0, 0.0) },
            Asteroid { pos: Vec2::new(799.5, 300.0), size: 50.0, vel: Vec2::new(1.0, 0.0) },
            Asteroid { pos: Vec2::new(400.0, 0.2), size: 50.0, vel: Vec2::new(0.0, -0.5) },
            Asteroid { pos: Vec2::new(400.0, 599.8), size: 50.0, vel: Vec2::new(0.0, 0.5) },
        ];
        move_asteroids(&mut asteroids);
        assert_eq!(asteroids[0].pos.x, PLAYFIELD_WIDTH);
        assert_eq!(asteroids[1].pos.x, 0.0);
        assert_eq!(asteroids[2].pos.y, PLAYFIELD_HEIGHT);
        assert_eq!(asteroids[3].pos.y, 0.0);
    }

    #[test]
    fn test_projectile_removed_when_leaving() {
        let mut projectiles = vec![
            Projectile { pos: Vec2::new(400.0, 3.0), rotation: 0.0, speed: PROJECTILE_SPEED },
            Projectile { pos: Vec2::new(400.0, 300.0), rotation: 0.0, speed: PROJECTILE_SPEED },
        ];
        assert_eq!(move_projectiles(&mut projectiles), 1);
        assert_eq!(projectiles.len(), 1);
        assert!((projectiles[0].pos.y - 295.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_bounds(
            inputs in prop::collection::vec((-1i8..=1, any::<bool>()), 1..400),
            x in 0.0f32..=PLAYFIELD_WIDTH,
            y in 0.0f32..=PLAYFIELD_HEIGHT,
        ) {
            let mut ship = Ship { pos: Vec2::new(x, y), ..Default::default() };
            for (rotating, thrusting) in inputs {
                steer_ship(&mut ship, rotating, thrusting);
                move_ship(&mut ship);
                prop_assert!(ship.pos.x >= 0.0 && ship.pos.x <= PLAYFIELD_WIDTH);
                prop_assert!(ship.pos.y >= 0.0 && ship.pos.y <= PLAYFIELD_HEIGHT);
            }
        }

        #[test]
        fn prop_asteroids_never_escape(
            x in 0.0f32..=PLAYFIELD_WIDTH,
            y in 0.0f32..=PLAYFIELD_HEIGHT,
            vx in -SPAWN_SPEED..SPAWN_SPEED,
            vy in -SPAWN_SPEED..SPAWN_SPEED,
            ticks in 1usize..2000,
        ) {
            let mut asteroids = vec![Asteroid { pos: Vec2::new(x, y), size: 25.0, vel: Vec2::new(vx, vy) }];
            for _ in 0..ticks {
                move_asteroids(&mut asteroids);
                let p = asteroids[0].pos;
                prop_assert!(p.x >= 0.0 && p.x <= PLAYFIELD_WIDTH);
                prop_assert!(p.y >= 0.0 && p.y <= PLAYFIELD_HEIGHT);
            }
        }

        #[test]
        fn prop_projectile_gone_within_a_tick_of_leaving(
            x in 1.0f32..PLAYFIELD_WIDTH - 1.0,
            y in 1.0f32..PLAYFIELD_HEIGHT - 1.0,
            rotation in -10.0f32..10.0,
        ) {
            let mut projectiles = vec![Projectile { pos: Vec2::new(x, y), rotation, speed: PROJECTILE_SPEED }];
            for _ in 0..400 {
                move_projectiles(&mut projectiles);
                if let Some(p) = projectiles.first() {
                    prop_assert!(p.pos.x > 0.0 && p.pos.x < PLAYFIELD_WIDTH);
                    prop_assert!(p.pos.y > 0.0 && p.pos.y < PLAYFIELD_HEIGHT);
                }
            }
            prop_assert!(projectiles.is_empty());
        }
    }
}

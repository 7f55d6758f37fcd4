//! Builds the frame's triangle list from a session snapshot
//!
//! Pure read: nothing here touches simulation state.

use glam::Vec2;

use super::shapes;
use super::vertex::{Palette, Vertex};
use crate::consts::*;
use crate::sim::{Asteroid, Projectile, Ship, Snapshot};

/// Stroke width for the ship and border
const LINE_WIDTH: f32 = 2.0;

/// Ship outline in local space, nose up
fn ship_hull() -> [Vec2; 3] {
    let h = SHIP_SIZE / 2.0;
    [Vec2::new(-h, h), Vec2::new(h, h), Vec2::new(0.0, -h)]
}

fn flame() -> [Vec2; 3] {
    let h = SHIP_SIZE / 2.0;
    let q = SHIP_SIZE / 4.0;
    [Vec2::new(0.0, h), Vec2::new(-q, h + 10.0), Vec2::new(q, h + 10.0)]
}

pub fn draw_ship(ship: &Ship, palette: &Palette, out: &mut Vec<Vertex>) {
    let place = |p: Vec2| ship.pos + shapes::rotate(p, ship.rotation);
    let hull = ship_hull().map(place);
    out.extend(shapes::outline(&hull, LINE_WIDTH, palette.ship));

    if ship.thrust {
        let [a, b, c] = flame().map(place);
        out.extend(shapes::triangle(a, b, c, palette.flame));
    }
}

pub fn draw_asteroids(asteroids: &[Asteroid], palette: &Palette, out: &mut Vec<Vertex>) {
    for asteroid in asteroids {
        out.extend(shapes::circle(
            asteroid.pos,
            asteroid.size,
            palette.asteroid,
            shapes::circle_segments(asteroid.size),
        ));
    }
}

pub fn draw_projectiles(projectiles: &[Projectile], palette: &Palette, out: &mut Vec<Vertex>) {
    for p in projectiles {
        out.extend(shapes::square(p.pos, PROJECTILE_SIZE, p.rotation, palette.projectile));
    }
}

fn draw_border(palette: &Palette, out: &mut Vec<Vertex>) {
    let corners = [
        Vec2::ZERO,
        Vec2::new(PLAYFIELD_WIDTH, 0.0),
        Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
        Vec2::new(0.0, PLAYFIELD_HEIGHT),
    ];
    out.extend(shapes::outline(&corners, 1.0, palette.border));
}

/// All geometry for one frame, back to front
pub fn build_scene(snapshot: &Snapshot<'_>, palette: &Palette) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(
        snapshot.asteroids.len() * 96 + snapshot.projectiles.len() * 6 + 64,
    );
    draw_border(palette, &mut out);
    draw_asteroids(snapshot.asteroids, palette, &mut out);
    draw_projectiles(snapshot.projectiles, palette, &mut out);
    draw_ship(snapshot.ship, palette, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    fn count_color(verts: &[Vertex], color: [f32; 4]) -> usize {
        verts.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_scene_contains_every_entity() {
        let mut state = GameState::new(8);
        state.projectiles.push(Projectile::from_ship(&state.ship));
        let palette = Palette::neon();

        let verts = build_scene(&state.snapshot(), &palette);

        let rock_verts: usize = state
            .asteroids
            .iter()
            .map(|a| shapes::circle_segments(a.size) as usize * 3)
            .sum();
        assert_eq!(count_color(&verts, palette.asteroid), rock_verts);
        assert_eq!(count_color(&verts, palette.projectile), 6);
        assert_eq!(count_color(&verts, palette.ship), 18);
        assert_eq!(count_color(&verts, palette.flame), 0);
    }

    #[test]
    fn test_flame_only_when_thrusting() {
        let mut state = GameState::new(8);
        state.ship.thrust = true;
        let palette = Palette::neon();
        let verts = build_scene(&state.snapshot(), &palette);
        assert_eq!(count_color(&verts, palette.flame), 3);
    }

    #[test]
    fn test_ship_nose_follows_rotation() {
        let ship = Ship {
            rotation: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        let mut out = Vec::new();
        draw_ship(&ship, &Palette::neon(), &mut out);
        // Nose points right when rotated a quarter turn
        let max_x = out.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(max_x > ship.pos.x + SHIP_SIZE / 2.0 - 1.0);
    }

    #[test]
    fn test_scene_does_not_mutate_state() {
        let state = GameState::new(21);
        let before = state.asteroids.clone();
        let _ = build_scene(&state.snapshot(), &Palette::high_contrast());
        assert_eq!(state.asteroids, before);
    }
}

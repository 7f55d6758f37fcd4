//! Neon Asteroids - A neon asteroids arcade game
//!
//! Core modules:
//! - `sim`: Simulation (movement, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native input abstraction
//! - `flavor`: Game-over / victory flavor text plumbing
//! - `settings`: Player preferences

pub mod flavor;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ControlScheme, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Speeds are per simulation tick, distances in playfield pixels.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Ticks per countdown second (native host only; the web host uses a timer)
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Ship triangle size; collision radius is half of it
    pub const SHIP_SIZE: f32 = 30.0;
    /// Radius of a freshly spawned asteroid
    pub const ASTEROID_SIZE: f32 = 50.0;
    /// Projectile square size; collision radius is half of it
    pub const PROJECTILE_SIZE: f32 = 5.0;

    /// Radians per tick while rotating
    pub const ROTATION_SPEED: f32 = 0.075;
    /// Pixels per tick while the engine is on
    pub const THRUST_SPEED: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 5.0;

    pub const INITIAL_LIVES: u32 = 3;
    pub const INITIAL_TIME_SECS: u32 = 120;
    pub const INITIAL_ASTEROIDS: usize = 5;

    pub const KILL_SCORE: u32 = 100;
    pub const HIT_PENALTY: u32 = 50;

    /// Asteroids at or below this size are destroyed instead of split
    pub const SPLIT_THRESHOLD: f32 = ASTEROID_SIZE / 2.0;
    /// Velocity component range (±) of freshly spawned asteroids
    pub const SPAWN_SPEED: f32 = 1.0;
    /// Velocity component range (±) of split children
    pub const SPLIT_SPEED: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction of travel for a rotation
///
/// Rotation 0 points up the screen (screen y grows downward).
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    let angle = rotation - std::f32::consts::FRAC_PI_2;
    Vec2::new(angle.cos(), angle.sin())
}

/// Format whole seconds as "M:SS"
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

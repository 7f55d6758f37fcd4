//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One fixed tick per step, speeds expressed per tick
//! - Seeded RNG only
//! - The session state is the single owner of every entity

pub mod collision;
pub mod movement;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, circles_overlap, resolve_projectile_hits, resolve_ship_hits};
pub use movement::{move_asteroids, move_projectiles, move_ship, steer_ship};
pub use state::{Asteroid, GamePhase, GameState, Outcome, Projectile, Ship, Snapshot};
pub use tick::{GameEvent, TickInput, tick};

//! Game state and core simulation types
//!
//! The session owns every entity; the movement, collision and render steps
//! only ever borrow it for the duration of one tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives or out of time
    GameOver,
    /// Every asteroid cleared with lives to spare
    Victory,
}

impl GamePhase {
    /// GameOver and Victory are terminal until an explicit reset
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Radians, 0 = nose pointing up
    pub rotation: f32,
    /// Engine on/off
    pub thrust: bool,
    pub lives: u32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0),
            rotation: 0.0,
            thrust: false,
            lives: INITIAL_LIVES,
        }
    }
}

impl Ship {
    #[inline]
    pub fn radius(&self) -> f32 {
        SHIP_SIZE / 2.0
    }
}

/// A drifting asteroid; `size` is its radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub size: f32,
    pub vel: Vec2,
}

impl Asteroid {
    /// Whether a projectile hit splits this asteroid rather than destroying it
    #[inline]
    pub fn can_split(&self) -> bool {
        self.size > SPLIT_THRESHOLD
    }

    /// Two half-size children at the same position, each with its own velocity
    pub fn split(&self, rng: &mut Pcg32) -> [Asteroid; 2] {
        let child = |rng: &mut Pcg32| Asteroid {
            pos: self.pos,
            size: self.size / 2.0,
            vel: random_velocity(rng, SPLIT_SPEED),
        };
        [child(rng), child(rng)]
    }
}

/// A projectile travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Direction of travel (same convention as the ship)
    pub rotation: f32,
    pub speed: f32,
}

impl Projectile {
    /// Fired from the ship's current position along its heading
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            pos: ship.pos,
            rotation: ship.rotation,
            speed: PROJECTILE_SPEED,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        PROJECTILE_SIZE / 2.0
    }
}

/// Extra gap kept between a placed asteroid and the ship
pub const SPAWN_CLEARANCE: f32 = 20.0;
/// Re-rolls before accepting an overlapping placement
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 16;

/// Velocity with each component uniform in [-range, range)
pub fn random_velocity(rng: &mut Pcg32, range: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(-range..range),
        rng.random_range(-range..range),
    )
}

/// Random point inside `[min, width - min] x [min, height - min]` that keeps
/// an asteroid of `size` clear of the ship.
///
/// Falls back to the last roll when no clear spot turns up.
pub fn clear_position(rng: &mut Pcg32, ship: &Ship, size: f32, min: f32) -> Vec2 {
    let min = min.min(PLAYFIELD_WIDTH / 2.0).min(PLAYFIELD_HEIGHT / 2.0);
    let mut pos = Vec2::ZERO;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        pos = Vec2::new(
            rng.random_range(min..=PLAYFIELD_WIDTH - min),
            rng.random_range(min..=PLAYFIELD_HEIGHT - min),
        );
        if pos.distance(ship.pos) >= ship.radius() + size + SPAWN_CLEARANCE {
            return pos;
        }
    }
    pos
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    /// Bumped on every reset; used to discard stale flavor-text replies
    pub generation: u64,
    pub score: u32,
    /// Countdown in whole seconds
    pub time_remaining: u32,
    pub phase: GamePhase,
    /// Ticks simulated since the last reset
    pub time_ticks: u64,
    pub ship: Ship,
    /// Unordered
    pub asteroids: Vec<Asteroid>,
    /// Unordered
    pub projectiles: Vec<Projectile>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            generation: 0,
            score: 0,
            time_remaining: INITIAL_TIME_SECS,
            phase: GamePhase::Playing,
            time_ticks: 0,
            ship: Ship::default(),
            asteroids: Vec::with_capacity(INITIAL_ASTEROIDS * 2),
            projectiles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_asteroids();
        log::info!("Session started with seed {}", seed);
        state
    }

    /// Return to the canonical initial state with fresh asteroids
    ///
    /// The RNG keeps running, so successive resets draw new layouts.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.score = 0;
        self.time_remaining = INITIAL_TIME_SECS;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.ship = Ship::default();
        self.projectiles.clear();
        self.spawn_asteroids();
        log::info!("Session reset (generation {})", self.generation);
    }

    fn spawn_asteroids(&mut self) {
        self.asteroids.clear();
        for _ in 0..INITIAL_ASTEROIDS {
            let pos = clear_position(&mut self.rng, &self.ship, ASTEROID_SIZE, ASTEROID_SIZE);
            let vel = random_velocity(&mut self.rng, SPAWN_SPEED);
            self.asteroids.push(Asteroid {
                pos,
                size: ASTEROID_SIZE,
                vel,
            });
        }
    }

    #[inline]
    pub fn lives(&self) -> u32 {
        self.ship.lives
    }

    /// Seconds survived so far
    pub fn elapsed_secs(&self) -> u32 {
        INITIAL_TIME_SECS.saturating_sub(self.time_remaining)
    }

    /// One-second countdown step, driven by the host's timer
    ///
    /// Returns the new phase if the countdown ended the session.
    pub fn countdown_second(&mut self) -> Option<GamePhase> {
        if self.phase.is_terminal() {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.enter(GamePhase::GameOver);
            return Some(GamePhase::GameOver);
        }
        None
    }

    /// Terminal checks run once per tick after collisions
    pub fn check_termination(&mut self) -> Option<GamePhase> {
        if self.phase.is_terminal() {
            return None;
        }
        let next = if self.ship.lives == 0 {
            GamePhase::GameOver
        } else if self.asteroids.is_empty() {
            GamePhase::Victory
        } else {
            return None;
        };
        self.enter(next);
        Some(next)
    }

    fn enter(&mut self, phase: GamePhase) {
        log::info!(
            "Phase {:?} -> {:?} (score {}, lives {}, {}s left)",
            self.phase,
            phase,
            self.score,
            self.ship.lives,
            self.time_remaining
        );
        self.phase = phase;
        self.ship.thrust = false;
    }

    /// Final tally of a finished session; `None` while still playing
    pub fn outcome(&self) -> Option<Outcome> {
        self.phase.is_terminal().then(|| Outcome {
            phase: self.phase,
            score: self.score,
            survival_secs: self.elapsed_secs(),
        })
    }

    /// Read-only view for the render step
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            ship: &self.ship,
            asteroids: &self.asteroids,
            projectiles: &self.projectiles,
            score: self.score,
            lives: self.ship.lives,
            time_remaining: self.time_remaining,
            phase: self.phase,
            generation: self.generation,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub phase: GamePhase,
    pub score: u32,
    pub survival_secs: u32,
}

/// Borrowed per-tick view of a session
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub ship: &'a Ship,
    pub asteroids: &'a [Asteroid],
    pub projectiles: &'a [Projectile],
    pub score: u32,
    pub lives: u32,
    pub time_remaining: u32,
    pub phase: GamePhase,
    pub generation: u64,
}

//! Fixed timestep simulation tick
//!
//! Core game loop step: fire, steer, move, collide, then check for the end of
//! the session.

use super::collision::{resolve_projectile_hits, resolve_ship_hits};
use super::movement::{move_asteroids, move_projectiles, move_ship, steer_ship};
use super::state::{GamePhase, GameState, Projectile};

/// Normalized control intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1 rotate left, 0 hold, 1 rotate right
    pub rotating: i8,
    /// Engine on
    pub thrusting: bool,
    /// Spawn one projectile this tick
    pub fire: bool,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileFired,
    ShipHit,
    AsteroidSplit,
    AsteroidDestroyed,
    PhaseChanged(GamePhase),
}

/// Advance the session by one tick
///
/// A session in a terminal phase is left untouched.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase.is_terminal() {
        return events;
    }

    state.time_ticks += 1;

    if input.fire {
        state.projectiles.push(Projectile::from_ship(&state.ship));
        events.push(GameEvent::ProjectileFired);
    }

    steer_ship(&mut state.ship, input.rotating, input.thrusting);
    move_ship(&mut state.ship);
    move_asteroids(&mut state.asteroids);
    move_projectiles(&mut state.projectiles);

    // Ship contacts are settled before any projectile hit
    let ship_report = resolve_ship_hits(
        &mut state.ship,
        &mut state.asteroids,
        &mut state.score,
        &mut state.rng,
    );
    events.extend((0..ship_report.ship_hits).map(|_| GameEvent::ShipHit));

    let report = resolve_projectile_hits(
        &mut state.projectiles,
        &mut state.asteroids,
        &mut state.score,
        &mut state.rng,
    );
    events.extend((0..report.splits).map(|_| GameEvent::AsteroidSplit));
    events.extend((0..report.kills).map(|_| GameEvent::AsteroidDestroyed));

    if let Some(phase) = state.check_termination() {
        events.push(GameEvent::PhaseChanged(phase));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Asteroid;
    use glam::Vec2;

    /// Session with a single stationary asteroid far from the ship
    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345);
        state.asteroids = vec![Asteroid {
            pos: Vec2::new(60.0, 60.0),
            size: ASTEROID_SIZE,
            vel: Vec2::ZERO,
        }];
        state
    }

    #[test]
    fn test_fire_spawns_exactly_one_projectile() {
        let mut state = quiet_state();
        let fire = TickInput { fire: true, ..Default::default() };

        let events = tick(&mut state, &fire);
        assert_eq!(events, vec![GameEvent::ProjectileFired]);
        assert_eq!(state.projectiles.len(), 1);

        // Fired from the ship and already moved one tick along its heading
        let p = &state.projectiles[0];
        assert!((p.pos.y - (state.ship.pos.y - PROJECTILE_SPEED)).abs() < 1e-3);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_projectile_travels_to_asteroid() {
        let mut state = quiet_state();
        // Asteroid straight above the ship
        state.asteroids[0].pos = Vec2::new(state.ship.pos.x, 100.0);

        let mut events = tick(&mut state, &TickInput { fire: true, ..Default::default() });
        for _ in 0..60 {
            events.extend(tick(&mut state, &TickInput::default()));
        }

        assert!(events.contains(&GameEvent::AsteroidSplit));
        assert_eq!(state.score, KILL_SCORE);
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_clearing_last_asteroid_is_victory() {
        let mut state = quiet_state();
        state.asteroids[0] = Asteroid {
            pos: Vec2::new(state.ship.pos.x, state.ship.pos.y - 40.0),
            size: 10.0,
            vel: Vec2::ZERO,
        };

        let mut events = Vec::new();
        for i in 0..20 {
            let input = TickInput { fire: i == 0, ..Default::default() };
            events.extend(tick(&mut state, &input));
        }

        assert_eq!(state.phase, GamePhase::Victory);
        assert!(events.contains(&GameEvent::PhaseChanged(GamePhase::Victory)));
        assert_eq!(state.score, KILL_SCORE);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut state = quiet_state();
        state.ship.lives = 1;
        state.asteroids[0].pos = state.ship.pos;

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events,
            vec![GameEvent::ShipHit, GameEvent::PhaseChanged(GamePhase::GameOver)]
        );
        // Pushed-back asteroid survives
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_terminal_session_is_frozen() {
        let mut state = quiet_state();
        state.phase = GamePhase::GameOver;
        let before_ship = state.ship.clone();
        let before_rocks = state.asteroids.clone();

        let input = TickInput { rotating: 1, thrusting: true, fire: true };
        for _ in 0..10 {
            assert!(tick(&mut state, &input).is_empty());
        }

        assert_eq!(state.ship, before_ship);
        assert_eq!(state.asteroids, before_rocks);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput { rotating: 1, thrusting: true, fire: false },
            TickInput { rotating: 0, thrusting: false, fire: true },
            TickInput { rotating: -1, thrusting: true, fire: true },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ship, state2.ship);
        assert_eq!(state1.asteroids, state2.asteroids);
        assert_eq!(state1.score, state2.score);
    }
}

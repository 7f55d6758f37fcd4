//! Input adapter
//!
//! Raw events are folded into held state as they arrive; once per tick the
//! host calls [`InputAdapter::take_input`] to get the normalized intent.
//! Fire requests are edge-triggered: one request, one projectile.

use glam::Vec2;

use crate::consts::*;
use crate::normalize_angle;
use crate::settings::ControlScheme;
use crate::sim::{Ship, TickInput};

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    Left,
    #[default]
    Hold,
    Right,
}

impl Turn {
    pub fn sign(self) -> i8 {
        match self {
            Turn::Left => -1,
            Turn::Hold => 0,
            Turn::Right => 1,
        }
    }

    fn from_sign(sign: i8) -> Self {
        match sign.signum() {
            -1 => Turn::Left,
            1 => Turn::Right,
            _ => Turn::Hold,
        }
    }
}

/// Keyboard keys currently held
#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
    thrust: bool,
}

/// Touch zones across the canvas width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchZone {
    RotateLeft,
    Thrust,
    RotateRight,
}

/// Collects raw events between ticks
#[derive(Debug, Clone)]
pub struct InputAdapter {
    scheme: ControlScheme,
    /// Canvas size in CSS pixels, for mapping event coordinates
    canvas: Vec2,
    keys: HeldKeys,
    /// Playfield point the ship steers toward while the pointer is held
    aim: Option<Vec2>,
    touch: Option<TouchZone>,
    fire_pending: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(ControlScheme::default())
    }
}

impl InputAdapter {
    pub fn new(scheme: ControlScheme) -> Self {
        Self {
            scheme,
            canvas: Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            keys: HeldKeys::default(),
            aim: None,
            touch: None,
            fire_pending: false,
        }
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: ControlScheme) {
        if scheme != self.scheme {
            log::info!("Control scheme: {}", scheme.as_str());
            self.scheme = scheme;
            self.release_all();
        }
    }

    /// Update the on-screen canvas size; zero or negative sizes are ignored
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.canvas = Vec2::new(width, height);
        }
    }

    /// Drop everything held (reset, blur, scheme change)
    pub fn release_all(&mut self) {
        self.keys = HeldKeys::default();
        self.aim = None;
        self.touch = None;
        self.fire_pending = false;
    }

    /// Handle a `KeyboardEvent.code`; returns true if the key is a game key
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => self.keys.left = true,
            "ArrowRight" | "KeyD" => self.keys.right = true,
            "ArrowUp" | "KeyW" => self.keys.thrust = true,
            "Space" => {
                if !repeat {
                    self.request_fire();
                }
            }
            _ => return false,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => self.keys.left = false,
            "ArrowRight" | "KeyD" => self.keys.right = false,
            "ArrowUp" | "KeyW" => self.keys.thrust = false,
            "Space" => {}
            _ => return false,
        }
        true
    }

    /// Fire button / spacebar
    pub fn request_fire(&mut self) {
        self.fire_pending = true;
    }

    /// Canvas coordinates (CSS pixels) to playfield coordinates, clamped
    fn to_playfield(&self, x: f32, y: f32) -> Vec2 {
        let x = x.clamp(0.0, self.canvas.x);
        let y = y.clamp(0.0, self.canvas.y);
        Vec2::new(
            x * PLAYFIELD_WIDTH / self.canvas.x,
            y * PLAYFIELD_HEIGHT / self.canvas.y,
        )
    }

    /// Mouse pressed: steer toward the pointer and thrust
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.aim = Some(self.to_playfield(x, y));
    }

    /// Mouse moved; only matters while held
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.aim.is_some() && x.is_finite() && y.is_finite() {
            self.aim = Some(self.to_playfield(x, y));
        }
    }

    pub fn pointer_up(&mut self) {
        self.aim = None;
    }

    /// First touch point; meaning depends on the control scheme
    pub fn touch_start(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        match self.scheme {
            ControlScheme::Touch => {
                let x = x.clamp(0.0, self.canvas.x);
                let quarter = self.canvas.x / 4.0;
                self.touch = Some(if x < quarter {
                    TouchZone::RotateLeft
                } else if x > self.canvas.x - quarter {
                    TouchZone::RotateRight
                } else {
                    TouchZone::Thrust
                });
            }
            ControlScheme::Desktop => self.pointer_down(x, y),
        }
    }

    pub fn touch_end(&mut self) {
        self.touch = None;
        self.aim = None;
    }

    /// Intent for this tick; consumes a pending fire request
    pub fn take_input(&mut self, ship: &Ship) -> TickInput {
        let mut rotating = i8::from(self.keys.right) - i8::from(self.keys.left);
        let mut thrusting = self.keys.thrust;

        match self.touch {
            Some(TouchZone::RotateLeft) => rotating -= 1,
            Some(TouchZone::RotateRight) => rotating += 1,
            Some(TouchZone::Thrust) => thrusting = true,
            None => {}
        }

        if let Some(target) = self.aim {
            rotating += aim_turn(ship, target).sign();
            thrusting = true;
        }

        TickInput {
            rotating: Turn::from_sign(rotating).sign(),
            thrusting,
            fire: std::mem::take(&mut self.fire_pending),
        }
    }
}

/// Which way the ship should turn to face `target`
///
/// Within one tick's rotation of the target heading the ship holds, so it
/// does not oscillate around it.
pub fn aim_turn(ship: &Ship, target: Vec2) -> Turn {
    let to_target = target - ship.pos;
    if to_target.length() < ship.radius() {
        return Turn::Hold;
    }
    let desired = to_target.y.atan2(to_target.x) + std::f32::consts::FRAC_PI_2;
    let delta = normalize_angle(desired - ship.rotation);
    if delta.abs() < ROTATION_SPEED {
        Turn::Hold
    } else if delta > 0.0 {
        Turn::Right
    } else {
        Turn::Left
    }
}

/// Whether keystrokes aimed at an element with this tag belong to the page
/// rather than the ship (form fields keep their keys)
pub fn is_text_entry(tag_name: &str) -> bool {
    ["INPUT", "TEXTAREA", "SELECT"]
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::movement::steer_ship;

    #[test]
    fn test_keyboard_mapping() {
        let mut input = InputAdapter::default();
        let ship = Ship::default();

        assert!(input.key_down("ArrowLeft", false));
        assert!(input.key_down("KeyW", false));
        let tick = input.take_input(&ship);
        assert_eq!(tick, TickInput { rotating: -1, thrusting: true, fire: false });

        // Opposite keys cancel
        input.key_down("KeyD", false);
        assert_eq!(input.take_input(&ship).rotating, 0);

        input.key_up("ArrowLeft");
        input.key_up("KeyW");
        assert_eq!(input.take_input(&ship), TickInput { rotating: 1, thrusting: false, fire: false });

        assert!(!input.key_down("KeyQ", false));
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut input = InputAdapter::default();
        let ship = Ship::default();

        input.key_down("Space", false);
        input.key_down("Space", true); // auto-repeat ignored
        assert!(input.take_input(&ship).fire);
        assert!(!input.take_input(&ship).fire);

        input.request_fire();
        input.request_fire();
        assert!(input.take_input(&ship).fire);
        assert!(!input.take_input(&ship).fire);
    }

    #[test]
    fn test_touch_zones() {
        let mut input = InputAdapter::new(ControlScheme::Touch);
        input.set_canvas_size(400.0, 300.0);
        let ship = Ship::default();

        input.touch_start(50.0, 150.0);
        assert_eq!(input.take_input(&ship), TickInput { rotating: -1, thrusting: false, fire: false });

        input.touch_start(390.0, 10.0);
        assert_eq!(input.take_input(&ship).rotating, 1);

        input.touch_start(200.0, 150.0);
        assert_eq!(input.take_input(&ship), TickInput { rotating: 0, thrusting: true, fire: false });

        // Off-canvas coordinates are clamped, not rejected
        input.touch_start(-80.0, 150.0);
        assert_eq!(input.take_input(&ship).rotating, -1);

        input.touch_end();
        assert_eq!(input.take_input(&ship), TickInput::default());
    }

    #[test]
    fn test_pointer_aims_and_thrusts() {
        let mut input = InputAdapter::default();
        let ship = Ship::default();

        // Straight right of the ship: turn clockwise
        input.pointer_down(700.0, 300.0);
        assert_eq!(input.take_input(&ship), TickInput { rotating: 1, thrusting: true, fire: false });

        // Straight ahead: hold heading
        input.pointer_move(400.0, 50.0);
        assert_eq!(input.take_input(&ship).rotating, 0);

        input.pointer_up();
        assert_eq!(input.take_input(&ship), TickInput::default());

        // Moves without a press are ignored
        input.pointer_move(100.0, 300.0);
        assert_eq!(input.take_input(&ship), TickInput::default());
    }

    #[test]
    fn test_pointer_scales_to_playfield() {
        let mut input = InputAdapter::default();
        input.set_canvas_size(400.0, 300.0);
        let ship = Ship::default();

        // Canvas (100, 150) is playfield (200, 300): left of the ship
        input.pointer_down(100.0, 150.0);
        assert_eq!(input.take_input(&ship).rotating, -1);
    }

    #[test]
    fn test_pointer_clamps_off_canvas() {
        let mut input = InputAdapter::default();
        input.pointer_down(-50.0, 900.0);
        assert_eq!(input.aim, Some(Vec2::new(0.0, PLAYFIELD_HEIGHT)));

        input.set_canvas_size(400.0, 300.0);
        input.pointer_move(1000.0, -20.0);
        assert_eq!(input.aim, Some(Vec2::new(PLAYFIELD_WIDTH, 0.0)));

        // Bottom-left corner is behind and left of a ship facing up
        input.pointer_move(-5.0, 400.0);
        assert_eq!(input.take_input(&Ship::default()).rotating, -1);
    }

    #[test]
    fn test_form_fields_keep_their_keys() {
        assert!(is_text_entry("INPUT"));
        assert!(is_text_entry("input"));
        assert!(is_text_entry("TEXTAREA"));
        assert!(is_text_entry("SELECT"));
        assert!(!is_text_entry("CANVAS"));
        assert!(!is_text_entry("BODY"));
        assert!(!is_text_entry(""));
    }

    #[test]
    fn test_aim_converges() {
        let mut ship = Ship::default();
        let target = Vec2::new(100.0, 550.0);
        for _ in 0..200 {
            let turn = aim_turn(&ship, target);
            steer_ship(&mut ship, turn.sign(), false);
        }
        assert_eq!(aim_turn(&ship, target), Turn::Hold);
        let dir = crate::heading(ship.rotation);
        let want = (target - ship.pos).normalize();
        assert!(dir.dot(want) > 0.99);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputAdapter::default();
        input.key_down("ArrowUp", false);
        input.pointer_down(10.0, 10.0);
        input.request_fire();
        input.release_all();
        assert_eq!(input.take_input(&Ship::default()), TickInput::default());
    }
}

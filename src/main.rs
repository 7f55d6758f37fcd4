//! Neon Asteroids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use neon_asteroids::consts::*;
    use neon_asteroids::flavor::{FlavorBoard, FlavorError, FlavorRequest, decode_message};
    use neon_asteroids::format_clock;
    use neon_asteroids::platform::{InputAdapter, is_text_entry};
    use neon_asteroids::renderer::{RenderState, build_scene};
    use neon_asteroids::sim::{GameEvent, GamePhase, GameState, tick};
    use neon_asteroids::{ControlScheme, Settings};

    // Flavor text generator endpoint; resolves to the raw response body
    #[wasm_bindgen(inline_js = "
        export function request_flavor_text(flow, payload) {
            return fetch('/api/flavor/' + flow, {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: payload,
            }).then(r => r.ok ? r.text() : Promise.reject(new Error('HTTP ' + r.status)));
        }
    ")]
    extern "C" {
        fn request_flavor_text(flow: &str, payload: &str) -> js_sys::Promise;
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        input: InputAdapter,
        flavor: FlavorBoard,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let state = GameState::new(seed);
            let mut flavor = FlavorBoard::new();
            flavor.begin_session(state.generation);
            Self {
                state,
                input: InputAdapter::new(settings.control_scheme),
                settings,
                flavor,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks; returns the phase the session just ended in
        fn update(&mut self, dt: f32, time: f64) -> Option<GamePhase> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut ended = None;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.take_input(&self.state.ship);
                let events = tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in events {
                    if let GameEvent::PhaseChanged(phase) = event {
                        ended = Some(phase);
                    }
                }
                if self.state.phase.is_terminal() {
                    self.accumulator = 0.0;
                    break;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            ended
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state.snapshot(), &render_state.palette);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snapshot = self.state.snapshot();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&snapshot.lives.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&format_clock(snapshot.time_remaining)));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("end-dialog") {
                if snapshot.phase.is_terminal() {
                    let _ = el.set_attribute("class", "");
                    if let Some(title) = document.get_element_by_id("end-title") {
                        let text = if snapshot.phase == GamePhase::Victory {
                            "Victory!"
                        } else {
                            "Game Over"
                        };
                        title.set_text_content(Some(text));
                    }
                    if let Some(msg) = document.get_element_by_id("end-message") {
                        msg.set_text_content(Some(self.flavor.display_text()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        fn restart(&mut self) {
            self.state.reset();
            self.flavor.begin_session(self.state.generation);
            self.input.release_all();
            self.accumulator = 0.0;
        }
    }

    /// Ask the external generator for flavor text without blocking the loop
    fn request_flavor(game: Rc<RefCell<Game>>) {
        let (ticket, request, payload) = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            if !g.settings.flavor_text {
                return;
            }
            let Some(request) = FlavorRequest::for_outcome(&g.state, &g.settings.player_name)
            else {
                return;
            };
            let payload = match request.payload_json() {
                Ok(payload) => payload,
                Err(e) => {
                    log::warn!("Could not encode flavor request: {}", e);
                    return;
                }
            };
            let ticket = g.flavor.issue(&g.state);
            (ticket, request, payload)
        };

        log::info!("Requesting {} flavor text", request.flow_name());
        wasm_bindgen_futures::spawn_local(async move {
            let reply = wasm_bindgen_futures::JsFuture::from(request_flavor_text(
                request.flow_name(),
                &payload,
            ))
            .await;
            let result = match reply {
                Ok(body) => match body.as_string() {
                    Some(body) => decode_message(&body),
                    None => Err(FlavorError::Transport("non-text response".to_string())),
                },
                Err(e) => Err(FlavorError::Transport(format!("{:?}", e))),
            };
            game.borrow_mut().flavor.resolve(ticket, result);
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Asteroids starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let mut settings = Settings::load();
        let viewport = window.inner_width().ok().and_then(|v| v.as_f64());
        if let Some(viewport) = viewport {
            if settings.control_scheme == ControlScheme::Desktop {
                settings.control_scheme = ControlScheme::for_viewport_width(viewport);
            }
        }
        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&settings.player_name);
        }
        let palette = settings.palette();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        game.borrow_mut()
            .input
            .set_canvas_size(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match RenderState::new(surface, &adapter, width, height, palette).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Failed to create device: {}", e),
                }
            }
            Err(e) => log::error!("Failed to get adapter: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_countdown(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Neon Asteroids running!");
    }

    /// Event coordinates relative to the canvas, in CSS pixels
    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        let x = touch.client_x() as f32 - rect.left() as f32;
        let y = touch.client_y() as f32 - rect.top() as f32;
        Some((x, y))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse: hold to aim and thrust
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.set_canvas_size(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                g.input
                    .pointer_down(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .pointer_move(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: zones or aim, depending on the control scheme
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&canvas_clone, &event) {
                    let mut g = game.borrow_mut();
                    g.input.set_canvas_size(
                        canvas_clone.client_width() as f32,
                        canvas_clone.client_height() as f32,
                    );
                    g.input.touch_start(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.touch_end();
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Typing in the name field must not steer or fire
                let in_form_field = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .is_some_and(|el| is_text_entry(&el.tag_name()));
                if in_form_field {
                    return;
                }
                if game.borrow_mut().input.key_down(&event.code(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["reset-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().restart();
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // On-screen fire button for touch devices
        if let Some(btn) = document.get_element_by_id("fire-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.request_fire();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.settings.set_player_name(&input_clone.value());
                g.settings.save();
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One-second countdown on the same event loop as the frame callback
    fn setup_countdown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let ended = game.borrow_mut().state.countdown_second();
            if ended.is_some() {
                request_flavor(game.clone());
            }
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            log::error!("Failed to start countdown: {:?}", e);
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let ended = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let ended = g.update(dt, time);
            g.render();
            g.update_hud();
            ended
        };

        if ended.is_some() {
            request_flavor(game.clone());
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Asteroids (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    let settings = neon_asteroids::Settings::load();
    let seed = std::env::var("NEON_ASTEROIDS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

    let summary = headless::run(seed, &settings);
    println!("{}", summary);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session driven by a simple keyboard autopilot
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_asteroids::consts::*;
    use neon_asteroids::flavor::{CannedFlavor, FlavorBoard, request_now};
    use neon_asteroids::platform::{InputAdapter, Turn, aim_turn};
    use neon_asteroids::sim::{GameEvent, GameState, tick};
    use neon_asteroids::{Settings, format_clock};

    /// Ticks between autopilot shots
    const FIRE_INTERVAL: u64 = 8;

    /// Steer toward the nearest asteroid and fire when lined up
    fn autopilot(state: &GameState, input: &mut InputAdapter) {
        input.key_up("ArrowLeft");
        input.key_up("ArrowRight");

        let Some(target) = state
            .asteroids
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance(state.ship.pos)
                    .total_cmp(&b.pos.distance(state.ship.pos))
            })
            .map(|a| a.pos)
        else {
            return;
        };

        match aim_turn(&state.ship, target) {
            Turn::Left => {
                input.key_down("ArrowLeft", false);
            }
            Turn::Right => {
                input.key_down("ArrowRight", false);
            }
            Turn::Hold => {
                if state.time_ticks % FIRE_INTERVAL == 0 {
                    input.key_down("Space", false);
                }
            }
        }
    }

    pub fn run(seed: u64, settings: &Settings) -> String {
        let mut state = GameState::new(seed);
        let mut input = InputAdapter::new(settings.control_scheme);
        let mut flavor = FlavorBoard::new();
        flavor.begin_session(state.generation);

        let mut shots = 0u32;
        while !state.phase.is_terminal() {
            autopilot(&state, &mut input);
            let frame = input.take_input(&state.ship);
            for event in tick(&mut state, &frame) {
                match event {
                    GameEvent::ProjectileFired => shots += 1,
                    GameEvent::ShipHit => log::info!("Ship hit! {} lives left", state.lives()),
                    _ => {}
                }
            }
            if state.time_ticks % TICKS_PER_SECOND == 0 {
                state.countdown_second();
            }
        }

        if settings.flavor_text {
            request_now(&mut flavor, &mut CannedFlavor, &state, &settings.player_name);
        }

        format!(
            "{:?} | score {} | lives {} | time left {} | shots {}\n{}",
            state.phase,
            state.score,
            state.lives(),
            format_clock(state.time_remaining),
            shots,
            flavor.display_text()
        )
    }
}

//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; natively they come from defaults
//! plus a couple of environment overrides.

use serde::{Deserialize, Serialize};

use crate::renderer::Palette;

/// Default player name used for victory messages
pub const DEFAULT_PLAYER_NAME: &str = "Player";
/// Longest player name kept
pub const MAX_PLAYER_NAME_LEN: usize = 24;

/// How pointer/touch input steers the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// Hold the mouse to aim at the cursor and thrust
    #[default]
    Desktop,
    /// Left/right screen edges rotate, the middle thrusts
    Touch,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Desktop => "Desktop",
            ControlScheme::Touch => "Touch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "desktop" | "mouse" => Some(ControlScheme::Desktop),
            "touch" | "mobile" => Some(ControlScheme::Touch),
            _ => None,
        }
    }

    /// Scheme for a viewport width (narrow screens are treated as touch)
    pub fn for_viewport_width(width: f64) -> Self {
        if width <= 768.0 {
            ControlScheme::Touch
        } else {
            ControlScheme::Desktop
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name used in the victory message
    pub player_name: String,
    /// Pointer/touch mapping
    pub control_scheme: ControlScheme,
    /// Request flavor text on game over / victory
    pub flavor_text: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            control_scheme: ControlScheme::Desktop,
            flavor_text: true,
            show_fps: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Set the player name, trimmed and capped; blank falls back to the default
    pub fn set_player_name(&mut self, name: &str) {
        let name: String = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name
        };
    }

    /// Colors matching the contrast preference
    pub fn palette(&self) -> Palette {
        if self.high_contrast {
            Palette::high_contrast()
        } else {
            Palette::neon()
        }
    }

    /// Parse stored JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                let name = settings.player_name.clone();
                settings.set_player_name(&name);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_asteroids_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: defaults with `NEON_ASTEROIDS_PLAYER` / `NEON_ASTEROIDS_CONTROLS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Ok(name) = std::env::var("NEON_ASTEROIDS_PLAYER") {
            settings.set_player_name(&name);
        }
        if let Some(scheme) = std::env::var("NEON_ASTEROIDS_CONTROLS")
            .ok()
            .and_then(|s| ControlScheme::from_str(&s))
        {
            settings.control_scheme = scheme;
        }
        settings
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

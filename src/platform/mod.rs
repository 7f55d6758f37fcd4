//! Platform abstraction layer
//!
//! Turns browser pointer, touch and keyboard events into device-independent
//! ship controls. The simulation only ever sees a `TickInput`.

pub mod input;

pub use input::{InputAdapter, Turn, aim_turn, is_text_entry};

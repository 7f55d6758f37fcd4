//! WebGPU rendering module
//!
//! The scene builder turns a snapshot into flat-colored triangles in
//! playfield space; the pipeline maps them to the canvas and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::{Palette, Vertex};

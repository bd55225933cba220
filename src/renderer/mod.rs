//! WebGPU rendering module
//!
//! The scene is rebuilt as a flat triangle list each frame and drawn in a
//! single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{InitError, RenderState, playfield_to_ndc};
pub use scene::{Paint, SceneOptions, ScreenShake, build_scene};
pub use vertex::Vertex;

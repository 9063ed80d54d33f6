//! WebGPU rendering module
//!
//! Geometry is built on the CPU in field pixels each frame and drawn as a
//! single flat-colored triangle list.

pub mod font;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderInitError, RenderState};
pub use scene::build_scene;
pub use vertex::{Theme, Vertex};

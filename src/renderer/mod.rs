//! Rendering module
//!
//! Frames are tessellated on the CPU into colored triangles (`scene`,
//! `shapes`, `glyphs`) and drawn through a single WebGPU pipeline.

pub mod glyphs;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawList, Layer, build_frame};
pub use vertex::Vertex;

//! WebGPU rendering module
//!
//! Meshes are rebuilt on the CPU each frame from the session state and drawn
//! as flat-colored triangle lists: opaque geometry first, then overlays.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::FieldRenderer;
pub use shapes::{SceneMeshes, scene};
pub use vertex::Vertex;

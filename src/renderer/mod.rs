//! WebGPU rendering module
//!
//! `scene` turns simulation state into a vertex list; `pipeline` owns the
//! surface and draws it. No gameplay state lives here.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

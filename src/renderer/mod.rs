//! Rendering module
//!
//! Scene drawing goes through [`Surface`](crate::surface::Surface); the
//! [`VertexCanvas`] turns it into triangles that [`RenderState`] uploads.

pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use canvas::VertexCanvas;
pub use pipeline::RenderState;
pub use scene::draw_scene;
pub use vertex::Vertex;

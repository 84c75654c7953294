// VIEW: Rendering and graphics
pub mod gpu_init;
pub mod hud;
pub mod mesh;
pub mod render;

pub use gpu_init::GpuContext;
pub use mesh::{Instance, Mesh, MeshBuffer, Vertex};
pub use render::{CameraResources, CameraUniform, LightingUniform, Renderer};

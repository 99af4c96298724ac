//! Rendering collaborator: the sink trait the game draws into, the per-frame
//! scene assembly and the terminal renderer.

pub mod renderer;
pub mod scene;
pub mod sink;

pub use renderer::Renderer;
pub use scene::{draw_scene, projection};
pub use sink::{DrawCall, DrawMode, Mesh, RenderSink, SceneBuffer};

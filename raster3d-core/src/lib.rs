/// raster3d core library - software rasterization pipeline
///
/// This library provides the stateless pieces of a CPU renderer: vector and
/// matrix math, model/view/projection transforms, a depth buffer, the
/// scanline triangle rasterizer and its wireframe overlay, and a per-frame
/// orchestrator that ties them together.

pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod projection;
pub mod rasterizer;
pub mod renderer;
pub mod texture;
pub mod transform;
pub mod wireframe;
pub mod zbuffer;

// Re-export commonly used types
pub use color::Color;
pub use error::{MathError, TextureError};
pub use framebuffer::{FrameBuffer, PixelSink};
pub use geometry::{Mesh, Model, Triangle, Vertex};
pub use math::{Matrix3, Matrix4, Vector2, Vector3, Vector4, EPSILON};
pub use projection::Camera;
pub use rasterizer::{Rasterizer, RasterizerSettings, TriangleInput};
pub use renderer::{FrameStats, Renderer};
pub use texture::Texture;
pub use transform::{RotationState, Transform};
pub use zbuffer::ZBuffer;

//! A CPU software rasterizer for textured 3D meshes.
//!
//! All geometry processing happens on the CPU: per-frame transform,
//! edge-function scan conversion with a z-buffer, and per-pixel Phong or
//! textured shading. SDL2 is used only to display the finished color buffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use softrast::prelude::*;
//!
//! let mesh = softrast::loader::load_obj("assets/head.obj")?;
//! let camera = Camera::new(Vec3::new(0.0, 0.0, -3.0), Projection::from_degrees(45.0, 4.0 / 3.0, 0.1, 100.0));
//! let mut shader = Shader::new();
//! let mut rasterizer = Rasterizer::new(800, 600);
//! let mut ctx = RenderContext::new(&camera, &mesh, &mut shader, &mut rasterizer);
//! ctx.clear(Vec3::ONE);
//! ctx.render();
//! ```

pub mod camera;
pub mod config;
pub mod loader;
pub mod material;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod shader;
pub mod texture;
pub mod transform;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use mesh::{MeshData, MeshError};
pub use pipeline::RenderContext;
pub use projection::Projection;
pub use render::Rasterizer;
pub use shader::Shader;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softrast::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::mesh::MeshData;
    pub use crate::projection::Projection;

    // Rendering
    pub use crate::pipeline::RenderContext;
    pub use crate::render::Rasterizer;
    pub use crate::shader::{Light, Shader};
    pub use crate::texture::{Texture, TextureKind};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Window
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

//! Frame orchestration.
//!
//! [`RenderContext`] is an explicit value passed around by the host — there
//! is no process-wide pipeline state. It borrows one camera and one mesh for
//! reading and one shader and one rasterizer mutably; the borrows live as
//! long as the context, and rebinding a slot simply replaces the reference
//! (last bind wins, nothing is cleaned up — the caller owns every component).
//!
//! `render()` is a stateless pass over the current bindings: for every
//! triangle it transforms the corners through `projection * view * model`,
//! rejects triangles touching the near plane, maps NDC to pixels, and hands
//! the screen-space triangle to the rasterizer with the material's shading
//! function.
//!
//! # Viewport convention
//!
//! NDC x in [-1, 1] maps to pixel x in [0, width]; NDC y in [-1, 1] maps to
//! pixel y in [height, 0] — increasing y in model space means a *decreasing*
//! row index, the usual image layout.

use log::trace;

use crate::camera::Camera;
use crate::math::{Vec2, Vec3, Vec4};
use crate::mesh::MeshData;
use crate::render::{Rasterizer, ScreenVertex};
use crate::shader::{Shader, ShaderInput};

/// A vertex reaching `w` at or below this is treated as touching the near
/// plane; its whole triangle is dropped rather than clipped.
const NEAR_W: f32 = 1e-4;

/// Borrowed bindings for rendering frames.
pub struct RenderContext<'s> {
    camera: &'s Camera,
    mesh: &'s MeshData,
    shader: &'s mut Shader,
    rasterizer: &'s mut Rasterizer,
}

impl<'s> RenderContext<'s> {
    pub fn new(
        camera: &'s Camera,
        mesh: &'s MeshData,
        shader: &'s mut Shader,
        rasterizer: &'s mut Rasterizer,
    ) -> Self {
        Self {
            camera,
            mesh,
            shader,
            rasterizer,
        }
    }

    /// Rebinds the camera slot. Last bind wins.
    pub fn bind_camera(&mut self, camera: &'s Camera) {
        self.camera = camera;
    }

    /// Rebinds the mesh slot. Last bind wins.
    pub fn bind_mesh(&mut self, mesh: &'s MeshData) {
        self.mesh = mesh;
    }

    /// Rebinds the shader slot. Last bind wins.
    pub fn bind_shader(&mut self, shader: &'s mut Shader) {
        self.shader = shader;
    }

    /// Rebinds the rasterizer slot. Last bind wins.
    pub fn bind_rasterizer(&mut self, rasterizer: &'s mut Rasterizer) {
        self.rasterizer = rasterizer;
    }

    pub fn camera(&self) -> &Camera {
        self.camera
    }

    /// The shader is the one slot the host mutates between frames (the
    /// animation step composes onto the model matrix).
    pub fn shader_mut(&mut self) -> &mut Shader {
        self.shader
    }

    /// Read-only view of the rendered colors for the display layer.
    pub fn framebuffer_data(&self) -> &[f32] {
        self.rasterizer.framebuffer().data()
    }

    /// Fills the color buffer and resets the depth buffer.
    pub fn clear(&mut self, color: Vec3) {
        self.rasterizer.clear(color);
    }

    /// Renders one frame of the bound mesh into the bound rasterizer.
    pub fn render(&mut self) {
        let pass = self.shader.use_pass();
        let mvp = pass.mvp();
        let model = pass.model_matrix();
        let view_pos = pass.view_pos();
        let light_dir = pass.light_dir();
        let width = self.rasterizer.width() as f32;
        let height = self.rasterizer.height() as f32;

        let mut culled = 0usize;
        for index in 0..self.mesh.triangle_count() {
            let corners = self.mesh.triangle(index);

            let mut screen = [ScreenVertex::default(); 3];
            let mut near_clipped = false;
            for (vertex, corner) in screen.iter_mut().zip(&corners) {
                let clip = mvp * Vec4::from(corner.position);
                if clip.w <= NEAR_W {
                    near_clipped = true;
                    break;
                }
                let inv_w = 1.0 / clip.w;
                let ndc = clip.to_vec3() * inv_w;

                *vertex = ScreenVertex {
                    screen: Vec2::new(
                        (ndc.x + 1.0) * 0.5 * width,
                        (1.0 - ndc.y) * 0.5 * height,
                    ),
                    inv_w,
                    world: (model * Vec4::from(corner.position)).to_vec3(),
                    normal: model.transform_direction(corner.normal).normalize(),
                    texcoord: corner.texcoord,
                };
            }
            if near_clipped {
                culled += 1;
                continue;
            }

            // Shading model resolved per material at load time; one branch
            // per triangle, none per pixel.
            let material = self.mesh.material_of(index);
            let shade = material.shading.function();
            let diffuse_texture = material
                .diffuse_texture
                .as_deref()
                .and_then(|name| self.mesh.texture(name));

            self.rasterizer.rasterize_triangle(&screen, |fragment| {
                shade(&ShaderInput {
                    position: fragment.position,
                    view_pos,
                    normal: fragment.normal,
                    texcoord: fragment.texcoord,
                    ambient: material.ambient,
                    diffuse: material.diffuse,
                    specular: material.specular,
                    shininess: material.shininess,
                    light_dir,
                    diffuse_texture,
                })
            });
        }

        if culled > 0 {
            trace!("dropped {culled} triangles at the near plane");
        }
    }
}

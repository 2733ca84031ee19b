//! Shading state and the per-fragment shading functions.
//!
//! The [`Shader`] holds the model/view/projection matrices and the view
//! position, mutated once per frame by the host animation step. The two
//! shading functions are pure: everything they read arrives in a
//! [`ShaderInput`] bundle built by the pipeline for each fragment.
//!
//! # Light convention
//!
//! There is no per-light entity in this design. The shader owns one
//! directional [`Light`]; the default is camera-attached (a headlight
//! pointing from the scene origin toward the eye), and a fixed world-space
//! direction can be configured instead. The frame's unit `light_dir`
//! (surface toward light) is derived in [`Shader::use_pass`].

use crate::material::ShadingModel;
use crate::math::{Mat4, Vec2, Vec3};
use crate::texture::Texture;

/// Directional light configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Light {
    /// Light rides with the camera: direction from the scene origin toward
    /// the current view position.
    #[default]
    CameraAttached,
    /// Fixed world-space direction pointing from surfaces toward the light.
    Fixed(Vec3),
}

/// Everything a shading function may read for one fragment.
pub struct ShaderInput<'a> {
    /// World-space fragment position.
    pub position: Vec3,
    pub view_pos: Vec3,
    /// Interpolated unit normal.
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Unit direction from the surface toward the light.
    pub light_dir: Vec3,
    pub diffuse_texture: Option<&'a Texture>,
}

/// A shading function selected per material, once per triangle.
pub type ShadeFn = fn(&ShaderInput<'_>) -> Vec3;

impl ShadingModel {
    /// The function table behind the per-material shading tag.
    pub fn function(self) -> ShadeFn {
        match self {
            ShadingModel::Lit => shade_lit,
            ShadingModel::Textured => shade_textured,
        }
    }
}

/// Phong shading:
/// `ambient + diffuse * max(0, N·L) + specular * max(0, R·V)^shininess`,
/// with `R` the reflection of `L` about `N` and `V` the direction from the
/// fragment to the view position.
pub fn shade_lit(input: &ShaderInput<'_>) -> Vec3 {
    phong(input, input.diffuse)
}

/// Textured shading: samples the diffuse texture (nearest neighbour) at the
/// interpolated texture coordinate and uses the texel as the diffuse
/// coefficient of the Phong terms, so lighting still models the surface.
///
/// Falls back to [`shade_lit`] when no diffuse texture is bound; the
/// per-material selection normally prevents that path.
pub fn shade_textured(input: &ShaderInput<'_>) -> Vec3 {
    match input.diffuse_texture {
        Some(texture) => {
            let texel = texture.sample(input.texcoord.x, input.texcoord.y);
            phong(input, texel)
        }
        None => shade_lit(input),
    }
}

fn phong(input: &ShaderInput<'_>, diffuse: Vec3) -> Vec3 {
    let n = input.normal;
    let l = input.light_dir;
    let v = (input.view_pos - input.position).normalize();
    let r = l.reflect(n);

    let diffuse_term = diffuse * n.dot(l).max(0.0);
    let specular_term = input.specular * r.dot(v).max(0.0).powf(input.shininess);

    (input.ambient + diffuse_term + specular_term).clamp01()
}

/// Derived state valid for one frame, set up by [`Shader::use_pass`].
#[derive(Clone, Copy, Debug)]
struct FrameState {
    mvp: Mat4,
    light_dir: Vec3,
}

/// Transform state for the render pass.
pub struct Shader {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    view_pos: Vec3,
    light: Light,
    frame: Option<FrameState>,
}

impl Default for Shader {
    fn default() -> Self {
        Self::new()
    }
}

impl Shader {
    pub fn new() -> Self {
        Self {
            model: Mat4::identity(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
            view_pos: Vec3::ZERO,
            light: Light::default(),
            frame: None,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.model = model;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn view_pos(&self) -> Vec3 {
        self.view_pos
    }

    pub fn set_view_pos(&mut self, view_pos: Vec3) {
        self.view_pos = view_pos;
    }

    pub fn light(&self) -> Light {
        self.light
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }

    /// Brackets a render pass: derives the frame's combined matrix and light
    /// direction, and tears the state down again when the returned guard
    /// drops — on every exit path, including early triangle skips.
    pub fn use_pass(&mut self) -> ShaderPass<'_> {
        let light_dir = match self.light {
            Light::CameraAttached => {
                let d = self.view_pos;
                if d.magnitude() > f32::EPSILON {
                    d.normalize()
                } else {
                    Vec3::UP
                }
            }
            Light::Fixed(dir) => dir.normalize(),
        };
        self.frame = Some(FrameState {
            mvp: self.projection * self.view * self.model,
            light_dir,
        });
        ShaderPass { shader: self }
    }

    fn flush(&mut self) {
        self.frame = None;
    }

    fn frame(&self) -> &FrameState {
        self.frame
            .as_ref()
            .expect("frame state is only read through an active ShaderPass")
    }
}

/// RAII guard over one frame's shading state.
///
/// Created by [`Shader::use_pass`]; dropping it flushes the derived state.
pub struct ShaderPass<'a> {
    shader: &'a mut Shader,
}

impl ShaderPass<'_> {
    /// Combined `projection * view * model` for this frame.
    pub fn mvp(&self) -> Mat4 {
        self.shader.frame().mvp
    }

    /// This frame's unit light direction (surface toward light).
    pub fn light_dir(&self) -> Vec3 {
        self.shader.frame().light_dir
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.shader.model
    }

    pub fn view_pos(&self) -> Vec3 {
        self.shader.view_pos
    }
}

impl Drop for ShaderPass<'_> {
    fn drop(&mut self) {
        self.shader.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{Texture, TextureKind};
    use approx::assert_relative_eq;

    fn input_with_normal_toward_light<'a>() -> ShaderInput<'a> {
        ShaderInput {
            position: Vec3::ZERO,
            view_pos: Vec3::new(0.0, 0.0, -5.0),
            normal: Vec3::new(0.0, 0.0, -1.0),
            texcoord: Vec2::ZERO,
            ambient: Vec3::ZERO,
            diffuse: Vec3::new(0.3, 0.5, 0.7),
            specular: Vec3::ZERO,
            shininess: 32.0,
            light_dir: Vec3::new(0.0, 0.0, -1.0),
            diffuse_texture: None,
        }
    }

    #[test]
    fn lit_head_on_equals_diffuse() {
        // N parallel to L, no ambient, no specular: the output is exactly
        // the diffuse coefficient.
        let input = input_with_normal_toward_light();
        let color = shade_lit(&input);
        assert_relative_eq!(color.x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(color.y, 0.5, epsilon = 1e-6);
        assert_relative_eq!(color.z, 0.7, epsilon = 1e-6);
    }

    #[test]
    fn lit_ignores_light_behind_surface() {
        let mut input = input_with_normal_toward_light();
        input.light_dir = Vec3::new(0.0, 0.0, 1.0); // behind the surface
        input.ambient = Vec3::splat(0.25);
        let color = shade_lit(&input);
        assert_eq!(color, Vec3::splat(0.25));
    }

    #[test]
    fn textured_uses_texel_as_diffuse() {
        let texture = Texture::from_texels(
            1,
            1,
            vec![0.0, 1.0, 0.0],
            TextureKind::Diffuse,
        );
        let mut input = input_with_normal_toward_light();
        input.diffuse_texture = Some(&texture);
        let color = shade_textured(&input);
        assert_relative_eq!(color.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(color.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(color.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn use_pass_caches_and_flush_clears() {
        let mut shader = Shader::new();
        shader.set_view_pos(Vec3::new(0.0, 0.0, -4.0));
        {
            let pass = shader.use_pass();
            assert_relative_eq!(pass.light_dir().z, -1.0, epsilon = 1e-6);
            assert_eq!(pass.mvp(), Mat4::identity());
        }
        assert!(shader.frame.is_none());
    }

    #[test]
    fn shading_model_dispatch_table() {
        // With a green texel bound, the two table entries must disagree:
        // Lit ignores the texture, Textured samples it.
        let texture = Texture::from_texels(1, 1, vec![0.0, 1.0, 0.0], TextureKind::Diffuse);
        let mut input = input_with_normal_toward_light();
        input.diffuse_texture = Some(&texture);

        let lit = ShadingModel::Lit.function()(&input);
        let textured = ShadingModel::Textured.function()(&input);
        assert_eq!(lit, input.diffuse);
        assert_eq!(textured, Vec3::new(0.0, 1.0, 0.0));
    }
}

//! Surface materials: Phong coefficients plus texture references.
//!
//! The shading model a material uses is resolved once, at load time, from
//! whether it references a diffuse texture. The per-frame path only matches
//! on the resulting [`ShadingModel`] tag (see `shader::ShadingModel::function`),
//! never on the texture reference itself.

use crate::math::Vec3;

/// Which shading function a material dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingModel {
    /// Phong lighting from the material's coefficients alone.
    Lit,
    /// Diffuse texture sample modulated by the Phong terms.
    Textured,
}

/// An immutable-after-load surface description.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Texture references by base file name, resolved through the mesh's
    /// owned texture map at shading time.
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub bump_texture: Option<String>,
    pub shading: ShadingModel,
}

impl Material {
    /// A neutral grey material for meshes without an MTL file.
    pub fn fallback() -> Self {
        Self {
            name: "default".to_string(),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.7),
            specular: Vec3::splat(0.2),
            shininess: 32.0,
            diffuse_texture: None,
            specular_texture: None,
            bump_texture: None,
            shading: ShadingModel::Lit,
        }
    }

    /// Recomputes the shading tag from the current texture references.
    pub fn resolve_shading(&mut self) {
        self.shading = if self.diffuse_texture.is_some() {
            ShadingModel::Textured
        } else {
            ShadingModel::Lit
        };
    }
}

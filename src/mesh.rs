//! In-memory mesh data: flat vertex attribute arrays, per-triangle material
//! indices, the material list, and the exclusively-owned texture set.
//!
//! The layout is de-indexed: every 3 consecutive floats in `positions` form
//! one vertex, and every 3 consecutive vertices form one triangle. All
//! structural invariants are checked once, in [`MeshData::new`]; the render
//! loop indexes without further validation.

use std::collections::HashMap;
use std::path::Path;

use crate::material::Material;
use crate::math::{Vec2, Vec3};
use crate::texture::{Texture, TextureKind};

/// Structural errors caught when assembling a [`MeshData`].
///
/// These are fatal precondition violations at load time; nothing here is
/// recoverable per frame.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("vertex count {0} is not a multiple of 3; mesh was not triangulated")]
    NotTriangulated(usize),

    #[error("attribute arrays disagree: {positions} positions, {normals} normals, {texcoords} texcoords")]
    AttributeMismatch {
        positions: usize,
        normals: usize,
        texcoords: usize,
    },

    #[error("expected one material index per triangle ({triangles}), got {ids}")]
    MaterialIdCount { triangles: usize, ids: usize },

    #[error("triangle {triangle} references material {index}, but only {count} materials exist")]
    MaterialIndexOutOfRange {
        triangle: usize,
        index: usize,
        count: usize,
    },
}

/// The three interpolated attributes of one triangle corner.
#[derive(Clone, Copy, Debug)]
pub struct VertexAttributes {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

/// Axis-aligned 2-D bounds of the mesh's X/Y extent.
///
/// Two dimensions are all the fit-to-window computation needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Immutable-after-load mesh container.
///
/// The only post-load mutation is [`MeshData::add_texture`], the explicit
/// texture-override operation.
#[derive(Debug)]
pub struct MeshData {
    positions: Vec<f32>,      // 3 per vertex
    normals: Vec<f32>,        // 3 per vertex
    texcoords: Vec<f32>,      // 2 per vertex
    material_ids: Vec<usize>, // 1 per triangle
    materials: Vec<Material>,
    textures: HashMap<String, Texture>, // keyed by base file name
}

impl MeshData {
    /// Assembles a mesh, validating every structural invariant.
    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        texcoords: Vec<f32>,
        material_ids: Vec<usize>,
        materials: Vec<Material>,
        textures: HashMap<String, Texture>,
    ) -> Result<Self, MeshError> {
        let vertex_count = positions.len() / 3;
        if positions.len() % 3 != 0 || vertex_count % 3 != 0 {
            return Err(MeshError::NotTriangulated(vertex_count));
        }
        if normals.len() != positions.len() || texcoords.len() != vertex_count * 2 {
            return Err(MeshError::AttributeMismatch {
                positions: positions.len(),
                normals: normals.len(),
                texcoords: texcoords.len(),
            });
        }
        let triangle_count = vertex_count / 3;
        if material_ids.len() != triangle_count {
            return Err(MeshError::MaterialIdCount {
                triangles: triangle_count,
                ids: material_ids.len(),
            });
        }
        if let Some((triangle, &index)) = material_ids
            .iter()
            .enumerate()
            .find(|(_, &id)| id >= materials.len())
        {
            return Err(MeshError::MaterialIndexOutOfRange {
                triangle,
                index,
                count: materials.len(),
            });
        }

        Ok(Self {
            positions,
            normals,
            texcoords,
            material_ids,
            materials,
            textures,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.material_ids.len()
    }

    /// Fetches the three corners of triangle `index`.
    pub fn triangle(&self, index: usize) -> [VertexAttributes; 3] {
        let base = index * 3;
        [
            self.vertex(base),
            self.vertex(base + 1),
            self.vertex(base + 2),
        ]
    }

    fn vertex(&self, v: usize) -> VertexAttributes {
        let p = v * 3;
        let t = v * 2;
        VertexAttributes {
            position: Vec3::new(
                self.positions[p],
                self.positions[p + 1],
                self.positions[p + 2],
            ),
            normal: Vec3::new(self.normals[p], self.normals[p + 1], self.normals[p + 2]),
            texcoord: Vec2::new(self.texcoords[t], self.texcoords[t + 1]),
        }
    }

    /// The material bound to triangle `index`. The index was range-checked
    /// at construction.
    pub fn material_of(&self, index: usize) -> &Material {
        &self.materials[self.material_ids[index]]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Looks up an owned texture by base file name.
    ///
    /// Materials sharing a file name resolve to the same instance.
    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    /// Texture-override operation: loads `path` and stores it under its base
    /// file name, replacing any previous entry with that name.
    ///
    /// An empty path is a no-op, not an error — it is how "no override" is
    /// spelled in the config. For a diffuse override, materials without a
    /// diffuse reference are pointed at the new texture so an untextured
    /// model picks it up.
    pub fn add_texture(&mut self, path: &str, kind: TextureKind) -> Result<(), image::ImageError> {
        if path.is_empty() {
            return Ok(());
        }

        let name = base_name(path);
        let texture = Texture::from_file(path, kind)?;
        self.textures.insert(name.clone(), texture);

        if kind == TextureKind::Diffuse {
            for material in &mut self.materials {
                if material.diffuse_texture.is_none() {
                    material.diffuse_texture = Some(name.clone());
                    material.resolve_shading();
                }
            }
        }
        Ok(())
    }

    /// 2-D bounding box over all vertex X/Y positions, by one linear scan.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);

        for chunk in self.positions.chunks_exact(3) {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
        }

        BoundingBox { min, max }
    }

    pub fn bounding_box_center(&self) -> Vec2 {
        self.bounding_box().center()
    }

    pub fn bounding_box_size(&self) -> Vec2 {
        self.bounding_box().size()
    }
}

/// The final path component, matching how MTL files reference textures.
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A unit cube spanning [-1, 1] on every axis: 12 triangles with flat
    /// face normals, all bound to one fallback material.
    pub(crate) fn cube() -> MeshData {
        let corners = [
            // Six faces, two triangles each, wound consistently.
            [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
            [[-1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
            [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
            [[1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
            [[1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
            [[1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0]],
            [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
            [[-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]],
            [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [[-1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
            [[1.0, -1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0]],
            [[1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0]],
        ];
        let face_normals = [
            [0.0, 0.0, -1.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
        ];

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut texcoords = Vec::new();
        for (i, tri) in corners.iter().enumerate() {
            for corner in tri {
                positions.extend_from_slice(corner);
                normals.extend_from_slice(&face_normals[i / 2]);
                texcoords.extend_from_slice(&[0.0, 0.0]);
            }
        }

        MeshData::new(
            positions,
            normals,
            texcoords,
            vec![0; 12],
            vec![Material::fallback()],
            HashMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn cube_bounding_box_spans_unit_extent() {
        let mesh = cube();
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Vec2::new(-1.0, -1.0));
        assert_eq!(bbox.max, Vec2::new(1.0, 1.0));
        assert_eq!(bbox.center(), Vec2::ZERO);
        assert_eq!(bbox.size(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn rejects_out_of_range_material_index() {
        let err = MeshData::new(
            vec![0.0; 9],
            vec![0.0; 9],
            vec![0.0; 6],
            vec![1],
            vec![Material::fallback()],
            HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MeshError::MaterialIndexOutOfRange { index: 1, .. }
        ));
    }

    #[test]
    fn rejects_non_triangulated_vertices() {
        let err = MeshData::new(
            vec![0.0; 12],
            vec![0.0; 12],
            vec![0.0; 8],
            vec![1],
            vec![Material::fallback()],
            HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::NotTriangulated(4)));
    }

    #[test]
    fn empty_override_path_is_a_no_op() {
        let mut mesh = cube();
        mesh.add_texture("", TextureKind::Diffuse).unwrap();
        assert!(mesh.texture("").is_none());
        assert!(mesh.materials()[0].diffuse_texture.is_none());
    }

    #[test]
    fn triangle_fetch_returns_consecutive_vertices() {
        let mesh = cube();
        let tri = mesh.triangle(0);
        assert_eq!(tri[0].position, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(tri[2].position, Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(tri[1].normal, Vec3::new(0.0, 0.0, -1.0));
    }
}

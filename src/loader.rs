//! OBJ/MTL loading into a validated [`MeshData`].
//!
//! This is the external-parser side of the pipeline: it runs once at
//! startup, returns `Result` all the way up, and nothing in it is touched
//! per frame. `tobj` triangulates and single-indexes the mesh so the output
//! is plain flat arrays; textures referenced by the MTL file are decoded
//! here and stored under their base file name, loading each distinct file
//! once no matter how many materials reference it.

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::material::{Material, ShadingModel};
use crate::math::Vec3;
use crate::mesh::{MeshData, MeshError};
use crate::texture::{Texture, TextureKind};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("failed to decode texture '{name}': {source}")]
    Texture {
        name: String,
        source: image::ImageError,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Loads an OBJ file (and its MTL materials and textures) into a mesh.
///
/// Texture paths in the MTL file are resolved relative to the OBJ's
/// directory, like the reference loaders do.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, LoadError> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let raw_materials = match materials {
        Ok(m) => m,
        Err(e) => {
            // A missing MTL file degrades to the fallback material.
            warn!("no materials for {}: {e}", path.display());
            Vec::new()
        }
    };

    let mut materials: Vec<Material> = raw_materials.iter().map(convert_material).collect();
    if materials.is_empty() {
        materials.push(Material::fallback());
    }

    let mut textures = HashMap::new();
    for material in &raw_materials {
        for (name, kind) in [
            (&material.diffuse_texture, TextureKind::Diffuse),
            (&material.specular_texture, TextureKind::Specular),
            (&material.normal_texture, TextureKind::Bump),
        ] {
            if let Some(name) = name {
                load_texture(base_dir, name, kind, &mut textures)?;
            }
        }
    }

    // De-index every model into one flat triangle soup. With single_index
    // set, one index addresses position, normal, and texcoord together.
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut material_ids = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let material_id = mesh.material_id.unwrap_or(0);
        for &index in &mesh.indices {
            let i = index as usize;
            positions.extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
            if mesh.normals.is_empty() {
                normals.extend_from_slice(&[0.0, 0.0, -1.0]);
            } else {
                normals.extend_from_slice(&mesh.normals[i * 3..i * 3 + 3]);
            }
            if mesh.texcoords.is_empty() {
                texcoords.extend_from_slice(&[0.0, 0.0]);
            } else {
                texcoords.extend_from_slice(&mesh.texcoords[i * 2..i * 2 + 2]);
            }
        }
        material_ids.extend(std::iter::repeat(material_id).take(mesh.indices.len() / 3));
    }

    info!(
        "loaded {}: {} triangles, {} materials, {} textures",
        path.display(),
        material_ids.len(),
        materials.len(),
        textures.len()
    );

    Ok(MeshData::new(
        positions,
        normals,
        texcoords,
        material_ids,
        materials,
        textures,
    )?)
}

fn convert_material(m: &tobj::Material) -> Material {
    let color = |c: Option<[f32; 3]>, fallback: f32| {
        c.map(|[r, g, b]| Vec3::new(r, g, b))
            .unwrap_or(Vec3::splat(fallback))
    };

    let mut material = Material {
        name: m.name.clone(),
        ambient: color(m.ambient, 0.1),
        diffuse: color(m.diffuse, 0.7),
        specular: color(m.specular, 0.2),
        shininess: m.shininess.unwrap_or(32.0),
        diffuse_texture: m.diffuse_texture.as_deref().map(base_name),
        specular_texture: m.specular_texture.as_deref().map(base_name),
        bump_texture: m.normal_texture.as_deref().map(base_name),
        shading: ShadingModel::Lit,
    };
    material.resolve_shading();
    material
}

/// Decodes one texture file unless a texture with the same base name is
/// already loaded — materials sharing a file share the instance.
fn load_texture(
    base_dir: &Path,
    name: &str,
    kind: TextureKind,
    textures: &mut HashMap<String, Texture>,
) -> Result<(), LoadError> {
    let key = base_name(name);
    if textures.contains_key(&key) {
        return Ok(());
    }
    let texture =
        Texture::from_file(base_dir.join(name), kind).map_err(|source| LoadError::Texture {
            name: name.to_string(),
            source,
        })?;
    textures.insert(key, texture);
    Ok(())
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_material_defaults_missing_coefficients() {
        let raw = tobj::Material {
            name: "bare".to_string(),
            ..Default::default()
        };
        let material = convert_material(&raw);
        assert_eq!(material.diffuse, Vec3::splat(0.7));
        assert_eq!(material.shading, ShadingModel::Lit);
    }

    #[test]
    fn convert_material_resolves_textured_shading() {
        let raw = tobj::Material {
            name: "skin".to_string(),
            diffuse_texture: Some("textures/skin.png".to_string()),
            ..Default::default()
        };
        let material = convert_material(&raw);
        assert_eq!(material.diffuse_texture.as_deref(), Some("skin.png"));
        assert_eq!(material.shading, ShadingModel::Textured);
    }

    #[test]
    fn shared_texture_files_load_once() {
        // A second material referencing the same base name must not hit the
        // filesystem again: the path here does not even exist.
        let mut textures = HashMap::new();
        textures.insert(
            "skin.png".to_string(),
            Texture::from_texels(1, 1, vec![0.0; 3], TextureKind::Diffuse),
        );
        load_texture(
            Path::new("/nonexistent"),
            "textures/skin.png",
            TextureKind::Diffuse,
            &mut textures,
        )
        .unwrap();
        assert_eq!(textures.len(), 1);
    }
}

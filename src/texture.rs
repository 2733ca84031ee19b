use std::path::Path;

use crate::math::Vec3;

/// What a texture contributes to shading. Stored alongside the texels so the
/// override operation can tag what it loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Bump,
}

/// A 2D texture holding row-major RGB texels with components in [0, 1].
#[derive(Debug)]
pub struct Texture {
    texels: Vec<f32>, // 3 floats per texel, rows top to bottom
    width: u32,
    height: u32,
    kind: TextureKind,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P, kind: TextureKind) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();

        let texels: Vec<f32> = img
            .pixels()
            .flat_map(|p| p.0.map(|c| c as f32 / 255.0))
            .collect();

        Ok(Self {
            texels,
            width,
            height,
            kind,
        })
    }

    /// Build a texture from raw texels. Used by tests and procedural sources.
    ///
    /// # Panics
    /// Panics if `texels.len() != width * height * 3`.
    pub fn from_texels(width: u32, height: u32, texels: Vec<f32>, kind: TextureKind) -> Self {
        assert_eq!(
            texels.len(),
            (width * height * 3) as usize,
            "texel buffer size doesn't match dimensions"
        );
        Self {
            texels,
            width,
            height,
            kind,
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - UV coordinates are in [0,1] range
    /// - (0,0) = bottom-left in OBJ convention, but textures are stored top-left origin
    /// - We flip V to correct for this: v_corrected = 1.0 - v
    ///
    /// # Wrapping
    /// Uses repeat/wrap mode via rem_euclid for UVs outside [0,1]
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        // Wrap UV coordinates to [0, 1) range using rem_euclid
        // (handles negative values correctly, unlike % operator)
        let u = u.rem_euclid(1.0);

        // Flip V: OBJ uses bottom-left origin, textures use top-left
        let v = (1.0 - v).rem_euclid(1.0);

        // Convert normalized [0,1) UV to texel coordinates [0, width-1]
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        let idx = ((y * self.width + x) * 3) as usize;
        Vec3::new(self.texels[idx], self.texels[idx + 1], self.texels[idx + 2])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }
}

//! Process configuration, loaded once at startup from a RON file.
//!
//! ```ron
//! (
//!     window_width: 800,
//!     window_height: 600,
//!     model_path: "assets/head.obj",
//!     texture_path: "",
//!     eye: (0.0, 0.0, -3.0),
//! )
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::math::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Startup configuration for the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    /// OBJ file to render.
    pub model_path: String,
    /// Diffuse texture override; empty means none.
    #[serde(default)]
    pub texture_path: String,
    /// Eye position in world space.
    #[serde(default = "default_eye")]
    pub eye: (f32, f32, f32),
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_y_degrees: f32,
    #[serde(default = "default_near")]
    pub z_near: f32,
    #[serde(default = "default_far")]
    pub z_far: f32,
}

fn default_eye() -> (f32, f32, f32) {
    (0.0, 0.0, -3.0)
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.eye.0, self.eye.1, self.eye.2)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = ron::from_str(
            r#"(
                window_width: 800,
                window_height: 600,
                model_path: "assets/head.obj",
                texture_path: "assets/head.png",
                eye: (0.0, 1.0, -4.0),
                fov_y_degrees: 60.0,
                z_near: 0.5,
                z_far: 50.0,
            )"#,
        )
        .unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.eye(), Vec3::new(0.0, 1.0, -4.0));
        assert_eq!(config.fov_y_degrees, 60.0);
    }

    #[test]
    fn optional_fields_default() {
        let config: Config = ron::from_str(
            r#"(
                window_width: 640,
                window_height: 480,
                model_path: "assets/cube.obj",
            )"#,
        )
        .unwrap();
        assert_eq!(config.texture_path, "");
        assert_eq!(config.eye(), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(config.z_near, 0.1);
    }
}

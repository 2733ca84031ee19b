//! Camera: an eye position deriving view and projection matrices.
//!
//! # Coordinate System
//!
//! Left-handed: X right, Y up, Z forward into the screen. The camera looks
//! from its eye position toward a target point (scene origin by default).
//!
//! The view and projection matrices are plain functions of the current
//! parameters; they are cached and recomputed whenever the eye position,
//! target, or projection changes.

use crate::math::{Mat4, Vec3};
use crate::projection::Projection;

/// A look-at camera with a perspective projection.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Creates a camera at `eye` looking at the scene origin.
    pub fn new(eye: Vec3, projection: Projection) -> Self {
        let target = Vec3::ZERO;
        let up = Vec3::UP;
        Self {
            eye,
            target,
            up,
            projection,
            view_matrix: Mat4::look_at_lh(eye, target, up),
            projection_matrix: projection.matrix(),
        }
    }

    /// Returns the eye position.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Moves the eye, recomputing the view matrix.
    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        self.recompute_view();
    }

    /// Points the camera at a new target, recomputing the view matrix.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.recompute_view();
    }

    /// Replaces the projection parameters, recomputing the projection matrix.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.projection_matrix = projection.matrix();
    }

    /// Returns the projection parameters.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Camera-to-clip transform.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    fn recompute_view(&mut self) {
        self.view_matrix = Mat4::look_at_lh(self.eye, self.target, self.up);
    }
}

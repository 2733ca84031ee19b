//! Pure matrix-composition helpers for building model transforms.
//!
//! Each function returns `m * op`: with column vectors the new operation is
//! applied to vertices *before* anything already in `m`, i.e. it composes in
//! the matrix's own local space. Repeated calls therefore accumulate in call
//! order, the later call acting closest to the mesh:
//!
//! ```ignore
//! let mut model = Mat4::identity();
//! model = transform::scale(model, Vec3::splat(2.0));
//! model = transform::translate(model, Vec3::new(1.0, 0.0, 0.0));
//! // vertices are translated first, then scaled
//! ```

use crate::math::{Mat4, Vec3};

/// Composes a translation by `t` onto `m`.
pub fn translate(m: Mat4, t: Vec3) -> Mat4 {
    m * Mat4::translation(t)
}

/// Composes a non-uniform scale by `s` onto `m`.
///
/// Negative components mirror an axis; flipping Y this way is how a caller
/// can match a target coordinate system whose rows grow downward.
pub fn scale(m: Mat4, s: Vec3) -> Mat4 {
    m * Mat4::scaling(s)
}

/// Composes a rotation of `angle` radians about `axis` onto `m`.
pub fn rotate(m: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    m * Mat4::rotation_axis(angle, axis)
}

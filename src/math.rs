//! Matrix construction helpers.
//!
//! Thin wrappers over `cgmath` that keep the legacy GL calling conventions
//! the scene code uses: angles in degrees and rotation about an arbitrary,
//! not necessarily unit-length, axis.

use cgmath::{Deg, InnerSpace, Matrix4, SquareMatrix, Vector3};

/// Translation by `(dx, dy, dz)`.
pub fn translation(dx: f32, dy: f32, dz: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(dx, dy, dz))
}

/// Rotation of `angle_deg` degrees around the axis `(rx, ry, rz)`.
///
/// The axis is normalized first. A zero axis yields the identity.
pub fn rotation(angle_deg: f32, rx: f32, ry: f32, rz: f32) -> Matrix4<f32> {
    let axis = Vector3::new(rx, ry, rz);
    if axis.magnitude2() == 0.0 {
        return Matrix4::identity();
    }
    Matrix4::from_axis_angle(axis.normalize(), Deg(angle_deg))
}

/// Non-uniform scale by `(sx, sy, sz)`.
pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(sx, sy, sz)
}

/// Right-handed perspective projection with a vertical field of view given
/// in degrees, matching the classic `gluPerspective` matrix.
pub fn perspective(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::perspective(Deg(fovy_deg), aspect, near, far)
}

/// Orthographic projection over the given box, matching `glOrtho`.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::ortho(left, right, bottom, top, near, far)
}

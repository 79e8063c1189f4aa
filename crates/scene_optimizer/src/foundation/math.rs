//! Math utilities and types
//!
//! Provides fundamental math types for scene-graph work.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Check that every element of a matrix is a finite number
///
/// A NaN or infinite local transform corrupts the world matrix of the whole
/// subtree below it, so transforms are validated before traversal instead of
/// silently producing a broken output scene.
pub fn mat4_is_finite(m: &Mat4) -> bool {
    m.iter().all(|v| v.is_finite())
}

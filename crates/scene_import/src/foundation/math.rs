//! Math utilities and types
//!
//! Provides the vector and matrix types shared by the foreign scene record and
//! the render scene.

pub use nalgebra::{Vector2, Vector3, Matrix3, Matrix4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Threshold below which a scalar material property counts as absent
pub const PROPERTY_EPSILON: f32 = 1e-5;

/// Math utility functions
pub mod utils {
    use super::{Mat3, Mat4, Vec3};

    /// Check whether a scalar property is active (strictly above the epsilon)
    pub fn is_active(value: f32) -> bool {
        value > super::PROPERTY_EPSILON
    }

    /// Transform a point by an affine matrix
    pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
        let p = matrix.transform_point(&nalgebra::Point3::from(*point));
        p.coords
    }

    /// Matrix used to carry normals through `matrix` (inverse transpose of the
    /// upper 3x3 block). Falls back to identity for singular matrices.
    pub fn normal_matrix(matrix: &Mat4) -> Mat3 {
        let linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map_or_else(Mat3::identity, |inverse| inverse.transpose())
    }

    /// Component-wise power
    pub fn pow(base: &Vec3, exponent: &Vec3) -> Vec3 {
        base.zip_map(exponent, f32::powf)
    }

    /// Bit pattern of a float, with -0.0 folded onto 0.0
    pub fn float_key(value: f32) -> u32 {
        if value == 0.0 {
            0
        } else {
            value.to_bits()
        }
    }
}

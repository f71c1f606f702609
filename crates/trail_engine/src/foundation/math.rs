//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the few vector helpers the trail
//! geometry needs.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Magnitude below which a direction is treated as degenerate
pub const DEGENERATE_EPSILON: f32 = 1.0e-12;

/// Math utility functions
pub mod utils {
    use super::{Vec3, DEGENERATE_EPSILON};

    /// Build a `Vec3` from a plain array (configuration and vertex data)
    pub fn vec3_from_array(values: [f32; 3]) -> Vec3 {
        Vec3::new(values[0], values[1], values[2])
    }

    /// Convert a `Vec3` into a plain array for GPU-facing structs
    pub fn vec3_to_array(v: &Vec3) -> [f32; 3] {
        [v.x, v.y, v.z]
    }

    /// Exact comparison against the zero vector, no tolerance
    pub fn is_exact_zero(v: &Vec3) -> bool {
        v.x == 0.0 && v.y == 0.0 && v.z == 0.0
    }

    /// Unit vector perpendicular to `direction`
    ///
    /// Crosses with the world axis least aligned to `direction`. A zero
    /// `direction` yields the X axis.
    pub fn any_perpendicular(direction: &Vec3) -> Vec3 {
        let abs = direction.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vec3::x()
        } else if abs.y <= abs.z {
            Vec3::y()
        } else {
            Vec3::z()
        };

        direction
            .cross(&axis)
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or_else(Vec3::x)
    }
}

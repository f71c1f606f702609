//! Minimal camera used to supply the billboarding view direction

use crate::foundation::math::{Vec3, DEGENERATE_EPSILON};

/// Viewer position and look-at target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,
}

impl Camera {
    /// Create a camera looking from `position` at `target`
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Unit view direction
    ///
    /// Falls back to -Z when position and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_is_normalized() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_forward_of_coincident_points() {
        let camera = Camera::look_at(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0));
    }
}

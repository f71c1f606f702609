//! One rigid segment of a trail's centerline

use crate::foundation::math::Vec3;

/// Segment of a trail between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Where the segment begins (older end)
    pub start_point: Vec3,

    /// Where the segment ends (newer end)
    pub end_point: Vec3,
}

impl Quad {
    /// Create a new quad
    pub fn new(start_point: Vec3, end_point: Vec3) -> Self {
        Self { start_point, end_point }
    }

    /// Distance between the start and end points
    pub fn length(&self) -> f32 {
        (self.end_point - self.start_point).norm()
    }
}

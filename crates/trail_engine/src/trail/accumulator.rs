//! Trail accumulator for projectile trails

use crate::core::TrailConfig;
use crate::foundation::math::{utils, Vec3};
use super::Quad;

/// Offset added to a start position that is exactly the origin
///
/// Billboarding crosses the view direction with each point, and the cross
/// product with the zero vector is zero.
pub const ZERO_START_NUDGE: Vec3 = Vec3::new(0.01, 0.01, 0.01);

/// Polyline of quads following one projectile
///
/// The newest quad keeps stretching while it is shorter than
/// `max_segment_length`; once it reaches that length the next move starts a
/// new quad at its end point. Every quad except the newest is frozen.
#[derive(Debug, Clone)]
pub struct Trail {
    quads: Vec<Quad>,
    max_segment_length: f32,
    quad_width: f32,
}

impl Trail {
    /// Create an empty trail
    pub fn new(max_segment_length: f32, quad_width: f32) -> Self {
        Self::with_capacity(max_segment_length, quad_width, 0)
    }

    /// Create an empty trail with room for `capacity` quads
    pub fn with_capacity(max_segment_length: f32, quad_width: f32, capacity: usize) -> Self {
        Self {
            quads: Vec::with_capacity(capacity),
            max_segment_length,
            quad_width,
        }
    }

    /// Create an empty trail from configuration
    pub fn from_config(config: &TrailConfig) -> Self {
        Self::with_capacity(
            config.max_segment_length,
            config.quad_width,
            config.initial_quad_capacity,
        )
    }

    /// Extend the trail to `end_point`
    ///
    /// `fallback_start` is only used for the first quad of an empty trail,
    /// normally the emitter position.
    pub fn expand(&mut self, end_point: Vec3, fallback_start: Vec3) {
        if let Some(last) = self.quads.last_mut() {
            if last.length() < self.max_segment_length {
                last.end_point = end_point;
                return;
            }
        }

        let start = self.quads.last().map_or(fallback_start, |last| last.end_point);
        let start_point = if utils::is_exact_zero(&start) {
            start + ZERO_START_NUDGE
        } else {
            start
        };

        self.quads.push(Quad::new(start_point, end_point));
    }

    /// Start over as a fresh trail with `config` geometry
    ///
    /// Existing storage is kept and topped up to the configured capacity.
    pub fn reset(&mut self, config: &TrailConfig) {
        self.quads.clear();
        self.quads.reserve(config.initial_quad_capacity);
        self.max_segment_length = config.max_segment_length;
        self.quad_width = config.quad_width;
    }

    /// Drop every quad, keeping the trail and its storage for reuse
    pub fn clear(&mut self) {
        self.quads.clear();
    }

    /// Number of quads in the trail
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Whether the trail has no geometry
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Quads in order from oldest to newest
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Ribbon width
    pub fn quad_width(&self) -> f32 {
        self.quad_width
    }

    /// Length at which the newest quad stops stretching
    pub fn max_segment_length(&self) -> f32 {
        self.max_segment_length
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::from_config(&TrailConfig::default())
    }
}

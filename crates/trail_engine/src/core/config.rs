//! # Trail Configuration
//!
//! Per-trail geometry settings and the renderer-wide settings that size the
//! slot array and choose how meshes are generated each frame.
//!
//! Both structs serialize to TOML or RON through [`Config`]. Values are fixed
//! once a trail is created; there is no runtime reconfiguration of live
//! trails.

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{utils, Vec3};

/// Default ribbon width in world units
pub const DEFAULT_QUAD_WIDTH: f32 = 0.5;

/// Default maximum length of a single trail segment
pub const DEFAULT_MAX_SEGMENT_LENGTH: f32 = 20.0;

/// Default number of quads reserved up front for each trail
pub const DEFAULT_INITIAL_QUAD_CAPACITY: usize = 1000;

/// Default number of projectile slots
pub const DEFAULT_MAX_TRACKED_OBJECTS: usize = 100;

/// Default per-frame vertex limit, everything `u32` indices can address
pub const DEFAULT_MAX_FRAME_VERTICES: usize = u32::MAX as usize;

/// # Trail Configuration
///
/// Geometry settings applied to every trail when it is (re)created.
/// Shorter segments make trails smoother but produce more quads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Width of the ribbon in world units
    pub quad_width: f32,
    /// Maximum length of a quad before a new one is started
    pub max_segment_length: f32,
    /// Quads reserved per trail so steady-state expansion does not reallocate
    pub initial_quad_capacity: usize,
}

impl TrailConfig {
    /// Create a trail configuration with default capacity
    pub fn new(max_segment_length: f32, quad_width: f32) -> Self {
        Self {
            quad_width,
            max_segment_length,
            initial_quad_capacity: DEFAULT_INITIAL_QUAD_CAPACITY,
        }
    }

    /// Set the number of quads reserved per trail
    pub fn with_initial_quad_capacity(mut self, capacity: usize) -> Self {
        self.initial_quad_capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.quad_width.is_finite() && self.quad_width > 0.0) {
            return Err(format!("Quad width must be positive, got {}", self.quad_width));
        }

        if !(self.max_segment_length.is_finite() && self.max_segment_length > 0.0) {
            return Err(format!(
                "Max segment length must be positive, got {}",
                self.max_segment_length
            ));
        }

        Ok(())
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEGMENT_LENGTH, DEFAULT_QUAD_WIDTH)
    }
}

/// # Trail Renderer Configuration
///
/// Settings for the lifecycle router and the per-frame compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailRendererConfig {
    /// Number of projectile slots, valid slots are `[0, max_tracked_objects)`
    pub max_tracked_objects: usize,
    /// Where projectiles are fired from; first quads start here
    pub emitter_position: [f32; 3],
    /// Generate per-trail meshes on the rayon pool instead of inline
    pub parallel_generation: bool,
    /// Frames needing more merged vertices than this are dropped
    pub max_frame_vertices: usize,
    /// Geometry applied to every trail
    pub trail: TrailConfig,
}

impl TrailRendererConfig {
    /// Create a renderer configuration for `max_tracked_objects` slots
    pub fn new(max_tracked_objects: usize) -> Self {
        Self {
            max_tracked_objects,
            emitter_position: [0.0, 0.0, 0.0],
            parallel_generation: true,
            max_frame_vertices: DEFAULT_MAX_FRAME_VERTICES,
            trail: TrailConfig::default(),
        }
    }

    /// Set the emitter position
    pub fn with_emitter_position(mut self, position: Vec3) -> Self {
        self.emitter_position = utils::vec3_to_array(&position);
        self
    }

    /// Enable or disable parallel mesh generation
    pub fn with_parallel_generation(mut self, enabled: bool) -> Self {
        self.parallel_generation = enabled;
        self
    }

    /// Set the per-frame vertex limit
    pub fn with_max_frame_vertices(mut self, max_vertices: usize) -> Self {
        self.max_frame_vertices = max_vertices;
        self
    }

    /// Set per-trail geometry
    pub fn with_trail(mut self, trail: TrailConfig) -> Self {
        self.trail = trail;
        self
    }

    /// Emitter position as a vector
    pub fn emitter_position(&self) -> Vec3 {
        utils::vec3_from_array(self.emitter_position)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tracked_objects == 0 {
            return Err("Max tracked objects must be at least 1".to_string());
        }

        if self.emitter_position.iter().any(|c| !c.is_finite()) {
            return Err("Emitter position must be finite".to_string());
        }

        if self.max_frame_vertices < 4 {
            return Err(format!(
                "Max frame vertices must fit at least one quad (4), got {}",
                self.max_frame_vertices
            ));
        }

        self.trail.validate()
    }

    /// Validate, converting the message into a [`ConfigError`]
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(ConfigError::Invalid)?;
        Ok(self)
    }
}

impl Default for TrailRendererConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACKED_OBJECTS)
    }
}

impl Config for TrailRendererConfig {}

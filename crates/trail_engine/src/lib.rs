//! # Trail Engine
//!
//! Camera-facing ribbon trails for fast-moving projectiles.
//!
//! ## Features
//!
//! - **Bounded trails**: each projectile's path is stored as a few long quads;
//!   small per-frame moves stretch the newest quad instead of adding one
//! - **Billboarded ribbons**: every quad endpoint is widened sideways so the
//!   ribbon always faces the camera
//! - **One upload per frame**: all trails are merged into a single
//!   vertex/index buffer with one triangle-list sub-mesh
//! - **Parallel generation**: per-trail meshes are built on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trail_engine::prelude::*;
//!
//! struct NullBackend;
//!
//! impl TrailRenderBackend for NullBackend {
//!     fn upload_trail_mesh(&mut self, upload: &MeshUpload<'_>) -> BackendResult<()> {
//!         println!("{} vertices", upload.vertex_count());
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), TrailError> {
//!     let mut trails = TrailSystem::new(TrailRendererConfig::default())?;
//!     trails.on_projectile_created(0, Vec3::new(0.0, 1.0, 0.0));
//!     trails.on_projectile_moved(0, Vec3::new(0.0, 1.0, 5.0));
//!
//!     let camera = Camera::look_at(Vec3::new(10.0, 2.0, 0.0), Vec3::zeros());
//!     let outcome = trails.late_update(&camera, &mut NullBackend);
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

pub mod core;
pub mod foundation;
pub mod config;
pub mod trail;
pub mod render;
pub mod events;
pub mod systems;

use thiserror::Error;

/// Crate-level errors
#[derive(Error, Debug)]
pub enum TrailError {
    /// Configuration failed to load or validate
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Frame buffers could not be reserved
    #[error("Failed to allocate frame buffers for {vertices} vertices and {indices} indices")]
    Allocation {
        /// Requested vertex count
        vertices: usize,
        /// Requested index count
        indices: usize,
    },

    /// The render backend rejected the frame
    #[error("Render error: {0}")]
    Render(#[from] render::RenderError),
}

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        TrailError,
        config::{Config, ConfigError},
        core::{TrailConfig, TrailRendererConfig},
        events::{ProjectileEvent, ProjectileListener, Slot},
        foundation::math::Vec3,
        render::{
            BackendResult, Camera, FrameStats, MeshUpload, RenderError,
            TrailRenderBackend, Vertex,
        },
        systems::{FrameOutcome, TrailSystem},
        trail::{Quad, Trail},
    };
}

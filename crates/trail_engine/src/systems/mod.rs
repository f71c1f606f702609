//! Systems that tie trails to the projectile lifecycle

pub mod trail_system;

pub use trail_system::{FrameOutcome, TrailSystem};

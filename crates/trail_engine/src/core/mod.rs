//! # Core Module
//!
//! Configuration types shared by the trail accumulator, the frame
//! compositor and the lifecycle router.

pub mod config;

pub use config::{TrailConfig, TrailRendererConfig};
pub use crate::config::{Config, ConfigError};

//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and the billboarding helpers built on them
//! - Logging setup

pub mod math;
pub mod logging;

//! Trail accumulation
//!
//! A trail is the path of one projectile stored as a short list of rigid
//! quads. Frequent small moves stretch the newest quad; a new quad is only
//! started once the newest one reaches the configured segment length.

pub mod quad;
pub mod accumulator;

pub use quad::Quad;
pub use accumulator::{Trail, ZERO_START_NUDGE};

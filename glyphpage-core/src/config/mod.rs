//! Configuration types
//!
//! Device geometry presets and the display settings applied at init.

pub mod geometry;
pub mod types;

pub use geometry::*;
pub use types::*;

//! # EMBER Shared
//!
//! Geometry helpers used by scripts, the menu overlay and the housekeeping
//! thread.
//!
//! ## RULE
//!
//! This crate must NEVER depend on the menu or on any host binding.
//! Anything that needs to draw belongs in `ember_menu`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod geometry;
pub mod math;

pub use geometry::{Circle, Polygon, Segment};
pub use math::{Vec2, Vec3};

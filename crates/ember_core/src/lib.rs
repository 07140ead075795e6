//! # EMBER Core
//!
//! The only place in EMBER where a second thread exists.
//!
//! ## Architecture Rules
//!
//! 1. **The draw thread never waits on housekeeping** - it clones an `Arc`
//! 2. **Published lists are immutable** - a new list replaces the old one
//! 3. **Shutdown is a signal, not a drain** - the thread exits at its next tick
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_core::{Housekeeper, SnapshotBuffer};
//!
//! let buffer = SnapshotBuffer::new();
//! let keeper = Housekeeper::spawn(buffer.clone(), interval, move || collect_objects());
//! // draw thread
//! for object in buffer.snapshot().iter() { /* draw */ }
//! keeper.stop();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod housekeeping;
pub mod sync;

pub use housekeeping::{ordered_by_distance, Housekeeper, Renderable};
pub use sync::{Snapshot, SnapshotBuffer};

//! # Snapshot Publication Between Housekeeping and Draw
//!
//! ## The Problem
//!
//! ```text
//! Housekeeping thread:  REBUILD the overlay object list every few ms
//! Draw thread:          ITERATE the overlay object list every frame
//!
//! Reassigning a shared list without synchronization: TORN READS
//! Mutating the list in place:                         ITERATOR INVALIDATION
//! ```
//!
//! ## The Solution: Reference Replacement
//!
//! ```text
//! Housekeeping builds list N+1 off to the side
//!   SWAP (pointer exchange under a lock held for one store)
//! Draw thread keeps its clone of list N until it is done with it
//! ```

mod snapshot;

pub use snapshot::{Snapshot, SnapshotBuffer};

//! # Snapshot Buffer
//!
//! Double buffering by reference: the published list lives behind an `Arc`,
//! readers clone the `Arc`, writers build a fresh list and swap the pointer.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │        SnapshotBuffer        │
//!            │  RwLock<Arc<[T]>> + counter  │
//!            └──────────────┬───────────────┘
//!                           │
//!           ┌───────────────┴───────────────┐
//!           ▼                               ▼
//!   ┌──────────────┐                ┌──────────────┐
//!   │   publish    │                │   snapshot   │
//!   │ (housekeeper)│                │ (draw thread)│
//!   └──────────────┘                └──────────────┘
//! ```
//!
//! The lock only guards the pointer, never the list: `publish` holds the
//! write lock for a single store and `snapshot` holds the read lock for a
//! single refcount increment.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared, swappable, immutable list.
///
/// Cloning the buffer clones the handle; every clone sees the same
/// published list.
pub struct SnapshotBuffer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// The currently published list.
    current: RwLock<Arc<[T]>>,
    /// Number of lists published so far.
    generation: AtomicU64,
}

impl<T> SnapshotBuffer<T> {
    /// Creates a buffer holding an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Vec::new())
    }

    /// Creates a buffer holding `items` as generation zero.
    #[must_use]
    pub fn with_initial(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(Arc::from(items)),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Replaces the published list.
    ///
    /// Readers holding an older [`Snapshot`] keep iterating their own copy.
    pub fn publish(&self, items: Vec<T>) {
        let fresh: Arc<[T]> = Arc::from(items);
        let previous = {
            let mut current = self.inner.current.write();
            std::mem::replace(&mut *current, fresh)
        };
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        // Last reference to the old list drops outside the lock.
        drop(previous);
    }

    /// Returns the currently published list.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        let items = Arc::clone(&self.inner.current.read());
        Snapshot {
            items,
            generation: self.inner.generation.load(Ordering::Acquire),
        }
    }

    /// Number of lists published since creation.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }
}

impl<T> Clone for SnapshotBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SnapshotBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read handle for the draw thread.
///
/// Holds the list alive for as long as the handle exists, regardless of
/// later publications.
pub struct Snapshot<T> {
    items: Arc<[T]>,
    generation: u64,
}

impl<T> Snapshot<T> {
    /// Generation observed when the snapshot was taken.
    ///
    /// May lag the list by one publication if a swap raced the read; the
    /// list itself is always a complete, consistent publication.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_publish_replaces_list() {
        let buffer = SnapshotBuffer::with_initial(vec![1, 2, 3]);
        assert_eq!(&*buffer.snapshot(), &[1, 2, 3]);

        buffer.publish(vec![4]);
        assert_eq!(&*buffer.snapshot(), &[4]);
        assert_eq!(buffer.generation(), 1);
    }

    #[test]
    fn test_old_snapshot_survives_publish() {
        let buffer = SnapshotBuffer::with_initial(vec![1, 2, 3]);
        let old = buffer.snapshot();

        buffer.publish(vec![9, 9]);

        assert_eq!(&*old, &[1, 2, 3]);
        assert_eq!(&*buffer.snapshot(), &[9, 9]);
    }

    #[test]
    fn test_concurrent_reads_never_torn() {
        // Every published list is uniform: all elements equal its length.
        let buffer = SnapshotBuffer::with_initial(vec![1usize]);
        let writer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for n in 1..=500usize {
                    buffer.publish(vec![n; n]);
                }
            })
        };

        for _ in 0..2_000 {
            let snap = buffer.snapshot();
            let len = snap.len();
            assert!(snap.iter().all(|&v| v == len), "torn snapshot of length {len}");
        }

        writer.join().expect("writer thread panicked");
        assert_eq!(buffer.snapshot().len(), 500);
    }
}

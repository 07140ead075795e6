//! # Housekeeping Thread
//!
//! Recomputes the list of overlay objects on a fixed interval and publishes
//! it to a [`SnapshotBuffer`]. The draw thread only ever reads snapshots.
//!
//! ```text
//! ┌───────────────┐  every `interval`   ┌────────────────┐
//! │  Housekeeper  │ ──── publish ─────▶ │ SnapshotBuffer │ ◀── draw thread
//! └──────┬────────┘                     └────────────────┘
//!        │ stop signal (crossbeam channel)
//!        ▼
//!      exit at next tick
//! ```

use std::cmp::Ordering;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use ember_shared::Vec3;

use crate::sync::SnapshotBuffer;

/// An object the overlay may draw in world space.
pub trait Renderable {
    /// World position used for ordering.
    fn world_position(&self) -> Vec3;

    /// Whether the object should be drawn at all this cycle.
    fn is_visible(&self) -> bool;
}

/// Drops invisible objects and orders the rest far-to-near from `viewpoint`.
///
/// Far-to-near is painter's order: nearer overlays are drawn last and end up
/// on top.
#[must_use]
pub fn ordered_by_distance<T: Renderable>(objects: Vec<T>, viewpoint: Vec3) -> Vec<T> {
    let mut keyed: Vec<(f32, T)> = objects
        .into_iter()
        .filter(Renderable::is_visible)
        .map(|object| (object.world_position().distance_squared(viewpoint), object))
        .collect();
    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, object)| object).collect()
}

/// Handle to the running housekeeping thread.
pub struct Housekeeper {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Housekeeper {
    /// Name given to the spawned thread.
    pub const THREAD_NAME: &'static str = "ember-housekeeping";

    /// Spawns the housekeeping loop.
    ///
    /// `source` runs on the housekeeping thread once per `interval` and its
    /// result replaces the published list.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<T, F>(
        buffer: SnapshotBuffer<T>,
        interval: Duration,
        mut source: F,
    ) -> std::io::Result<Self>
    where
        T: Send + Sync + 'static,
        F: FnMut() -> Vec<T> + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(Self::THREAD_NAME.to_string())
            .spawn(move || {
                tracing::debug!("housekeeping started, interval {:?}", interval);
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => buffer.publish(source()),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("housekeeping stopped after {} publications", buffer.generation());
            })?;

        Ok(Self {
            stop_tx,
            handle: Some(handle),
        })
    }

    /// Signals the thread to exit and waits for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("housekeeping thread panicked");
            }
        }
    }
}

impl Drop for Housekeeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;
    use std::time::Instant;

    #[derive(Clone, Debug, PartialEq)]
    struct Marker {
        id: u32,
        position: Vec3,
        visible: bool,
    }

    impl Renderable for Marker {
        fn world_position(&self) -> Vec3 {
            self.position
        }

        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    fn marker(id: u32, x: f32, visible: bool) -> Marker {
        Marker {
            id,
            position: Vec3::new(x, 0.0, 0.0),
            visible,
        }
    }

    #[test]
    fn test_ordering_far_to_near_drops_hidden() {
        let objects = vec![
            marker(1, 1.0, true),
            marker(2, 10.0, true),
            marker(3, 5.0, false),
            marker(4, 3.0, true),
        ];

        let ordered = ordered_by_distance(objects, Vec3::ZERO);
        let ids: Vec<u32> = ordered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_housekeeper_publishes_and_stops() {
        let buffer = SnapshotBuffer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let keeper = Housekeeper::spawn(buffer.clone(), Duration::from_millis(1), move || {
            let n = counter.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            vec![n]
        })
        .expect("spawn housekeeping");

        let deadline = Instant::now() + Duration::from_secs(5);
        while buffer.generation() < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        keeper.stop();

        assert!(buffer.generation() >= 3);
        let published = calls.load(AtomicOrdering::SeqCst);
        assert_eq!(buffer.snapshot()[0], published);
    }
}

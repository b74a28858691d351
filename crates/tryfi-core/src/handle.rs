use std::sync::Arc;

use tokio::sync::watch;

use crate::snapshot::Snapshot;

/// Read-only capability to fetch whatever snapshot is current right now.
///
/// Cloning is cheap; every clone observes the same swaps.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    rx: watch::Receiver<Option<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    pub fn new(rx: watch::Receiver<Option<Arc<Snapshot>>>) -> Self {
        Self { rx }
    }

    /// Handle pinned to one snapshot that never changes.
    pub fn fixed(snapshot: Snapshot) -> Self {
        let (_tx, rx) = watch::channel(Some(Arc::new(snapshot)));
        Self { rx }
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.rx.borrow().clone()
    }

    /// Waits for the next swap. Returns `false` once the publisher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

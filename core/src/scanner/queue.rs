use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ports waiting to be attempted, drained by every worker of a pool.
///
/// Workers pop in queue order, so a single worker visits ports exactly as they
/// were enqueued.
#[derive(Debug)]
pub(crate) struct PortQueue {
    ports: Vec<u16>,
    cursor: AtomicUsize,
}

impl PortQueue {
    pub(crate) fn new(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next port with its position in the queue, or `None` once drained.
    pub(crate) fn pop(&self) -> Option<(usize, u16)> {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.ports.get(idx).map(|port| (idx, *port))
    }

    pub(crate) fn len(&self) -> usize {
        self.ports.len()
    }

    /// Size of the pool for this queue. Zero when there is nothing to do.
    pub(crate) fn worker_count(&self, concurrency: NonZeroUsize) -> usize {
        concurrency.get().min(self.len())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

// Tue Jan 13 2026 - Alex

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;

/// File paths waiting to be scanned.
///
/// The queue is filled once through [`WorkQueue::seed`] and is read-only from
/// then on apart from [`WorkQueue::pop`], which never blocks.
pub struct WorkQueue {
    paths: Mutex<VecDeque<PathBuf>>,
    seeded: usize,
}

impl WorkQueue {
    pub fn seed<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let paths: VecDeque<PathBuf> = paths.into_iter().collect();
        let seeded = paths.len();
        Self {
            paths: Mutex::new(paths),
            seeded,
        }
    }

    pub fn pop(&self) -> Option<PathBuf> {
        self.paths.lock().pop_front()
    }

    pub fn seeded(&self) -> usize {
        self.seeded
    }

}

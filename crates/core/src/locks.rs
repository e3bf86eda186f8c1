// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldops_domain::JobOrderId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Per-job-order mutual exclusion.
///
/// Commits on the same job order run one at a time; commits on different job
/// orders do not wait for each other. Entries are dropped once nobody holds
/// or waits for them.
#[derive(Debug, Default)]
pub struct JobOrderLocks {
    entries: Mutex<HashMap<JobOrderId, Arc<Mutex<()>>>>,
}

impl JobOrderLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `id`.
    pub fn with_lock<T>(&self, id: JobOrderId, f: impl FnOnce() -> T) -> T {
        let entry: Arc<Mutex<()>> = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(id).or_default())
        };

        let result: T = {
            let _guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours.
        if Arc::strong_count(&entry) == 2 {
            entries.remove(&id);
        }
        result
    }

    /// Number of job orders currently locked or awaited.
    #[must_use]
    pub fn active(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

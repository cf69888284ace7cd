// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-file-path write-exclusive locking (spec.md §5).
//!
//! The read path for every log in this crate is lock-free; only the
//! append path takes a lock, and it takes exactly one mutex scoped to
//! the file being written, not a single global lock across every log.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A registry handing out one [`Mutex`] per distinct file path,
/// created lazily on first use and reused thereafter.
#[derive(Debug, Default)]
pub(crate) struct FileLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The write-exclusive lock guarding `path`. Holding the returned
    /// guard serializes appends to this one file only; appends to any
    /// other path proceed concurrently.
    pub(crate) fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_returns_same_lock() {
        let locks = FileLocks::new();
        let a = locks.lock_for(Path::new("/tmp/a.log"));
        let b = locks.lock_for(Path::new("/tmp/a.log"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_paths_return_different_locks() {
        let locks = FileLocks::new();
        let a = locks.lock_for(Path::new("/tmp/a.log"));
        let b = locks.lock_for(Path::new("/tmp/b.log"));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}

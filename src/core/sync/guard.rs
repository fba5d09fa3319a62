//! Single-flight run guard

use crate::domain::{Result, SyncError};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Process-wide run lock shared by every trigger source
///
/// Acquisition is a non-blocking check-and-set: a trigger that finds the lock
/// held is rejected rather than queued.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    lock: Arc<Mutex<()>>,
}

/// Proof of holding the run lock; released on drop
#[derive(Debug)]
pub struct RunPermit {
    _guard: OwnedMutexGuard<()>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the run lock if it is free
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConcurrentRunRejected`] while another permit is alive.
    pub fn try_acquire(&self) -> Result<RunPermit> {
        self.lock
            .clone()
            .try_lock_owned()
            .map(|guard| RunPermit { _guard: guard })
            .map_err(|_| SyncError::ConcurrentRunRejected)
    }

    /// Whether a run currently holds the lock
    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let guard = RunGuard::new();
        let permit = guard.try_acquire().unwrap();
        assert!(guard.is_running());

        let second = guard.clone().try_acquire();
        assert!(matches!(second, Err(SyncError::ConcurrentRunRejected)));

        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_ok());
    }
}

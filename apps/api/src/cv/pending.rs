//! In-flight fix tracking: at most one fix per source version at a time.
//!
//! The guard releases its slot on drop, so a cancelled or timed-out request
//! leaves nothing behind.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

#[derive(Debug, Default)]
pub struct PendingFixes {
    in_flight: Mutex<HashSet<Uuid>>,
}

impl PendingFixes {
    /// Claims `version_id`. `None` when a fix for it is already running.
    pub fn try_begin(self: &Arc<Self>, version_id: Uuid) -> Option<PendingFixGuard> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(version_id) {
            return None;
        }
        Some(PendingFixGuard {
            owner: Arc::clone(self),
            version_id,
        })
    }

    #[cfg(test)]
    pub fn is_pending(&self, version_id: Uuid) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&version_id)
    }
}

#[derive(Debug)]
pub struct PendingFixGuard {
    owner: Arc<PendingFixes>,
    version_id: Uuid,
}

impl Drop for PendingFixGuard {
    fn drop(&mut self) {
        self.owner
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.version_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_rejected_until_release() {
        let pending = Arc::new(PendingFixes::default());
        let id = Uuid::new_v4();

        let guard = pending.try_begin(id).expect("first claim");
        assert!(pending.try_begin(id).is_none());
        assert!(pending.is_pending(id));

        drop(guard);
        assert!(!pending.is_pending(id));
        assert!(pending.try_begin(id).is_some());
    }

    #[test]
    fn test_claims_are_per_version() {
        let pending = Arc::new(PendingFixes::default());
        let _a = pending.try_begin(Uuid::new_v4()).unwrap();
        assert!(pending.try_begin(Uuid::new_v4()).is_some());
    }

    #[tokio::test]
    async fn test_cancelled_task_releases_claim() {
        let pending = Arc::new(PendingFixes::default());
        let id = Uuid::new_v4();

        let task = {
            let pending = Arc::clone(&pending);
            tokio::spawn(async move {
                let _guard = pending.try_begin(id);
                std::future::pending::<()>().await;
            })
        };
        tokio::task::yield_now().await;
        while !pending.is_pending(id) {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;
        assert!(!pending.is_pending(id));
    }
}

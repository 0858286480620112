//! # Set of tasks currently executing.
//!
//! Tracks `task id → name` for every task whose worker has not finished yet.
//! Names are not unique, so entries are keyed by the manager-local id.
//! Used for [`TaskManager::running_count`](crate::TaskManager::running_count) and to
//! name the stuck tasks when a shutdown exceeds its grace period.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub(crate) struct RunningSet {
    tasks: Mutex<HashMap<u64, Arc<str>>>,
}

impl RunningSet {
    pub(crate) fn insert(&self, id: u64, name: Arc<str>) {
        self.lock().insert(id, name);
    }

    pub(crate) fn remove(&self, id: u64) {
        self.lock().remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns sorted names of running tasks (duplicates kept).
    pub(crate) fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().values().map(|n| n.to_string()).collect();
        names.sort_unstable();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Arc<str>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_tracked_by_id() {
        let set = RunningSet::default();
        set.insert(1, Arc::from("ping"));
        set.insert(2, Arc::from("ping"));
        set.insert(3, Arc::from("audit"));
        assert_eq!(set.snapshot(), vec!["audit", "ping", "ping"]);

        set.remove(2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.snapshot(), vec!["audit", "ping"]);
    }
}

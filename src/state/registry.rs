use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::SubscriberId;

/// Set of chat identities that receive notifications.
///
/// Safe to share between the scheduler and command handlers; every
/// operation takes the lock only for its own duration.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    ids: Mutex<BTreeSet<SubscriberId>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<SubscriberId>> {
        // The set is always left consistent, so a poisoned lock is still usable
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if the id was not already subscribed.
    pub fn add(&self, id: SubscriberId) -> bool {
        self.lock().insert(id)
    }

    /// Returns `true` if the id was subscribed.
    pub fn remove(&self, id: SubscriberId) -> bool {
        self.lock().remove(&id)
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.lock().contains(&id)
    }

    /// Point-in-time copy, ordered by id.
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        self.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_add_and_remove_report_changes() {
        let registry = SubscriberRegistry::new();
        assert!(registry.add(SubscriberId(1)));
        assert!(!registry.add(SubscriberId(1)));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(SubscriberId(1)));
        assert!(!registry.remove(SubscriberId(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_ordered_copy() {
        let registry = SubscriberRegistry::new();
        registry.add(SubscriberId(30));
        registry.add(SubscriberId(-5));
        registry.add(SubscriberId(12));

        let snapshot = registry.snapshot();
        registry.remove(SubscriberId(12));

        assert_eq!(
            snapshot,
            vec![SubscriberId(-5), SubscriberId(12), SubscriberId(30)]
        );
        assert!(!registry.contains(SubscriberId(12)));
    }

    #[test]
    fn test_concurrent_mutation() {
        let registry = Arc::new(SubscriberRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        registry.add(SubscriberId(t * 1000 + i));
                        let _ = registry.snapshot();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 800);
    }
}

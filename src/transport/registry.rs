//! Copy-on-write listener registry.

use std::sync::{Arc, PoisonError, RwLock};

/// A set of listeners that can be changed while a dispatch is in progress.
///
/// Writers replace the whole list; readers take an `Arc` snapshot and
/// iterate it without holding the lock. A listener added during a dispatch is
/// therefore first seen by the next dispatch.
///
/// Identity is by pointer: adding the same `Arc` twice is a no-op, and
/// removing requires the `Arc` that was added.
pub struct ListenerRegistry<L: ?Sized> {
    listeners: RwLock<Arc<Vec<Arc<L>>>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Register a listener. Returns false if it was already registered.
    pub fn add(&self, listener: Arc<L>) -> bool {
        let mut guard = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if guard.iter().any(|l| same(l, &listener)) {
            return false;
        }
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(listener);
        *guard = Arc::new(next);
        true
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove(&self, listener: &Arc<L>) -> bool {
        let mut guard = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.iter().any(|l| same(l, listener)) {
            return false;
        }
        let next: Vec<_> = guard.iter().filter(|l| !same(l, listener)).cloned().collect();
        *guard = Arc::new(next);
        true
    }

    /// The current listener list.
    pub fn snapshot(&self) -> Arc<Vec<Arc<L>>> {
        Arc::clone(&self.listeners.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

fn same<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let registry: ListenerRegistry<dyn Named> = ListenerRegistry::new();
        let a: Arc<dyn Named> = Arc::new(Fixed("a"));
        assert!(registry.add(Arc::clone(&a)));
        assert!(!registry.add(Arc::clone(&a)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry: ListenerRegistry<dyn Named> = ListenerRegistry::new();
        let a: Arc<dyn Named> = Arc::new(Fixed("a"));
        let b: Arc<dyn Named> = Arc::new(Fixed("b"));
        registry.add(Arc::clone(&a));
        registry.add(Arc::clone(&b));

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        let names: Vec<_> = registry.snapshot().iter().map(|l| l.name().to_owned()).collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn test_equal_but_distinct_listeners_both_kept() {
        let registry: ListenerRegistry<dyn Named> = ListenerRegistry::new();
        assert!(registry.add(Arc::new(Fixed("x"))));
        assert!(registry.add(Arc::new(Fixed("x"))));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_changes() {
        let registry: ListenerRegistry<dyn Named> = ListenerRegistry::new();
        let a: Arc<dyn Named> = Arc::new(Fixed("a"));
        registry.add(Arc::clone(&a));

        let snapshot = registry.snapshot();
        registry.add(Arc::new(Fixed("b")));
        registry.remove(&a);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "a");
        assert_eq!(registry.snapshot()[0].name(), "b");
    }
}

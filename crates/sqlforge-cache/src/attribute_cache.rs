//! Per-shape attribute metadata cache.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use sqlforge_core::{AttributeProvider, ClassProperty, EntityShape};

/// Caches attribute-declared primary and identity properties per entity shape.
///
/// Primary and identity are cached independently, and negative lookups are
/// cached too: an entity with no declared key resolves to `None` exactly
/// once per shape. The inner maps follow the same relaxed compute-if-absent
/// discipline as the rest of the subsystem.
pub struct AttributeCache {
    provider: Arc<dyn AttributeProvider>,
    primary: RwLock<HashMap<TypeId, Option<ClassProperty>>>,
    identity: RwLock<HashMap<TypeId, Option<ClassProperty>>>,
}

impl AttributeCache {
    /// Wrap a provider in a cache.
    pub fn new(provider: Arc<dyn AttributeProvider>) -> Self {
        Self {
            provider,
            primary: RwLock::new(HashMap::new()),
            identity: RwLock::new(HashMap::new()),
        }
    }

    /// The attribute-declared primary property of `shape`, if any.
    #[must_use]
    pub fn primary(&self, shape: &EntityShape) -> Option<ClassProperty> {
        if let Some(cached) = self.primary.read().unwrap().get(&shape.type_id()) {
            return cached.clone();
        }
        let resolved = self.provider.primary(shape);
        let mut primary = self.primary.write().unwrap();
        primary
            .entry(shape.type_id())
            .or_insert_with(|| resolved)
            .clone()
    }

    /// The attribute-declared identity property of `shape`, if any.
    #[must_use]
    pub fn identity(&self, shape: &EntityShape) -> Option<ClassProperty> {
        if let Some(cached) = self.identity.read().unwrap().get(&shape.type_id()) {
            return cached.clone();
        }
        let resolved = self.provider.identity(shape);
        let mut identity = self.identity.write().unwrap();
        identity
            .entry(shape.type_id())
            .or_insert_with(|| resolved)
            .clone()
    }

    /// Drop every cached declaration; readers repopulate on next use.
    pub fn flush(&self) {
        tracing::info!("flushing attribute cache");
        self.primary.write().unwrap().clear();
        self.identity.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Hero;

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl AttributeProvider for CountingProvider {
        fn primary(&self, _shape: &EntityShape) -> Option<ClassProperty> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(ClassProperty::new("Id"))
        }

        fn identity(&self, _shape: &EntityShape) -> Option<ClassProperty> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    #[test]
    fn test_primary_resolved_once_per_shape() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = AttributeCache::new(provider.clone());
        let shape = EntityShape::of::<Hero>();
        assert!(cache.primary(&shape).is_some());
        assert!(cache.primary(&shape).is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_negative_identity_is_cached() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = AttributeCache::new(provider.clone());
        let shape = EntityShape::of::<Hero>();
        assert!(cache.identity(&shape).is_none());
        assert!(cache.identity(&shape).is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flush_repopulates() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = AttributeCache::new(provider.clone());
        let shape = EntityShape::of::<Hero>();
        cache.primary(&shape);
        cache.flush();
        cache.primary(&shape);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}

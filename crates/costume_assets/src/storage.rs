use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::sync::Arc;

use crate::colormap::{Colormap, ColormapRef};

new_key_type! {
    pub struct ColormapHandle;
}

// Internal data structure, protected by a lock.
#[derive(Default)]
struct CacheInner {
    map: SlotMap<ColormapHandle, ColormapRef>,
    lookup: FxHashMap<String, ColormapHandle>,
}

/// Thread-safe colormap cache keyed by handle and by name.
///
/// The cache holds one strong reference per entry; every component or costume
/// using a colormap holds another. [`ColormapCache::release_unused`] drops the
/// entries nobody else references.
#[derive(Default)]
pub struct ColormapCache {
    inner: RwLock<CacheInner>,
}

impl ColormapCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [Write] Adds a colormap and returns its handle.
    /// A colormap with the same name already cached wins; the new one is dropped.
    pub fn insert(&self, colormap: impl Into<Colormap>) -> ColormapHandle {
        let colormap = colormap.into();
        let mut guard = self.inner.write();
        if let Some(&handle) = guard.lookup.get(&colormap.name) {
            return handle;
        }
        let name = colormap.name.clone();
        let handle = guard.map.insert(Arc::new(colormap));
        guard.lookup.insert(name, handle);
        handle
    }

    /// [Read] Gets a colormap by handle.
    pub fn get(&self, handle: ColormapHandle) -> Option<ColormapRef> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    /// [Read] Gets a colormap by name. Names compare exactly.
    pub fn get_by_name(&self, name: &str) -> Option<ColormapRef> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(name)?;
        guard.map.get(*handle).cloned()
    }

    pub fn handle_by_name(&self, name: &str) -> Option<ColormapHandle> {
        self.inner.read().lookup.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [Write] Evicts every colormap only the cache still references.
    /// Returns the number of evicted entries.
    pub fn release_unused(&self) -> usize {
        let mut guard = self.inner.write();
        let CacheInner { map, lookup } = &mut *guard;

        let before = map.len();
        map.retain(|_, colormap| Arc::strong_count(colormap) > 1);
        lookup.retain(|_, handle| map.contains_key(*handle));

        let released = before - map.len();
        if released > 0 {
            log::debug!("Colormap cache released {released} unused entries");
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup_by_name() {
        let cache = ColormapCache::new();
        let handle = cache.insert(Colormap::greyscale("item.cmp"));

        assert_eq!(cache.handle_by_name("item.cmp"), Some(handle));
        assert_eq!(cache.get(handle).unwrap().name, "item.cmp");
        assert!(cache.get_by_name("ITEM.CMP").is_none(), "names are case-sensitive");
    }

    #[test]
    fn insert_same_name_keeps_first() {
        let cache = ColormapCache::new();
        let first = cache.insert(Colormap::new("a.cmp", vec![[1, 2, 3]]));
        let second = cache.insert(Colormap::new("a.cmp", vec![[9, 9, 9]]));

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_by_name("a.cmp").unwrap().color(0), [1, 2, 3]);
    }

    #[test]
    fn release_unused_keeps_held_colormaps() {
        let cache = ColormapCache::new();
        cache.insert(Colormap::greyscale("held.cmp"));
        cache.insert(Colormap::greyscale("idle.cmp"));

        let held = cache.get_by_name("held.cmp").unwrap();
        assert_eq!(cache.release_unused(), 1);
        assert!(cache.get_by_name("idle.cmp").is_none());
        assert!(cache.get_by_name("held.cmp").is_some());

        drop(held);
        assert_eq!(cache.release_unused(), 1);
        assert!(cache.is_empty());
    }
}

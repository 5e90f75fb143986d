//! In-memory cache of decoded preload images.
//!
//! The preload pipeline fills this so the renderer finds warm thumbnails
//! when the gallery first draws. Keyed by the URL that was requested.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::loader::LoadedImage;

const DEFAULT_CAPACITY: usize = 128;

/// LRU cache of decoded images, shared between the preloader and the host.
pub struct ImageCache {
    entries: Mutex<LruCache<String, Arc<LoadedImage>>>,
}

pub type SharedImageCache = Arc<ImageCache>;

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn new_shared() -> SharedImageCache {
        Arc::new(Self::new(DEFAULT_CAPACITY))
    }

    pub fn get(&self, url: &str) -> Option<Arc<LoadedImage>> {
        let hit = self.entries.lock().get(url).cloned();
        trace!(url, hit = hit.is_some(), "image cache lookup");
        hit
    }

    pub fn insert(&self, url: &str, image: LoadedImage) {
        self.entries.lock().put(url.to_string(), Arc::new(image));
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> LoadedImage {
        LoadedImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ImageCache::new(4);
        assert!(cache.get("a.jpg").is_none());
        cache.insert("a.jpg", pixel());
        assert!(cache.get("a.jpg").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ImageCache::new(2);
        cache.insert("a.jpg", pixel());
        cache.insert("b.jpg", pixel());
        cache.insert("c.jpg", pixel());
        assert!(!cache.contains("a.jpg"));
        assert!(cache.contains("b.jpg"));
        assert!(cache.contains("c.jpg"));
    }
}

//! Progressive preload pipeline.
//!
//! Before the gallery becomes interactive it can warm a bounded slice of
//! one collection's backgrounds and thumbnails. Loads run strictly
//! sequentially, one image at a time, in list order, so progress is
//! monotonic and at most one network/decode is in flight.
//!
//! A failed image still advances progress; the pipeline never aborts and
//! never retries.

use tracing::{debug, warn};

use crate::cache::SharedImageCache;
use crate::config::GalleryConfig;
use crate::loader::ImageLoader;

/// Builds the preload URL list for one collection: the configured slice of
/// its backgrounds, then the analogous slice of its thumbnail URLs. Video
/// pictures contribute their thumbnail image, never the video file.
pub fn preload_list(config: &GalleryConfig, collection_key: &str) -> Vec<String> {
    let Some(collection) = config.collection(collection_key) else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    if let Some(spec) = config.preload_backgrounds {
        let n = spec.take(collection.backgrounds.len());
        urls.extend(
            collection.backgrounds[..n]
                .iter()
                .map(|b| config.background_url(b)),
        );
    }
    if let Some(spec) = config.preload_thumbs {
        let n = spec.take(collection.pictures.len());
        urls.extend(collection.pictures[..n].iter().map(|p| config.thumb_url(p)));
    }
    urls
}

/// Sequential image preloader.
pub struct Preloader<'a, L> {
    loader: &'a L,
    cache: SharedImageCache,
}

impl<'a, L: ImageLoader> Preloader<'a, L> {
    pub fn new(loader: &'a L, cache: SharedImageCache) -> Self {
        Self { loader, cache }
    }

    /// Loads `urls` one at a time in order.
    ///
    /// After every image settles, successfully or not, `on_progress(done,
    /// total)` fires with 1-based `done`; the first call is `(1, total)`
    /// and the last `(total, total)`. An empty list returns immediately
    /// with no progress calls. Returns the number of successful loads;
    /// successes land in the shared image cache.
    pub async fn run(&self, urls: &[String], mut on_progress: impl FnMut(usize, usize)) -> usize {
        let total = urls.len();
        let mut loaded = 0;

        for (i, url) in urls.iter().enumerate() {
            match self.loader.load(url).await {
                Ok(image) => {
                    self.cache.insert(url, image);
                    loaded += 1;
                }
                Err(error) => {
                    // Counted as done; the gallery shows regardless.
                    warn!(%url, %error, "preload failed");
                }
            }
            on_progress(i + 1, total);
        }

        debug!(loaded, total, "preload finished");
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ImageCache;
    use crate::loader::LoadedImage;
    use anyhow::{anyhow, Result};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::Arc;

    /// Loader that records request order and fails the configured URLs.
    #[derive(Default)]
    struct ScriptedLoader {
        fail: HashSet<String>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedLoader {
        fn failing(urls: &[&str]) -> Self {
            Self {
                fail: urls.iter().map(|u| u.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl ImageLoader for ScriptedLoader {
        fn load(&self, url: &str) -> impl Future<Output = Result<LoadedImage>> + Send {
            self.requests.lock().push(url.to_string());
            let outcome = if self.fail.contains(url) {
                Err(anyhow!("scripted failure"))
            } else {
                Ok(LoadedImage {
                    width: 1,
                    height: 1,
                    pixels: vec![0, 0, 0, 255],
                })
            };
            async move { outcome }
        }
    }

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_progress_fires_once_per_image_in_order() {
        crate::init_test_logging();
        let loader = ScriptedLoader::default();
        let cache = ImageCache::new_shared();
        let list = urls(&["a.jpg", "b.jpg", "c.jpg"]);

        let mut calls = Vec::new();
        let loaded = Preloader::new(&loader, cache.clone())
            .run(&list, |done, total| calls.push((done, total)))
            .await;

        assert_eq!(loaded, 3);
        assert_eq!(calls, [(1, 3), (2, 3), (3, 3)]);
        // Strictly sequential, in list order.
        assert_eq!(*loader.requests.lock(), list);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_failures_count_as_done() {
        let loader = ScriptedLoader::failing(&["b.jpg"]);
        let cache = ImageCache::new_shared();
        let list = urls(&["a.jpg", "b.jpg", "c.jpg"]);

        let mut calls = Vec::new();
        let loaded = Preloader::new(&loader, cache.clone())
            .run(&list, |done, total| calls.push((done, total)))
            .await;

        // The failure advances progress but is not cached or retried.
        assert_eq!(loaded, 2);
        assert_eq!(calls, [(1, 3), (2, 3), (3, 3)]);
        assert_eq!(loader.requests.lock().len(), 3);
        assert!(!cache.contains("b.jpg"));
    }

    #[tokio::test]
    async fn test_empty_list_completes_without_progress() {
        let loader = ScriptedLoader::default();
        let loaded = Preloader::new(&loader, ImageCache::new_shared())
            .run(&[], |_, _| panic!("no progress expected"))
            .await;
        assert_eq!(loaded, 0);
    }

    #[test]
    fn test_preload_list_slices() {
        let config = GalleryConfig::from_json(
            r#"{
                "collections": [{
                    "title": "A",
                    "backgrounds": [{"path": "b1"}, {"path": "b2"}, {"path": "b3"}],
                    "pictures": [
                        {"path": "p1"}, {"path": "p2"}, {"path": "p3"},
                        {"path": "p4"}, {"path": "p5"}
                    ]
                }],
                "extension": "jpg",
                "thumbs": {"maxRotation": 0},
                "preloadThumbs": 2,
                "preloadBackgrounds": true
            }"#,
        )
        .unwrap();

        let list = preload_list(&config, "0");
        assert_eq!(
            list,
            [
                "b1.jpg",
                "b2.jpg",
                "b3.jpg",
                "p1.thumb.jpg",
                "p2.thumb.jpg"
            ]
        );
    }

    #[test]
    fn test_preload_list_without_options_is_empty() {
        let config = GalleryConfig::from_json(
            r#"{
                "collections": [{"title": "A", "pictures": [{"path": "p1"}]}],
                "extension": "jpg",
                "thumbs": {"maxRotation": 0}
            }"#,
        )
        .unwrap();
        assert!(preload_list(&config, "0").is_empty());
        assert!(preload_list(&config, "missing").is_empty());
    }

    #[test]
    fn test_preload_list_videos_use_thumbnails() {
        let config = GalleryConfig::from_json(
            r#"{
                "collections": [{
                    "title": "A",
                    "pictures": [{"path": "v1", "video": true}, {"path": "p2"}]
                }],
                "extension": "jpg",
                "videoExtension": "mp4",
                "thumbs": {"maxRotation": 0},
                "preloadThumbs": true
            }"#,
        )
        .unwrap();
        assert_eq!(preload_list(&config, "0"), ["v1.thumb.jpg", "p2.thumb.jpg"]);
    }
}

//! Viewer core: wires config, navigation state, fragment store, preload
//! pipeline and renderer together.
//!
//! Control flow: config → (optional) preload with progress → startup
//! resolution from the URL fragment → renderer draws the initial
//! collection → host input drives transitions → every transition updates
//! the fragment and notifies the renderer. All transitions run
//! synchronously to completion; the preload pipeline is the only async
//! part and always precedes interactivity.

use tracing::{debug, info, warn};

use crate::cache::{ImageCache, SharedImageCache};
use crate::config::{Collection, GalleryConfig};
use crate::fragment::{FragmentBackend, FragmentStore};
use crate::loader::ImageLoader;
use crate::preload::{preload_list, Preloader};

pub mod keys;
pub mod render;
pub mod state;

pub use keys::{Key, KeyAction};
pub use render::{ArchiveLink, CollectionView, OpenPicture, Renderer, ThumbView};
pub use state::{NavigationState, ViewerState};

/// Fragment key holding the current collection.
pub const KEY_COLLECTION: &str = "c";
/// Fragment key holding the open picture index, absent while closed.
pub const KEY_PICTURE: &str = "i";

/// The gallery viewer session.
///
/// Owns the only mutable session state (navigation state plus the URL
/// fragment); the renderer and the preload pipeline never write it.
pub struct GalleryViewer<R: Renderer, B: FragmentBackend> {
    config: GalleryConfig,
    nav: NavigationState,
    fragment: FragmentStore<B>,
    renderer: R,
    cache: SharedImageCache,
    pending_switch: Option<String>,
}

impl<R: Renderer, B: FragmentBackend> GalleryViewer<R, B> {
    pub fn new(config: GalleryConfig, renderer: R, backend: B) -> Self {
        let first = config.first_key().to_string();
        let len = config
            .collection(&first)
            .map(|c| c.pictures.len())
            .unwrap_or(0);
        Self {
            config,
            nav: NavigationState::new(first, len),
            fragment: FragmentStore::new(backend),
            renderer,
            cache: ImageCache::new_shared(),
            pending_switch: None,
        }
    }

    /// Starts the session: preloads if configured, then shows the startup
    /// view resolved from the URL fragment.
    ///
    /// Without preload options the gallery shows immediately and no
    /// loading indicator is ever rendered. With preload options the
    /// renderer sees one progress update per settled image and exactly one
    /// completion, even for an empty preload list.
    pub async fn init<L: ImageLoader>(&mut self, loader: &L) {
        let start_key = self.startup_collection();

        if self.config.preload_configured() {
            let urls = preload_list(&self.config, &start_key);
            let total = urls.len();
            info!(total, collection = %start_key, "preloading");

            let preloader = Preloader::new(loader, self.cache.clone());
            let renderer = &mut self.renderer;
            preloader
                .run(&urls, |done, _| {
                    renderer.render_loading_progress(done as f64 / total as f64);
                })
                .await;
            self.renderer.render_loading_complete();
        }

        self.open_collection(&start_key);
        self.open_deep_link();
    }

    /// Resolves the startup collection from the fragment, falling back to
    /// the first configured collection on anything invalid.
    fn startup_collection(&self) -> String {
        match self.fragment.get(KEY_COLLECTION) {
            Some(key) if self.config.collection(&key).is_some() => key,
            Some(key) => {
                debug!(%key, "unknown collection in fragment, using first");
                self.config.first_key().to_string()
            }
            None => self.config.first_key().to_string(),
        }
    }

    /// Reopens the picture a shared link points at, if the fragment names
    /// a valid index. Garbage falls back to the closed view, silently.
    fn open_deep_link(&mut self) {
        let Some(raw) = self.fragment.get(KEY_PICTURE) else {
            return;
        };
        match raw.parse::<usize>() {
            Ok(index) if index < self.nav.picture_count() => self.open_picture(index),
            _ => {
                debug!(value = %raw, "invalid picture index in fragment, staying closed");
                self.fragment.set(KEY_PICTURE, "");
            }
        }
    }

    /// Renders `key`'s thumbnails and backgrounds and records it as the
    /// current collection, without touching the enlarged view's
    /// open/closed status. An open picture whose index does not exist in
    /// the new collection closes the view.
    ///
    /// Unknown keys are ignored; fragment values end up here.
    pub fn open_collection(&mut self, key: &str) {
        let (view, len) = match self.config.collection(key) {
            Some(collection) => (self.collection_view(key, collection), collection.pictures.len()),
            None => {
                warn!(%key, "ignoring unknown collection");
                return;
            }
        };

        let closed = self.nav.open_collection(key, len);
        self.fragment.set(KEY_COLLECTION, key);
        self.renderer.render_collection(&view);

        if closed {
            self.fragment.set(KEY_PICTURE, "");
            self.renderer.render_closed();
        } else if let Some(index) = self.nav.current() {
            // Still open: refresh the enlarged view onto the new
            // collection's picture at the same index.
            if let Some(open) = self.open_picture_view(index) {
                self.renderer.render_open_picture(&open);
            }
        }
    }

    /// Opens the enlarged view at `index` of the current collection.
    ///
    /// The index must be in range; thumbnail click handlers and the
    /// fragment resolver guarantee this.
    pub fn open_picture(&mut self, index: usize) {
        debug_assert!(
            index < self.nav.picture_count(),
            "picture index {} out of range",
            index
        );
        let Some(view) = self.open_picture_view(index) else {
            return;
        };
        self.nav.open_picture(index);
        self.fragment.set(KEY_PICTURE, &index.to_string());
        self.renderer.render_open_picture(&view);
    }

    /// Advances to the next picture, wrapping past the last to the first.
    /// No-op while closed.
    pub fn next(&mut self) {
        if let Some(index) = self.nav.next() {
            self.after_move(index);
        }
    }

    /// Steps to the previous picture, wrapping before the first to the
    /// last. No-op while closed.
    pub fn previous(&mut self) {
        if let Some(index) = self.nav.previous() {
            self.after_move(index);
        }
    }

    /// Jumps to the first picture of the collection.
    pub fn first(&mut self) {
        if let Some(index) = self.nav.first() {
            self.after_move(index);
        }
    }

    /// Jumps to the last picture of the collection.
    pub fn last(&mut self) {
        if let Some(index) = self.nav.last() {
            self.after_move(index);
        }
    }

    fn after_move(&mut self, index: usize) {
        self.fragment.set(KEY_PICTURE, &index.to_string());
        if let Some(view) = self.open_picture_view(index) {
            self.renderer.render_open_picture(&view);
        }
    }

    /// Closes the enlarged view and clears the picture key from the
    /// fragment, leaving the collection key alone.
    pub fn close(&mut self) {
        if self.nav.close() {
            self.fragment.set(KEY_PICTURE, "");
            self.renderer.render_closed();
        }
    }

    /// Records a menu-triggered collection switch. The host starts its
    /// fade and calls [`complete_switch`](Self::complete_switch) when the
    /// transition ends; until then the request can be replaced or
    /// cancelled. Overlapping requests: the last one wins.
    pub fn request_switch(&mut self, key: &str) {
        if self.config.collection(key).is_none() {
            warn!(%key, "ignoring switch to unknown collection");
            return;
        }
        self.pending_switch = Some(key.to_string());
    }

    /// Performs the pending switch, if any. Returns whether a switch
    /// happened; a completion that races a cancel is a no-op.
    pub fn complete_switch(&mut self) -> bool {
        match self.pending_switch.take() {
            Some(key) => {
                self.open_collection(&key);
                true
            }
            None => false,
        }
    }

    pub fn cancel_switch(&mut self) {
        self.pending_switch = None;
    }

    /// Dispatches a key event. Keys only act while the enlarged view is
    /// open; returns whether the key was consumed, in which case the host
    /// must suppress the default scrolling behavior.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.nav.is_open() {
            return false;
        }
        match key.action() {
            KeyAction::Next => self.next(),
            KeyAction::Previous => self.previous(),
            KeyAction::First => self.first(),
            KeyAction::Last => self.last(),
            KeyAction::Close => self.close(),
        }
        true
    }

    pub fn state(&self) -> ViewerState {
        self.nav.snapshot()
    }

    pub fn is_open(&self) -> bool {
        self.nav.is_open()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn cache(&self) -> &SharedImageCache {
        &self.cache
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn collection_view(&self, key: &str, collection: &Collection) -> CollectionView {
        let config = &self.config;
        CollectionView {
            key: key.to_string(),
            title: collection.title.clone(),
            background_urls: collection
                .backgrounds
                .iter()
                .map(|b| config.background_url(b))
                .collect(),
            thumbs: collection
                .pictures
                .iter()
                .enumerate()
                .map(|(index, picture)| ThumbView {
                    index,
                    title: picture.title().map(str::to_string),
                    thumb_url: config.thumb_url(picture),
                    video: picture.video,
                })
                .collect(),
            max_rotation: config.thumbs.max_rotation,
            randomize_position: config.thumbs.randomize_position.clone(),
            overscroll: config.background.as_ref().map_or(false, |b| b.overscroll),
            archives: config
                .archives
                .iter()
                .map(|(label, url)| ArchiveLink {
                    label: label.clone(),
                    url: url.clone(),
                    is_full_archive: label == "_full_",
                })
                .collect(),
            menu: if config.collection_keys().len() > 1 {
                config
                    .collection_keys()
                    .iter()
                    .map(|k| {
                        let title = config
                            .collection(k)
                            .map(|c| c.title.clone())
                            .unwrap_or_default();
                        (k.clone(), title)
                    })
                    .collect()
            } else {
                Vec::new()
            },
        }
    }

    fn open_picture_view(&self, index: usize) -> Option<OpenPicture> {
        let collection = self.config.collection(self.nav.collection_key())?;
        let picture = collection.pictures.get(index)?;
        Some(OpenPicture {
            index,
            title: picture.title().map(str::to_string),
            source: self.config.media_source(picture),
        })
    }
}

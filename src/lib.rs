//! Client-side viewer core for statically generated photo/video galleries.
//!
//! A generator bakes the gallery description into the hosting page as a
//! JSON object; this crate is everything behind that page that has real
//! sequencing and state to get right:
//! - [`config`]: the immutable gallery configuration model
//! - [`preload`]: sequential image preloading with progress reporting
//! - [`fragment`]: the `|key=value|` URL-fragment store used for
//!   deep-linking the current view
//! - [`viewer`]: the navigation state machine and the glue that drives a
//!   host-supplied [`viewer::Renderer`]
//!
//! Styling and actual DOM or widget construction stay on the host side.

pub mod cache;
pub mod config;
pub mod fragment;
pub mod loader;
pub mod preload;
pub mod viewer;

pub use cache::{ImageCache, SharedImageCache};
pub use config::{Collection, ConfigError, GalleryConfig, MediaSource, Picture, PreloadSpec};
pub use fragment::{FragmentBackend, FragmentStore, InMemoryFragment};
pub use loader::{FsImageLoader, ImageLoader, LoadedImage};
pub use preload::{preload_list, Preloader};
pub use viewer::{CollectionView, GalleryViewer, Key, OpenPicture, Renderer, ViewerState};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use once_cell::sync::Lazy;
    static INIT: Lazy<()> = Lazy::new(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
    Lazy::force(&INIT);
}

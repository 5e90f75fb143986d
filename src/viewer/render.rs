//! Renderer contract.
//!
//! The viewer core never touches the display surface. It hands the
//! renderer plain, owned data and the renderer builds whatever DOM or
//! widget tree it likes, wiring clicks back to the viewer's transitions.
//! The renderer reads viewer state, it never writes it.

use crate::config::{MediaSource, RandomizePosition};

/// One thumbnail as the renderer should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbView {
    /// Index within the collection; clicks report this back through
    /// `open_picture`.
    pub index: usize,
    pub title: Option<String>,
    pub thumb_url: String,
    pub video: bool,
}

/// One archive download link for the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLink {
    pub label: String,
    pub url: String,
    /// The whole-gallery archive gets a localized caption instead of its
    /// raw label.
    pub is_full_archive: bool,
}

/// Everything needed to draw a collection page.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView {
    pub key: String,
    pub title: String,
    pub background_urls: Vec<String>,
    pub thumbs: Vec<ThumbView>,
    /// Maximum random thumbnail rotation in degrees.
    pub max_rotation: f64,
    pub randomize_position: Option<RandomizePosition>,
    /// Whether backgrounds scroll past the content instead of being sized
    /// to it.
    pub overscroll: bool,
    pub archives: Vec<ArchiveLink>,
    /// Collection titles in order, for the switch menu. Only shown when
    /// there is more than one.
    pub menu: Vec<(String, String)>,
}

/// The enlarged view's content.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPicture {
    pub index: usize,
    pub title: Option<String>,
    pub source: MediaSource,
}

/// External display collaborator.
///
/// All calls are synchronous notifications; implementations must not call
/// back into the viewer from inside them.
pub trait Renderer {
    /// Draws backgrounds, thumbnails, menu and footer for a collection.
    fn render_collection(&mut self, view: &CollectionView);

    /// Shows the enlarged view for one picture or video.
    fn render_open_picture(&mut self, picture: &OpenPicture);

    /// Dismisses the enlarged view.
    fn render_closed(&mut self);

    /// Updates the preload indicator; `fraction` is in `0..=1`.
    fn render_loading_progress(&mut self, fraction: f64);

    /// Fades out and removes the preload indicator.
    fn render_loading_complete(&mut self);
}

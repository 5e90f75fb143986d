//! Gallery configuration model.
//!
//! The static-site generator embeds a JSON object describing the gallery in
//! the hosting page; this module deserializes and normalizes it:
//! - Collections addressed by stable string key (current format: a
//!   `collections` map plus a `collection_keys` order list) or by integer
//!   index (legacy format: a plain array). Never both in one config.
//! - Media URL composition following the generator's file naming scheme
//!   (`{path}.thumb.{ext}`, `{path}.disp.{ext}`, `{path}.{ext}`).
//!
//! The config is immutable for the lifetime of a viewer session.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors produced while loading a gallery configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid gallery config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gallery config has no collections")]
    NoCollections,

    #[error("collection_keys does not match collections: {0}")]
    KeyOrderMismatch(String),

    #[error("collection_keys given for an indexed collection list")]
    MixedAddressing,

    #[error("video pictures present but no videoExtension configured")]
    MissingVideoExtension,
}

/// How many images of a collection to preload.
///
/// On the wire this is either a number (`3` = first three), a boolean
/// (`true` = all), or absent (= none). A zero count or `false` also means
/// none, matching the truthiness rules of the original page config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PreloadSpec {
    Count(u32),
    All(bool),
}

impl PreloadSpec {
    /// Number of items to take from a list of `total` entries.
    pub fn take(self, total: usize) -> usize {
        match self {
            PreloadSpec::Count(n) if n > 0 => total.min(n as usize),
            PreloadSpec::Count(_) => 0,
            PreloadSpec::All(true) => total,
            PreloadSpec::All(false) => 0,
        }
    }
}

/// Thumbnail display options, passed through to the renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbOptions {
    /// Maximum random rotation of a thumbnail, in degrees.
    pub max_rotation: f64,
    #[serde(default)]
    pub randomize_position: Option<RandomizePosition>,
}

/// Random thumbnail offset options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomizePosition {
    pub amount: f64,
    /// CSS unit for `amount`, e.g. `"px"` or `"em"`.
    pub unit: String,
    #[serde(default)]
    pub hover_revert: bool,
}

/// Background display options.
#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundOptions {
    #[serde(default)]
    pub overscroll: bool,
}

/// A single background image, addressed by its path stem.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawBackground")]
pub struct Background {
    pub path: String,
}

/// Legacy configs carry bare path strings, current ones `{ "path": … }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBackground {
    Path(String),
    Object { path: String },
}

impl From<RawBackground> for Background {
    fn from(raw: RawBackground) -> Self {
        match raw {
            RawBackground::Path(path) | RawBackground::Object { path } => Background { path },
        }
    }
}

/// A gallery item: a still image or a video, decided at config-load time.
#[derive(Debug, Clone, Deserialize)]
pub struct Picture {
    /// Path stem; the extension suffixes select the rendition.
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "isVideo")]
    pub video: bool,
}

impl Picture {
    /// Title as shown to the user; empty strings count as untitled.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// An ordered set of pictures sharing a background rotation.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub title: String,
    #[serde(default)]
    pub backgrounds: Vec<Background>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

/// The two wire formats for the collection set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCollections {
    Indexed(Vec<Collection>),
    Keyed(HashMap<String, Collection>),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    collections: RawCollections,
    #[serde(default, alias = "collectionKeys")]
    collection_keys: Option<Vec<String>>,
    extension: String,
    #[serde(default, rename = "videoExtension", alias = "video_extension")]
    video_extension: Option<String>,
    thumbs: ThumbOptions,
    #[serde(default)]
    background: Option<BackgroundOptions>,
    #[serde(default)]
    archives: BTreeMap<String, String>,
    #[serde(default, rename = "preloadThumbs", alias = "preload_thumbs")]
    preload_thumbs: Option<PreloadSpec>,
    #[serde(default, rename = "preloadBackgrounds", alias = "preload_backgrounds")]
    preload_backgrounds: Option<PreloadSpec>,
}

/// The resolved media source for an opened picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Still {
        display_url: String,
        fullsize_url: String,
    },
    Video {
        url: String,
    },
}

/// Normalized, immutable gallery configuration.
///
/// Collections are always addressed by string key after loading; legacy
/// indexed configs get synthetic keys `"0"`, `"1"`, … so the URL fragment
/// encoding stays uniform across both formats.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    keys: Vec<String>,
    collections: HashMap<String, Collection>,
    pub extension: String,
    pub video_extension: Option<String>,
    pub thumbs: ThumbOptions,
    pub background: Option<BackgroundOptions>,
    /// Archive label → URL. The `_full_` label marks the whole-gallery zip.
    pub archives: BTreeMap<String, String>,
    pub preload_thumbs: Option<PreloadSpec>,
    pub preload_backgrounds: Option<PreloadSpec>,
}

impl GalleryConfig {
    /// Parses and validates the JSON config object embedded in the page.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let (keys, collections) = match raw.collections {
            RawCollections::Indexed(list) => {
                if raw.collection_keys.is_some() {
                    return Err(ConfigError::MixedAddressing);
                }
                let keys: Vec<String> = (0..list.len()).map(|i| i.to_string()).collect();
                let map = keys.iter().cloned().zip(list).collect();
                (keys, map)
            }
            RawCollections::Keyed(map) => {
                let keys = match raw.collection_keys {
                    Some(keys) => {
                        for key in &keys {
                            if !map.contains_key(key) {
                                return Err(ConfigError::KeyOrderMismatch(key.clone()));
                            }
                        }
                        if let Some(stray) = map.keys().find(|k| !keys.contains(*k)) {
                            return Err(ConfigError::KeyOrderMismatch(stray.clone()));
                        }
                        keys
                    }
                    None => {
                        // Old generators omitted the order list; fall back to a
                        // deterministic order rather than map iteration order.
                        warn!("config has no collection_keys, sorting collection keys");
                        let mut keys: Vec<String> = map.keys().cloned().collect();
                        keys.sort();
                        keys
                    }
                };
                (keys, map)
            }
        };

        if keys.is_empty() {
            return Err(ConfigError::NoCollections);
        }

        let has_videos = collections
            .values()
            .flat_map(|c| c.pictures.iter())
            .any(|p| p.video);
        if has_videos && raw.video_extension.is_none() {
            return Err(ConfigError::MissingVideoExtension);
        }

        Ok(Self {
            keys,
            collections,
            extension: raw.extension,
            video_extension: raw.video_extension,
            thumbs: raw.thumbs,
            background: raw.background,
            archives: raw.archives,
            preload_thumbs: raw.preload_thumbs,
            preload_backgrounds: raw.preload_backgrounds,
        })
    }

    /// Collection keys in configuration order. Never empty.
    pub fn collection_keys(&self) -> &[String] {
        &self.keys
    }

    /// The default collection shown when the fragment names none.
    pub fn first_key(&self) -> &str {
        &self.keys[0]
    }

    pub fn collection(&self, key: &str) -> Option<&Collection> {
        self.collections.get(key)
    }

    /// Whether any preload option asks for work.
    pub fn preload_configured(&self) -> bool {
        self.preload_thumbs.map_or(false, |p| p.take(1) > 0)
            || self.preload_backgrounds.map_or(false, |p| p.take(1) > 0)
    }

    /// Thumbnail-resolution URL. Videos thumbnail through the image
    /// extension like everything else.
    pub fn thumb_url(&self, picture: &Picture) -> String {
        format!("{}.thumb.{}", picture.path, self.extension)
    }

    pub fn display_url(&self, picture: &Picture) -> String {
        format!("{}.disp.{}", picture.path, self.extension)
    }

    pub fn fullsize_url(&self, picture: &Picture) -> String {
        format!("{}.{}", picture.path, self.extension)
    }

    pub fn background_url(&self, background: &Background) -> String {
        format!("{}.{}", background.path, self.extension)
    }

    /// Resolves what the enlarged view should show for `picture`.
    ///
    /// A video picture with no configured video extension cannot occur in a
    /// validated config; if it does, the picture degrades to a still.
    pub fn media_source(&self, picture: &Picture) -> MediaSource {
        match (picture.video, self.video_extension.as_deref()) {
            (true, Some(ext)) => MediaSource::Video {
                url: format!("{}.{}", picture.path, ext),
            },
            _ => MediaSource::Still {
                display_url: self.display_url(picture),
                fullsize_url: self.fullsize_url(picture),
            },
        }
    }
}

//! Image loading for the preload pipeline.
//!
//! The viewer never fetches media itself beyond ordinary retrieval by URL;
//! this trait is the seam where the host plugs in its transport. The
//! bundled [`FsImageLoader`] resolves URLs against a base directory and
//! decodes with the `image` crate, which is what a packaged gallery on
//! local storage needs. No timeouts, no retries: a load either settles as
//! success or failure and the pipeline treats both as progress.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A decoded image held for the renderer.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
}

/// Loads one image by URL.
pub trait ImageLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedImage>> + Send;
}

/// Loader for galleries unpacked on local storage.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    base_dir: PathBuf,
}

impl FsImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedImage>> + Send {
        let path = self.base_dir.join(url);
        async move {
            // Decoding is CPU-bound; keep it off the event loop.
            tokio::task::spawn_blocking(move || decode_file(&path))
                .await
                .context("image decode task panicked")?
        }
    }
}

fn decode_file(path: &Path) -> Result<LoadedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode image: {:?}", path))?;
    let rgba = image.to_rgba8();
    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

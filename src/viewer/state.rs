//! Navigation state machine for the enlarged view.
//!
//! Two states: closed (browsing thumbnails) and open at a picture index.
//! The index is only meaningful while open and is always a valid index
//! into the current collection. This state plus the URL fragment are the
//! only mutable session state, and this machine is their sole writer.

use tracing::debug;

/// Snapshot of the current view, handed to hosts that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    pub collection_key: String,
    /// `Some(index)` iff the enlarged view is open.
    pub picture: Option<usize>,
}

/// Tracks the open collection and the enlarged-view position.
#[derive(Debug)]
pub struct NavigationState {
    collection_key: String,
    /// Picture count of the current collection.
    len: usize,
    picture: Option<usize>,
}

impl NavigationState {
    pub fn new(collection_key: impl Into<String>, len: usize) -> Self {
        Self {
            collection_key: collection_key.into(),
            len,
            picture: None,
        }
    }

    pub fn collection_key(&self) -> &str {
        &self.collection_key
    }

    pub fn picture_count(&self) -> usize {
        self.len
    }

    pub fn is_open(&self) -> bool {
        self.picture.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.picture
    }

    pub fn snapshot(&self) -> ViewerState {
        ViewerState {
            collection_key: self.collection_key.clone(),
            picture: self.picture,
        }
    }

    /// Switches to another collection without touching open/closed status.
    ///
    /// An open picture index that is out of range for the new collection
    /// closes the view; returns whether the view had to close.
    pub fn open_collection(&mut self, key: impl Into<String>, len: usize) -> bool {
        self.collection_key = key.into();
        self.len = len;
        match self.picture {
            Some(index) if index >= len => {
                debug!(index, len, "open picture invalid after collection switch, closing");
                self.picture = None;
                true
            }
            _ => false,
        }
    }

    /// Opens the enlarged view at `index`.
    ///
    /// Out of range is a caller bug, not a recoverable condition.
    pub fn open_picture(&mut self, index: usize) {
        debug_assert!(index < self.len, "picture index {} out of range", index);
        self.picture = Some(index);
    }

    /// Advances to the following picture, wrapping past the last one.
    /// Only meaningful while open; returns the new index.
    pub fn next(&mut self) -> Option<usize> {
        let index = self.picture?;
        let next = if index + 1 < self.len { index + 1 } else { 0 };
        self.picture = Some(next);
        Some(next)
    }

    /// Steps back to the preceding picture, wrapping before the first one.
    pub fn previous(&mut self) -> Option<usize> {
        let index = self.picture?;
        let previous = if index > 0 { index - 1 } else { self.len - 1 };
        self.picture = Some(previous);
        Some(previous)
    }

    /// Opens at the first picture of the collection, if it has any.
    pub fn first(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.picture = Some(0);
        self.picture
    }

    /// Opens at the last picture of the collection, if it has any.
    pub fn last(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.picture = Some(self.len - 1);
        self.picture
    }

    /// Closes the enlarged view; returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.picture.take().is_some()
    }
}

//! URL-fragment state store.
//!
//! The viewer persists its current collection and picture in the page's
//! location fragment so links can be shared and reloads land back on the
//! same view. The encoding is a flat `|key=value|key=value|` string:
//! - segments are split on `|`, empty segments discarded
//! - each segment splits on the FIRST `=`; values may contain `=`
//! - duplicate keys: last occurrence wins
//! - absence of a key means "unset"
//!
//! Every write re-encodes the full mapping and replaces the whole fragment.
//! The store assumes it is the only fragment writer on the page; there is
//! no merge with concurrent updates.

use std::collections::BTreeMap;

use tracing::debug;

/// Where the fragment string lives.
///
/// The hosting page adapts its `location.hash`; tests and headless hosts
/// use [`InMemoryFragment`].
pub trait FragmentBackend {
    fn read(&self) -> String;
    fn write(&mut self, fragment: &str);
}

/// Fragment backend holding the string in memory.
///
/// Clones share the same underlying value, so a test can keep a handle and
/// observe what the viewer wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFragment {
    value: std::sync::Arc<parking_lot::Mutex<String>>,
}

impl InMemoryFragment {
    pub fn new(fragment: &str) -> Self {
        Self {
            value: std::sync::Arc::new(parking_lot::Mutex::new(fragment.to_string())),
        }
    }
}

impl FragmentBackend for InMemoryFragment {
    fn read(&self) -> String {
        self.value.lock().clone()
    }

    fn write(&mut self, fragment: &str) {
        *self.value.lock() = fragment.to_string();
    }
}

/// Decodes a fragment string into its key → value mapping.
pub fn decode(fragment: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for segment in fragment.split('|') {
        if segment.is_empty() {
            continue;
        }
        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (key, value),
            // A segment without '=' is a key with an empty value; it is
            // dropped on re-encode, matching "empty value means unset".
            None => (segment, ""),
        };
        map.insert(key.to_string(), value.to_string());
    }
    map.retain(|_, v| !v.is_empty());
    map
}

/// Encodes a mapping back into the `|k=v|…|` fragment shape.
///
/// An empty mapping encodes as the empty string so the page ends up with a
/// bare URL rather than a dangling `|`.
pub fn encode(map: &BTreeMap<String, String>) -> String {
    if map.is_empty() {
        return String::new();
    }
    let mut out = String::from("|");
    for (key, value) in map {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('|');
    }
    out
}

/// Key-value view over a fragment backend.
///
/// No validation happens here; malformed values pass through opaquely and
/// the navigation layer is responsible for falling back on garbage.
pub struct FragmentStore<B: FragmentBackend> {
    backend: B,
}

impl<B: FragmentBackend> FragmentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        decode(&self.backend.read()).remove(key)
    }

    /// Sets `key` to `value`; an empty value deletes the key.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut map = decode(&self.backend.read());
        if value.is_empty() {
            map.remove(key);
        } else {
            map.insert(key.to_string(), value.to_string());
        }
        let encoded = encode(&map);
        debug!(key, value, fragment = %encoded, "fragment updated");
        self.backend.write(&encoded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        let map = decode("|c=beach|i=3|");
        assert_eq!(map.len(), 2);
        assert_eq!(map["c"], "beach");
        assert_eq!(map["i"], "3");
    }

    #[test]
    fn test_decode_discards_empty_segments() {
        let map = decode("||c=beach|||i=0|");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_decode_splits_on_first_equals_only() {
        let map = decode("|q=a=b=c|");
        assert_eq!(map["q"], "a=b=c");
    }

    #[test]
    fn test_decode_last_duplicate_wins() {
        let map = decode("|c=beach|c=forest|");
        assert_eq!(map["c"], "forest");
    }

    #[test]
    fn test_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert("c".to_string(), "beach".to_string());
        map.insert("i".to_string(), "3".to_string());
        map.insert("q".to_string(), "a=b".to_string());

        assert_eq!(decode(&encode(&map)), map);
    }

    #[test]
    fn test_encode_empty_map() {
        assert_eq!(encode(&BTreeMap::new()), "");
    }

    #[test]
    fn test_store_get_set() {
        let backend = InMemoryFragment::default();
        let handle = backend.clone();
        let mut store = FragmentStore::new(backend);

        assert_eq!(store.get("c"), None);
        store.set("c", "beach");
        store.set("i", "3");
        assert_eq!(store.get("c"), Some("beach".to_string()));
        assert_eq!(store.get("i"), Some("3".to_string()));
        assert_eq!(handle.read(), "|c=beach|i=3|");
    }

    #[test]
    fn test_set_empty_deletes() {
        let mut store = FragmentStore::new(InMemoryFragment::new("|c=beach|i=3|"));
        store.set("i", "");
        assert_eq!(store.get("i"), None);
        assert_eq!(store.get("c"), Some("beach".to_string()));
    }

    #[test]
    fn test_set_rewrites_whole_fragment() {
        let backend = InMemoryFragment::new("|c=beach|junk|i=2|");
        let handle = backend.clone();
        let mut store = FragmentStore::new(backend);

        store.set("i", "4");
        // Valueless segments do not survive the rewrite.
        assert_eq!(handle.read(), "|c=beach|i=4|");
    }

    #[test]
    fn test_malformed_values_pass_through() {
        let store = FragmentStore::new(InMemoryFragment::new("|i=notanumber|"));
        assert_eq!(store.get("i"), Some("notanumber".to_string()));
    }
}

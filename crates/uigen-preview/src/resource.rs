//! Browser-loadable resource handles for transformed modules.
//!
//! A [`Materializer`] turns module text into a URL the document's import
//! map can point at. Handles belong to one preview generation and are
//! released together when that generation is replaced or abandoned.
//!
//! Two materializers are provided:
//!
//! - [`DataUrlMaterializer`] inlines the module as a `data:` URL. The
//!   document is fully self-contained and there is nothing to release.
//! - [`BlobStore`] keeps module text in memory under content-addressed
//!   `blob:uigen/...` URLs, for hosts that serve the blobs themselves.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// MIME type used for module resources.
pub const MODULE_MIME: &str = "text/javascript";

/// A loadable URL for one module of one preview generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceHandle {
    /// URL placed in the import map
    pub url: String,
    /// Generation the handle belongs to
    pub generation: u64,
}

/// Produces resource handles for module text.
pub trait Materializer: Send + Sync + fmt::Debug {
    /// Wraps `code` into a handle owned by `generation`.
    fn materialize(&self, generation: u64, code: &str) -> ResourceHandle;

    /// Releases every handle of `generation`, returning how many were freed.
    fn release_generation(&self, generation: u64) -> usize;

    /// Releases every handle of generations older than `generation`.
    fn release_older_than(&self, generation: u64) -> usize;

    /// Number of handles currently held.
    fn live_handles(&self) -> usize;
}

/// Inlines modules as `data:` URLs.
///
/// # Examples
///
/// ```
/// use uigen_preview::{DataUrlMaterializer, Materializer};
///
/// let handle = DataUrlMaterializer.materialize(1, "export default 42;");
/// assert_eq!(handle.url, "data:text/javascript;charset=utf-8,export%20default%2042;");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlMaterializer;

impl Materializer for DataUrlMaterializer {
    fn materialize(&self, generation: u64, code: &str) -> ResourceHandle {
        ResourceHandle {
            url: format!("data:{MODULE_MIME};charset=utf-8,{}", percent_encode(code)),
            generation,
        }
    }

    fn release_generation(&self, _generation: u64) -> usize {
        0
    }

    fn release_older_than(&self, _generation: u64) -> usize {
        0
    }

    fn live_handles(&self) -> usize {
        0
    }
}

/// Percent-encodes everything outside a conservative URL-safe set.
#[must_use]
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.~!*'();:,=+/?@&$".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[derive(Debug)]
struct Blob {
    generation: u64,
    content: Arc<str>,
}

/// In-memory, content-addressed module store.
///
/// URLs have the form `blob:uigen/{generation}/{hash}`. The hash is the
/// blake3 digest of the module text, so identical modules within one
/// generation share a handle. Keying by generation means releasing one
/// generation never frees a handle the next one still uses.
///
/// # Examples
///
/// ```
/// use uigen_preview::{BlobStore, Materializer};
///
/// let store = BlobStore::new();
/// let handle = store.materialize(1, "export default 1;");
/// assert!(handle.url.starts_with("blob:uigen/1/"));
/// assert_eq!(store.get(&handle.url).as_deref(), Some("export default 1;"));
///
/// assert_eq!(store.release_generation(1), 1);
/// assert!(store.get(&handle.url).is_none());
/// ```
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

impl BlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the module text behind a handle URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Arc<str>> {
        self.blobs.read().get(url).map(|blob| Arc::clone(&blob.content))
    }

    /// Generations with at least one live handle, ascending.
    #[must_use]
    pub fn generations(&self) -> Vec<u64> {
        let mut generations: Vec<u64> = self
            .blobs
            .read()
            .values()
            .map(|blob| blob.generation)
            .collect();
        generations.sort_unstable();
        generations.dedup();
        generations
    }

    fn release_where(&self, mut doomed: impl FnMut(u64) -> bool) -> usize {
        let mut blobs = self.blobs.write();
        let before = blobs.len();
        blobs.retain(|_, blob| !doomed(blob.generation));
        before - blobs.len()
    }
}

impl Materializer for BlobStore {
    fn materialize(&self, generation: u64, code: &str) -> ResourceHandle {
        let hash = blake3::hash(code.as_bytes()).to_hex();
        let url = format!("blob:uigen/{generation}/{}", &hash.as_str()[..16]);
        self.blobs
            .write()
            .entry(url.clone())
            .or_insert_with(|| Blob {
                generation,
                content: Arc::from(code),
            });
        ResourceHandle { url, generation }
    }

    fn release_generation(&self, generation: u64) -> usize {
        let released = self.release_where(|g| g == generation);
        debug!(generation, released, "released blob handles");
        released
    }

    fn release_older_than(&self, generation: u64) -> usize {
        let released = self.release_where(|g| g < generation);
        debug!(generation, released, "released older blob handles");
        released
    }

    fn live_handles(&self) -> usize {
        self.blobs.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("#%\"<>\n"), "%23%25%22%3C%3E%0A");
        assert_eq!(percent_encode("é"), "%C3%A9");
        assert_eq!(percent_encode("import('x');"), "import('x');");
    }

    #[test]
    fn test_identical_modules_share_handle_within_generation() {
        let store = BlobStore::new();
        let a = store.materialize(1, "export default 1;");
        let b = store.materialize(1, "export default 1;");
        let c = store.materialize(2, "export default 1;");
        assert_eq!(a, b);
        assert_ne!(a.url, c.url);
        assert_eq!(store.live_handles(), 2);
    }

    #[test]
    fn test_release_older_keeps_current() {
        let store = BlobStore::new();
        store.materialize(1, "a");
        store.materialize(2, "b");
        store.materialize(3, "c");
        assert_eq!(store.release_older_than(3), 2);
        assert_eq!(store.generations(), vec![3]);
    }

    #[test]
    fn test_data_urls_hold_nothing() {
        let materializer = DataUrlMaterializer;
        materializer.materialize(1, "x");
        assert_eq!(materializer.live_handles(), 0);
        assert_eq!(materializer.release_generation(1), 0);
    }
}

//! Memory cache of decoded previews.
//!
//! Entries are evicted least-recently-used first once the total pixel bytes
//! would exceed the configured limit.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

/// Bytes per RGBA pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Upper bound on the number of entries regardless of their size.
const DEFAULT_LRU_CAPACITY: usize = 512;

/// A decoded RGBA8 image ready to upload as a texture.
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Preview {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn memory_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * BYTES_PER_PIXEL
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Source file plus the edge bound it was decoded for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub path: PathBuf,
    pub max_edge: u32,
}

impl PreviewKey {
    pub fn new(path: &Path, max_edge: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            max_edge,
        }
    }
}

/// Shared, cheaply clonable preview cache.
#[derive(Clone)]
pub struct PreviewCache {
    max_memory_bytes: usize,
    current_memory_bytes: Arc<RwLock<usize>>,
    entries: Arc<Mutex<LruCache<PreviewKey, Arc<Preview>>>>,
}

impl PreviewCache {
    pub fn new(max_memory_mb: usize) -> Self {
        Self::with_byte_limit(max_memory_mb.saturating_mul(1024 * 1024))
    }

    pub fn with_byte_limit(max_memory_bytes: usize) -> Self {
        debug!(max_memory_bytes, "Initialized preview cache");
        Self {
            max_memory_bytes,
            current_memory_bytes: Arc::new(RwLock::new(0)),
            entries: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_LRU_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ))),
        }
    }

    pub fn get(&self, key: &PreviewKey) -> Option<Arc<Preview>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &PreviewKey) -> bool {
        self.entries.lock().contains(key)
    }

    /// Inserts a preview, evicting older entries to stay under the limit.
    ///
    /// A preview larger than the whole limit is not cached.
    pub fn insert(&self, key: PreviewKey, preview: Arc<Preview>) -> bool {
        let new_size = preview.memory_bytes();
        if new_size > self.max_memory_bytes {
            trace!(?key.path, new_size, "Preview exceeds cache limit");
            return false;
        }

        let mut entries = self.entries.lock();
        let mut current = self.current_memory_bytes.write();

        if let Some(old) = entries.pop(&key) {
            *current = current.saturating_sub(old.memory_bytes());
        }

        while *current + new_size > self.max_memory_bytes {
            match entries.pop_lru() {
                Some((evicted_key, evicted)) => {
                    *current = current.saturating_sub(evicted.memory_bytes());
                    trace!(?evicted_key.path, current_bytes = *current, "Evicted preview");
                }
                None => break,
            }
        }

        if let Some((_, evicted)) = entries.push(key, preview) {
            // Capacity eviction of some other entry
            *current = current.saturating_sub(evicted.memory_bytes());
        }
        *current += new_size;
        true
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        *self.current_memory_bytes.write() = 0;
        debug!("Cleared preview cache");
    }

    pub fn memory_usage(&self) -> usize {
        *self.current_memory_bytes.read()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_memory(&self) -> usize {
        self.max_memory_bytes
    }
}

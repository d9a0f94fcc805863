//! Bounded in-memory manifest cache.
//!
//! Keyed by the streaming URL a manifest was generated from. Entries are
//! ranked by insertion order; when a new key arrives in a full cache only the
//! newest `round(maximum_size * clear_factor)` entries survive.

use dashmap::DashMap;
use mpdforge_common::{Error, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default maximum number of entries (effectively unbounded).
pub const DEFAULT_MAXIMUM_SIZE: usize = usize::MAX;

/// Default share of entries kept when the cache is trimmed.
pub const DEFAULT_CLEAR_FACTOR: f64 = 0.75;

/// Entry in the manifest cache.
struct CacheEntry {
    manifest: String,
    /// Insertion sequence number, higher is newer.
    sequence: u64,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    maximum_size: usize,
    clear_factor: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            maximum_size: DEFAULT_MAXIMUM_SIZE,
            clear_factor: DEFAULT_CLEAR_FACTOR,
        }
    }
}

/// Thread-safe cache of generated manifests.
pub struct ManifestCache {
    entries: DashMap<String, CacheEntry>,
    next_sequence: AtomicU64,
    /// Held by every writer so trimming and insertion never interleave.
    limits: Mutex<Limits>,
}

impl Default for ManifestCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManifestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let limits = *self.limits.lock();
        f.debug_struct("ManifestCache")
            .field("len", &self.entries.len())
            .field("maximum_size", &limits.maximum_size)
            .field("clear_factor", &limits.clear_factor)
            .finish()
    }
}

impl ManifestCache {
    /// Create an empty cache with default limits.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            limits: Mutex::new(Limits::default()),
        }
    }

    /// Create an empty cache with the given limits.
    pub fn with_limits(maximum_size: usize, clear_factor: f64) -> Result<Self> {
        let cache = Self::new();
        cache.set_maximum_size(maximum_size)?;
        cache.set_clear_factor(clear_factor)?;
        Ok(cache)
    }

    /// Get the manifest cached for `url`.
    pub fn get(&self, url: &str) -> Option<String> {
        self.entries.get(url).map(|entry| entry.manifest.clone())
    }

    pub fn contains_key(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Store a manifest, returning the one it replaced.
    ///
    /// Re-inserting an existing key refreshes it to newest without trimming.
    pub fn put(&self, url: impl Into<String>, manifest: impl Into<String>) -> Option<String> {
        let url = url.into();
        let limits = self.limits.lock();

        if !self.entries.contains_key(&url) && self.entries.len() >= limits.maximum_size {
            let keep = retained_count(limits.maximum_size, limits.clear_factor)
                .min(limits.maximum_size - 1);
            tracing::debug!(
                size = self.entries.len(),
                keep,
                "Manifest cache full, trimming"
            );
            self.keep_newest(keep);
        }

        let entry = CacheEntry {
            manifest: manifest.into(),
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };
        self.entries.insert(url, entry).map(|old| old.manifest)
    }

    /// Number of cached manifests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, keeping the limits.
    pub fn clear(&self) {
        let _limits = self.limits.lock();
        self.entries.clear();
    }

    /// Remove every entry and restore default limits.
    pub fn reset(&self) {
        let mut limits = self.limits.lock();
        self.entries.clear();
        *limits = Limits::default();
    }

    pub fn maximum_size(&self) -> usize {
        self.limits.lock().maximum_size
    }

    /// Set the maximum number of entries.
    ///
    /// Lowering the maximum on a non-empty cache trims it to the newest
    /// `round(maximum_size * clear_factor)` entries (at least one), even when
    /// the cache currently holds fewer than the new maximum.
    pub fn set_maximum_size(&self, maximum_size: usize) -> Result<()> {
        if maximum_size == 0 {
            return Err(Error::validation("Invalid maximum size: 0"));
        }

        let mut limits = self.limits.lock();
        if maximum_size < limits.maximum_size && !self.entries.is_empty() {
            self.keep_newest(retained_count(maximum_size, limits.clear_factor));
        }
        limits.maximum_size = maximum_size;
        Ok(())
    }

    pub fn reset_maximum_size(&self) {
        self.limits.lock().maximum_size = DEFAULT_MAXIMUM_SIZE;
    }

    pub fn clear_factor(&self) -> f64 {
        self.limits.lock().clear_factor
    }

    /// Set the share of entries kept when trimming. Must be in `(0, 1)`.
    pub fn set_clear_factor(&self, clear_factor: f64) -> Result<()> {
        if !(clear_factor > 0.0 && clear_factor < 1.0) {
            return Err(Error::validation(format!(
                "Invalid clear factor: {clear_factor}"
            )));
        }
        self.limits.lock().clear_factor = clear_factor;
        Ok(())
    }

    pub fn reset_clear_factor(&self) {
        self.limits.lock().clear_factor = DEFAULT_CLEAR_FACTOR;
    }

    /// Drop all but the `keep` most recently inserted entries.
    /// Callers must hold the limits lock.
    fn keep_newest(&self, keep: usize) {
        let mut ranked: Vec<(u64, String)> = self
            .entries
            .iter()
            .map(|entry| (entry.sequence, entry.key().clone()))
            .collect();
        if ranked.len() <= keep {
            return;
        }

        ranked.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        for (_, url) in ranked.into_iter().skip(keep) {
            self.entries.remove(&url);
        }
    }
}

/// Entries kept by a trim: never zero, never above the maximum.
fn retained_count(maximum_size: usize, clear_factor: f64) -> usize {
    ((maximum_size as f64 * clear_factor).round() as usize)
        .max(1)
        .min(maximum_size)
}

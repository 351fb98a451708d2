//! Render cache keyed by BLAKE3 digests
//!
//! Documentation builds format the same comments again and again (inherited
//! members, repeated runs over unchanged sources). [`RenderCache`] memoizes
//! formatted output under a digest of the input text and of every setting
//! that affects the output.
//!
//! # Key derivation
//!
//! 1. Hash the configuration fingerprint and the input with BLAKE3, each
//!    part length-prefixed so that part boundaries cannot shift
//! 2. Take the first 128 bits of the hash
//! 3. Encode as lowercase hexadecimal
//!
//! # Example
//!
//! ```
//! use doc_comment_formatter::cache::content_digest;
//!
//! let key = content_digest(&["class=Ext.Panel", "Shows the panel."]);
//! assert_eq!(key.len(), 32);
//! assert_eq!(key, content_digest(&["class=Ext.Panel", "Shows the panel."]));
//! assert_ne!(key, content_digest(&["class=Ext.Panel", "Hides the panel."]));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::scanner::Rendered;

/// Entry limit of [`RenderCache::new`]
pub const DEFAULT_CAPACITY: usize = 4096;

/// Digest of a sequence of text parts, as 32 hex characters
pub fn content_digest(parts: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    let hash = hasher.finalize();
    hex::encode(&hash.as_bytes()[..16])
}

/// Memoized formatting results
///
/// The cache holds at most `capacity` entries. Inserting into a full cache
/// evicts the oldest entry first. The cache belongs to the caller, who
/// decides its lifetime; [`RenderCache::clear`] empties it at any time.
#[derive(Debug, Clone)]
pub struct RenderCache {
    entries: HashMap<String, Rendered>,
    insertion_order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    /// Create a cache holding up to [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a cache holding up to `capacity` entries
    ///
    /// A capacity of zero is raised to one so the value just computed can
    /// always be returned by reference.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// # Arguments
    ///
    /// * `key` - Digest from [`content_digest`]
    /// * `render` - Called only when `key` is not cached
    ///
    /// # Returns
    ///
    /// The cached or freshly computed value
    pub fn get_or_insert_with(&mut self, key: String, render: impl FnOnce() -> Rendered) -> &Rendered {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self.insertion_order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
            self.insertion_order.push_back(key.clone());
        }
        self.entries.entry(key).or_insert_with(render)
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to render
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop all entries; hit and miss counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

//! In-process query cache keyed by logical query identity.
//!
//! Entries are invalidated explicitly after writes. Invalidating a key also
//! drops every key nested under it, so `["tasks"]` clears `["tasks", "open"]`.
//! Mutations that update the cache ahead of the store take a [`CacheSnapshot`]
//! first and restore it if the write fails.

use std::{
    any::Any,
    collections::{hash_map::DefaultHasher, HashMap},
    fmt,
    hash::{Hash, Hasher},
};

use serde::Serialize;

/// Hierarchical cache key, e.g. `["dashboard", "2024-03-01"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

trait CacheValue: Any + Send + Sync {
    fn clone_box(&self) -> Box<dyn CacheValue>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Clone + Send + Sync> CacheValue for T {
    fn clone_box(&self) -> Box<dyn CacheValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn CacheValue> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// Copy of selected entries taken before an optimistic write.
#[derive(Clone)]
pub struct CacheSnapshot {
    entries: Vec<(QueryKey, Option<Box<dyn CacheValue>>)>,
}

impl fmt::Debug for CacheSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, value)| (key, value.is_some())))
            .finish()
    }
}

#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Box<dyn CacheValue>>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&QueryKey> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("QueryCache").field("keys", &keys).finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Cached value for `key`, if present and stored with type `T`.
    pub fn get<T: Any + Clone + Send + Sync>(&self, key: &QueryKey) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: Any + Clone + Send + Sync>(&mut self, key: QueryKey, value: T) {
        self.entries.insert(key, Box::new(value));
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    pub fn get_or_insert_with<T, E, F>(&mut self, key: QueryKey, load: F) -> Result<T, E>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(hit) = self.get::<T>(&key) {
            return Ok(hit);
        }
        tracing::debug!(%key, "cache miss");
        let value = load()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drops `key` and every entry nested under it. Returns how many entries went.
    pub fn invalidate(&mut self, key: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|existing, _| !key.is_prefix_of(existing));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            tracing::debug!(%key, dropped, "cache invalidated");
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Captures the current state of every entry under `keys`, including the
    /// absence of an entry, so [`QueryCache::restore`] can put things back exactly.
    pub fn snapshot(&self, keys: &[QueryKey]) -> CacheSnapshot {
        let mut entries = Vec::new();
        for key in keys {
            let mut found = false;
            for (existing, value) in &self.entries {
                if key.is_prefix_of(existing) {
                    entries.push((existing.clone(), Some(value.clone())));
                    found = true;
                }
            }
            if !found {
                entries.push((key.clone(), None));
            }
        }
        CacheSnapshot { entries }
    }

    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        for (key, _) in &snapshot.entries {
            self.invalidate(key);
        }
        for (key, value) in snapshot.entries {
            if let Some(value) = value {
                self.entries.insert(key, value);
            }
        }
    }
}

/// Single-slot memo keyed on a fingerprint of its inputs.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    slot: Option<(u64, T)>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized result when `input` fingerprints the same as last
    /// time, otherwise recomputes it.
    pub fn get_or_compute<I, F>(&mut self, input: &I, compute: F) -> T
    where
        I: Serialize + ?Sized,
        F: FnOnce() -> T,
    {
        let key = fingerprint(input);
        if let Some((cached_key, value)) = &self.slot {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        self.slot = Some((key, value.clone()));
        value
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Stable-within-process hash of a value's JSON form. Values that fail to
/// serialize all share one fingerprint.
pub fn fingerprint<I: Serialize + ?Sized>(input: &I) -> u64 {
    let mut hasher = DefaultHasher::new();
    match serde_json::to_vec(input) {
        Ok(bytes) => bytes.hash(&mut hasher),
        Err(_) => 0u8.hash(&mut hasher),
    }
    hasher.finish()
}

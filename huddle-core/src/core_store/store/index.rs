/*
    index.rs - Ordered multi-valued lookup indices

    A MultiIndexStore maps one projection of an entity (identifier,
    creation time, text) to the values stored under it. Keys are kept in
    the order given by their `Ord` impl so callers can run range, prefix and
    "first N" queries. Several values may share a key; lookups resolve ties
    by insertion order within the key's bucket.
*/

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Bound, RangeBounds};

/// Ordered index allowing duplicate keys
#[derive(Debug, Clone)]
pub struct MultiIndexStore<K, V> {
    buckets: BTreeMap<K, Vec<V>>,
    len: usize,
}

impl<K: Ord, V> MultiIndexStore<K, V> {
    pub fn new() -> Self {
        MultiIndexStore {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    /// Add a value under `key`; existing values are never displaced
    pub fn insert(&mut self, key: K, value: V) {
        self.buckets.entry(key).or_default().push(value);
        self.len += 1;
    }

    /// First value inserted under `key`
    pub fn first(&self, key: &K) -> Option<&V> {
        self.buckets.get(key).and_then(|bucket| bucket.first())
    }

    pub(crate) fn first_mut(&mut self, key: &K) -> Option<&mut V> {
        self.buckets.get_mut(key).and_then(|bucket| bucket.first_mut())
    }

    /// Every value under `key`, in insertion order
    pub fn at(&self, key: &K) -> impl Iterator<Item = &V> + '_ {
        self.buckets.get(key).into_iter().flatten()
    }

    /// Every value, in key order
    pub fn all(&self) -> impl Iterator<Item = &V> + '_ {
        self.buckets.values().flatten()
    }

    /// Every (key, value) pair, in key order
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |value| (key, value)))
    }

    /// Values whose key is at or after `start`
    pub fn after(&self, start: &K) -> impl Iterator<Item = &V> + '_ {
        self.buckets
            .range((Bound::Included(start), Bound::Unbounded))
            .flat_map(|(_, bucket)| bucket.iter())
    }

    /// Values whose key is at or before `end`
    pub fn before(&self, end: &K) -> impl Iterator<Item = &V> + '_ {
        self.buckets
            .range((Bound::Unbounded, Bound::Included(end)))
            .flat_map(|(_, bucket)| bucket.iter())
    }

    /// Values whose key falls in `range`; an inverted range yields nothing
    pub fn range<'a, R>(&'a self, range: R) -> impl Iterator<Item = &'a V> + 'a
    where
        R: RangeBounds<K> + 'a,
    {
        let buckets = if is_valid_range(&range) {
            Some(self.buckets.range(range))
        } else {
            None
        };

        buckets
            .into_iter()
            .flatten()
            .flat_map(|(_, bucket)| bucket.iter())
    }

    /// Remove the first value under `key` accepted by `matches`
    pub fn remove<F>(&mut self, key: &K, mut matches: F) -> Option<V>
    where
        F: FnMut(&V) -> bool,
    {
        let bucket = self.buckets.get_mut(key)?;
        let pos = bucket.iter().position(|value| matches(value))?;
        let value = bucket.remove(pos);

        if bucket.is_empty() {
            self.buckets.remove(key);
        }

        self.len -= 1;
        Some(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets.contains_key(key)
    }

    /// Total number of values across all keys
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<K: Ord, V> Default for MultiIndexStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MultiIndexStore<CaseInsensitive, V> {
    /// Values whose text key starts with `prefix`, ignoring case
    pub fn with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a V> + 'a {
        let prefix = CaseInsensitive::new(prefix);

        self.buckets
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .flat_map(|(_, bucket)| bucket.iter())
    }
}

/// BTreeMap::range panics on inverted or empty-exclusive bounds
fn is_valid_range<K: Ord, R: RangeBounds<K>>(range: &R) -> bool {
    match (range.start_bound(), range.end_bound()) {
        (Bound::Excluded(start), Bound::Excluded(end)) => start < end,
        (
            Bound::Included(start) | Bound::Excluded(start),
            Bound::Included(end) | Bound::Excluded(end),
        ) => start <= end,
        _ => true,
    }
}

/// Text key compared without regard to case
///
/// The original spelling is kept for display; ordering and equality use
/// the lowercased characters.
#[derive(Debug, Clone)]
pub struct CaseInsensitive(String);

impl CaseInsensitive {
    pub fn new(text: impl Into<String>) -> Self {
        CaseInsensitive(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_lowercase)
    }

    pub fn starts_with(&self, prefix: &CaseInsensitive) -> bool {
        let mut chars = self.folded();
        prefix.folded().all(|c| chars.next() == Some(c))
    }
}

impl Ord for CaseInsensitive {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for CaseInsensitive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CaseInsensitive {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CaseInsensitive {}

impl fmt::Display for CaseInsensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseInsensitive {
    fn from(text: &str) -> Self {
        CaseInsensitive::new(text)
    }
}

/*!

A `MemoCache` is a thin wrapper around a capacity-bounded LRU map, used to memoize pure functions
keyed on structural terms. It is the performance-only counterpart to a `mod2`-style `MemoMap`: a
lookup miss never changes observable results, only how much work was repeated to get them.

*/

use std::{
  hash::Hash,
  num::NonZeroUsize,
};

use lru::LruCache;

/// Default capacity used when a caller doesn't have a specific budget in mind. Spec requires
/// "capacity >= 32".
pub const DEFAULT_CAPACITY: usize = 64;

pub struct MemoCache<K, V> {
  inner: LruCache<K, V>,
}

impl<K: Eq + Hash, V: Clone> MemoCache<K, V> {
  pub fn new(capacity: usize) -> Self {
    let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
    Self { inner: LruCache::new(capacity) }
  }

  pub fn with_default_capacity() -> Self {
    Self::new(DEFAULT_CAPACITY)
  }

  /// Returns the cached value for `key`, if any, without affecting recency bookkeeping.
  pub fn peek(&self, key: &K) -> Option<&V> {
    self.inner.peek(key)
  }

  /// Returns the cached value if present, otherwise computes it with `f`, caches it, and returns it.
  pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> V
  where
    F: FnOnce() -> V,
  {
    if let Some(value) = self.inner.get(&key) {
      return value.clone();
    }
    let value = f();
    self.inner.put(key, value.clone());
    value
  }

  pub fn clear(&mut self) {
    self.inner.clear();
  }

  pub fn len(&self) -> usize {
    self.inner.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memoizes_and_evicts() {
    let mut cache: MemoCache<i32, i32> = MemoCache::new(2);
    let mut calls = 0;
    let mut compute = |n: i32| {
      calls += 1;
      n * n
    };

    assert_eq!(cache.get_or_insert_with(1, || compute(1)), 1);
    assert_eq!(cache.get_or_insert_with(1, || compute(1)), 1);
    assert_eq!(calls, 1, "second call should hit the cache");

    cache.get_or_insert_with(2, || compute(2));
    cache.get_or_insert_with(3, || compute(3)); // evicts key 1 (capacity 2, LRU)

    assert!(cache.peek(&1).is_none());
  }
}

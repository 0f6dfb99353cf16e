/* crates/questline-client/src/cache.rs */

use questline_ssr::InitialDataStore;
use serde_json::Value;

/// The hydration-time view of the server's data store. Entries are
/// consumed at most once per key: the first page instance to ask for a
/// key gets the server payload, every later lookup misses and goes
/// through the live-fetch path.
#[derive(Debug, Default)]
pub struct ClientCache {
  store: InitialDataStore,
}

impl ClientCache {
  pub fn new(store: InitialDataStore) -> Self {
    Self { store }
  }

  /// A cache for fresh (non-hydrated) mounts. Every lookup misses.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Remove and return the payload for `key`, if the server provided one
  /// and nothing consumed it yet.
  pub fn take(&mut self, key: &str) -> Option<Value> {
    self.store.take(key)
  }

  pub fn len(&self) -> usize {
    self.store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn entries_are_consumed_once() {
    let mut store = InitialDataStore::new();
    store.set("home:main", json!({"headline": "hi"}));
    let mut cache = ClientCache::new(store);

    assert_eq!(cache.take("home:main"), Some(json!({"headline": "hi"})));
    assert_eq!(cache.take("home:main"), None);
  }

  #[test]
  fn empty_cache_always_misses() {
    let mut cache = ClientCache::empty();
    assert_eq!(cache.take("list:1:::"), None);
  }
}

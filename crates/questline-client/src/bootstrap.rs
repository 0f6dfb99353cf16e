/* crates/questline-client/src/bootstrap.rs */

use questline_ssr::InitialDataStore;

use crate::cache::ClientCache;
use crate::handoff::TransportHandoff;

/// How the client should bring up the view tree.
pub enum MountMode {
  /// Server markup exists: reconcile against it and resolve initial page
  /// data from the cache.
  Hydrate(ClientCache),
  /// No usable server data: mount from scratch, all data goes through
  /// live fetches.
  Fresh,
}

impl MountMode {
  pub fn is_hydrate(&self) -> bool {
    matches!(self, Self::Hydrate(_))
  }
}

/// Decide the mount mode from the transported blob. The handoff is
/// consumed in every path, including parse failure, so no later
/// client-side navigation can observe the blob again.
pub fn bootstrap(handoff: &mut TransportHandoff) -> MountMode {
  let Some(raw) = handoff.take() else {
    return MountMode::Fresh;
  };
  match InitialDataStore::deserialize(&raw) {
    Ok(store) => MountMode::Hydrate(ClientCache::new(store)),
    Err(_) => MountMode::Fresh,
  }
}

/* crates/questline-client-wasm/src/lib.rs */

use questline_ssr::{route_key, InitialDataStore, RouteTable};
use wasm_bindgen::prelude::*;

/// Cache key for a navigation target, computed with the same builder the
/// server used. Returns `undefined` for paths outside the public set.
#[wasm_bindgen]
pub fn cache_key_for(target: &str) -> Option<String> {
  RouteTable::site().resolve_target(target).map(|route| route_key(&route))
}

/// Consume one entry from the embedded transport blob. Returns the
/// payload as a JSON string, or `"null"` when the blob is unreadable or
/// the key is absent.
#[wasm_bindgen]
pub fn take_payload(raw: &str, key: &str) -> String {
  let Ok(mut store) = InitialDataStore::deserialize(raw) else {
    return "null".to_string();
  };
  store.take(key).map_or_else(|| "null".to_string(), |payload| payload.to_string())
}

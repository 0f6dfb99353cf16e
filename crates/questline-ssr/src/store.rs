/* crates/questline-ssr/src/store.rs */

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::SsrError;
use crate::escape::escape_embedded_json;

/// Element id of the embedded transport script.
pub const DEFAULT_DATA_ID: &str = "__QUESTLINE_DATA__";

/// Per-request key→payload map. Created empty at the start of a server
/// render, populated with successful loader payloads only, serialized
/// into the document, and reconstructed once on the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialDataStore {
  entries: BTreeMap<String, Value>,
}

impl InitialDataStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn set(&mut self, key: impl Into<String>, payload: Value) {
    self.entries.insert(key.into(), payload);
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.entries.get(key)
  }

  /// Remove and return an entry. The client consume-once path.
  pub fn take(&mut self, key: &str) -> Option<Value> {
    self.entries.remove(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  /// Combine two stores; on key collision the right side wins.
  pub fn merge(left: Self, right: Self) -> Self {
    let mut entries = left.entries;
    entries.extend(right.entries);
    Self { entries }
  }

  /// Serialize for transport inside an inline `<script>` element. The
  /// output is escaped so payload content cannot terminate the carrier.
  pub fn serialize(&self) -> Result<String, SsrError> {
    let json =
      serde_json::to_string(&self.entries).map_err(|e| SsrError::serialize(e.to_string()))?;
    Ok(escape_embedded_json(&json))
  }

  pub fn deserialize(raw: &str) -> Result<Self, SsrError> {
    let entries: BTreeMap<String, Value> =
      serde_json::from_str(raw).map_err(|e| SsrError::serialize(e.to_string()))?;
    Ok(Self { entries })
  }

  /// Render the transport script tag.
  pub fn to_script(&self, data_id: &str) -> Result<String, SsrError> {
    let json = self.serialize()?;
    Ok(format!(r#"<script id="{data_id}" type="application/json">{json}</script>"#))
  }

  /// Inject the transport script before `</body>`, appending when the
  /// document has no body close tag.
  pub fn inject_into(&self, html: &str, data_id: &str) -> Result<String, SsrError> {
    let script = self.to_script(data_id)?;
    if let Some(pos) = html.rfind("</body>") {
      let mut result = String::with_capacity(html.len() + script.len());
      result.push_str(&html[..pos]);
      result.push_str(&script);
      result.push_str(&html[pos..]);
      Ok(result)
    } else {
      Ok(format!("{html}{script}"))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn set_get_take() {
    let mut store = InitialDataStore::new();
    store.set("home:main", json!({"headline": "Welcome"}));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("home:main"), Some(&json!({"headline": "Welcome"})));
    assert_eq!(store.take("home:main"), Some(json!({"headline": "Welcome"})));
    assert_eq!(store.take("home:main"), None);
    assert!(store.is_empty());
  }

  #[test]
  fn merge_is_right_biased() {
    let mut a = InitialDataStore::new();
    a.set("k", json!(1));
    a.set("only-a", json!("a"));
    let mut b = InitialDataStore::new();
    b.set("k", json!(2));

    let merged = InitialDataStore::merge(a, b);
    assert_eq!(merged.get("k"), Some(&json!(2)));
    assert_eq!(merged.get("only-a"), Some(&json!("a")));
  }

  #[test]
  fn round_trip_deep_equality() {
    let mut store = InitialDataStore::new();
    store.set(
      "list:1:::",
      json!({"items": [{"title": "One", "tags": ["a", "b"]}], "total": 14, "nested": {"x": null}}),
    );
    store.set("detail:quests:q1", json!({"body": "<p>hi</p>"}));

    let raw = store.serialize().expect("serialize");
    let back = InitialDataStore::deserialize(&raw).expect("deserialize");
    assert_eq!(back, store);
  }

  #[test]
  fn serialized_form_is_embedding_safe() {
    let mut store = InitialDataStore::new();
    store.set("detail:quests:q1", json!({"body": "</script><script>alert(1)</script>"}));
    let raw = store.serialize().expect("serialize");
    assert!(!raw.contains("</script>"));
  }

  #[test]
  fn inject_before_body_close() {
    let store = InitialDataStore::new();
    let html = store
      .inject_into("<html><body><main>x</main></body></html>", DEFAULT_DATA_ID)
      .expect("inject");
    let script_pos = html.find("<script id=\"__QUESTLINE_DATA__\"").expect("script present");
    let body_pos = html.find("</body>").expect("body close");
    assert!(script_pos < body_pos);
  }

  #[test]
  fn inject_appends_without_body() {
    let store = InitialDataStore::new();
    let html = store.inject_into("<main>x</main>", DEFAULT_DATA_ID).expect("inject");
    assert!(html.ends_with("</script>"));
  }
}

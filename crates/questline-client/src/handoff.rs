/* crates/questline-client/src/handoff.rs */

/// One-shot carrier for the serialized data blob the server embedded in
/// the document. `take` returns the blob exactly once and clears the
/// internal state in the same step, so a later full-page load is the only
/// way to reacquire a server-provided map.
#[derive(Debug, Default)]
pub struct TransportHandoff {
  raw: Option<String>,
}

impl TransportHandoff {
  /// Wrap the embedded blob read out of the document.
  pub fn new(raw: impl Into<String>) -> Self {
    Self { raw: Some(raw.into()) }
  }

  /// A handoff for documents that carried no server data.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Consume the blob. Second and later calls return `None`.
  pub fn take(&mut self) -> Option<String> {
    self.raw.take()
  }

  pub fn is_spent(&self) -> bool {
    self.raw.is_none()
  }
}

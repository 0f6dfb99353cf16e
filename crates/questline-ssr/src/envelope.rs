/* crates/questline-ssr/src/envelope.rs */

use serde::{Deserialize, Serialize};

/// Uniform result shape every data loader produces, on the server and on
/// the client. `data` is populated only for success statuses; failures
/// carry the upstream (or synthesized) status plus a usable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
  pub data: Option<T>,
  pub status: u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T> Envelope<T> {
  pub fn success(data: T) -> Self {
    Self { data: Some(data), status: 200, error: None }
  }

  /// Success with the upstream 2xx status preserved. A non-2xx status is
  /// coerced into a failure so `data` can never accompany an error status.
  pub fn success_with_status(data: T, status: u16) -> Self {
    if (200..300).contains(&status) {
      Self { data: Some(data), status, error: None }
    } else {
      Self::failure(status, format!("non-success status {status}"))
    }
  }

  pub fn failure(status: u16, error: impl Into<String>) -> Self {
    Self { data: None, status, error: Some(error.into()) }
  }

  /// Synthesized 400 for malformed required parameters.
  pub fn bad_request(msg: impl Into<String>) -> Self {
    Self::failure(400, msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::failure(404, msg)
  }

  /// Synthesized 500 for unexpected failures (network partition, bad
  /// payloads, panicked loader tasks).
  pub fn internal(msg: impl Into<String>) -> Self {
    Self::failure(500, msg)
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

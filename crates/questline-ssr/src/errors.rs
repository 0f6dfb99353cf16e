/* crates/questline-ssr/src/errors.rs */

use std::fmt;

#[derive(Debug)]
pub struct SsrError {
  code: String,
  message: String,
  status: u16,
}

fn default_status(code: &str) -> u16 {
  match code {
    "VALIDATION_ERROR" => 400,
    "NOT_FOUND" => 404,
    "RENDER_ERROR" => 500,
    "SERIALIZE_ERROR" => 500,
    "INTERNAL_ERROR" => 500,
    _ => 500,
  }
}

impl SsrError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self { code: code.into(), message: message.into(), status }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self { code, message: message.into(), status }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::with_code("VALIDATION_ERROR", msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  /// Fault while producing markup. Fatal to the request.
  pub fn render(msg: impl Into<String>) -> Self {
    Self::with_code("RENDER_ERROR", msg)
  }

  /// Fault while serializing or reading back the data store. Fatal to the request.
  pub fn serialize(msg: impl Into<String>) -> Self {
    Self::with_code("SERIALIZE_ERROR", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn status(&self) -> u16 {
    self.status
  }
}

impl fmt::Display for SsrError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code, self.message)
  }
}

impl std::error::Error for SsrError {}

/* crates/questline-serve/src/config.rs */

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

pub struct Config {
  pub port: u16,
  pub backend_url: String,
  /// Optional path to a page template on disk; the built-in shell is
  /// used when unset.
  pub template_path: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    Self {
      port: try_load("QUESTLINE_PORT", "4173"),
      backend_url: try_load("QUESTLINE_BACKEND_URL", "http://127.0.0.1:8000"),
      template_path: env::var("QUESTLINE_TEMPLATE").ok(),
    }
  }
}

fn var(key: &str) -> Result<String, ()> {
  env::var(key).map_err(|_| {
    info!("{key} not set, using default");
  })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
  T::Err: Display,
{
  var(key)
    .unwrap_or_else(|_| default.to_string())
    .parse()
    .map_err(|e| {
      warn!("Invalid {key} value: {e}");
    })
    .expect("Environment misconfigured!")
}

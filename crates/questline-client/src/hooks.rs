/* crates/questline-client/src/hooks.rs */

use questline_ssr::Envelope;
use serde_json::Value;

use crate::cache::ClientCache;

/// Visible state of one page instance's data subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
  Idle,
  Loading,
  Ready(Value),
  Failed { status: u16, error: String },
}

/// Proof that a live fetch was started for a specific navigation
/// generation. `apply` honors it only while that generation is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
  pub key: String,
  generation: u64,
}

/// What a navigation asks the caller to do next.
#[derive(Debug, PartialEq, Eq)]
pub enum Navigation {
  /// Server-provided payload was consumed; state is already `Ready`.
  Cached,
  /// Start a live fetch for `ticket.key` and feed the envelope back
  /// through `apply`.
  Fetch(FetchTicket),
}

/// Per-page data subscription. The key is computed by the caller from
/// *current* navigation state with the shared key builder; the hook
/// consults the consume-once cache first and otherwise hands out a
/// generation-stamped fetch ticket. A result arriving after a newer
/// navigation is discarded, so older data can never overwrite newer.
#[derive(Debug, Default)]
pub struct PageDataHook {
  generation: u64,
  state: PageState,
}

impl Default for PageState {
  fn default() -> Self {
    Self::Idle
  }
}

impl PageDataHook {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> &PageState {
    &self.state
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Enter a new navigation state for this page instance.
  pub fn navigate(&mut self, cache: &mut ClientCache, key: impl Into<String>) -> Navigation {
    self.generation += 1;
    let key = key.into();

    if let Some(payload) = cache.take(&key) {
      self.state = PageState::Ready(payload);
      return Navigation::Cached;
    }

    self.state = PageState::Loading;
    Navigation::Fetch(FetchTicket { key, generation: self.generation })
  }

  /// Apply a live-fetch result. Returns `false` (and changes nothing)
  /// when the ticket's generation is no longer current.
  pub fn apply(&mut self, ticket: &FetchTicket, envelope: Envelope) -> bool {
    if ticket.generation != self.generation {
      return false;
    }

    self.state = if envelope.is_success() {
      match envelope.data {
        Some(payload) => PageState::Ready(payload),
        None => PageState::Failed { status: envelope.status, error: "empty payload".into() },
      }
    } else {
      PageState::Failed {
        status: envelope.status,
        error: envelope.error.unwrap_or_else(|| format!("status {}", envelope.status)),
      }
    };
    true
  }
}

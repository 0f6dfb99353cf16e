/* crates/questline-ssr/src/http.rs */

use std::sync::Arc;

use serde_json::Value;

use crate::envelope::Envelope;
use crate::loader::{loader, LoaderSet};
use crate::route::RouteParams;

/// Thin GET-JSON client over the content backend. Produces envelopes:
/// upstream status is preserved, non-2xx bodies are decoded into a usable
/// error string, transport failures synthesize a 500.
pub struct ApiClient {
  base_url: String,
  client: reqwest::Client,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into();
    Self { base_url: base_url.trim_end_matches('/').to_string(), client: reqwest::Client::new() }
  }

  pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Envelope {
    let url = format!("{}{}", self.base_url, path);
    let request = self.client.get(&url).query(query);

    let response = match request.send().await {
      Ok(response) => response,
      Err(e) => return Envelope::internal(format!("backend unreachable: {e}")),
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
      Ok(body) => body,
      Err(e) => return Envelope::internal(format!("backend body read failed: {e}")),
    };

    if (200..300).contains(&status) {
      match serde_json::from_str::<Value>(&body) {
        Ok(value) => Envelope::success_with_status(value, status),
        Err(e) => Envelope::internal(format!("backend returned invalid JSON: {e}")),
      }
    } else {
      Envelope::failure(status, error_message(&body, status))
    }
  }
}

/// Decode a non-2xx body into a message: prefer a JSON `error` field,
/// fall back to the raw text, then to the bare status.
fn error_message(body: &str, status: u16) -> String {
  if let Ok(value) = serde_json::from_str::<Value>(body) {
    if let Some(msg) = value.get("error").and_then(Value::as_str) {
      return msg.to_string();
    }
  }
  let trimmed = body.trim();
  if trimmed.is_empty() { format!("status {status}") } else { trimmed.to_string() }
}

/// Loaders for one app mount, bound to the backend endpoints under
/// `api_mount` (root app: `/api` with list path `quests`; the journal
/// sub-app: `/api/journal` with list path `posts`).
pub fn site_loaders(api: Arc<ApiClient>, api_mount: &str, list_path: &str) -> LoaderSet {
  let mount = api_mount.trim_end_matches('/').to_string();
  let list_path = list_path.to_string();

  let home_api = Arc::clone(&api);
  let home_mount = mount.clone();
  let list_api = Arc::clone(&api);
  let list_mount = mount.clone();
  let detail_api = api;
  let detail_mount = mount;

  LoaderSet::new()
    .home(loader(move |params| {
      let api = Arc::clone(&home_api);
      let path = format!("{home_mount}/home");
      async move {
        match params {
          RouteParams::Home => api.get_json(&path, &[]).await,
          _ => Envelope::bad_request("home loader given non-home parameters"),
        }
      }
    }))
    .list(loader(move |params| {
      let api = Arc::clone(&list_api);
      let path = format!("{list_mount}/{list_path}");
      async move {
        match params {
          RouteParams::List(query) => {
            let mut pairs = vec![("page".to_string(), query.page.to_string())];
            for tag in &query.tags {
              pairs.push(("tag".to_string(), tag.clone()));
            }
            if let Some(from) = &query.from {
              pairs.push(("from".to_string(), from.clone()));
            }
            if let Some(to) = &query.to {
              pairs.push(("to".to_string(), to.clone()));
            }
            api.get_json(&path, &pairs).await
          }
          _ => Envelope::bad_request("list loader given non-list parameters"),
        }
      }
    }))
    .detail(loader(move |params| {
      let api = Arc::clone(&detail_api);
      let mount = detail_mount.clone();
      async move {
        match params {
          RouteParams::Detail { collection, id } => {
            api.get_json(&format!("{mount}/{collection}/{id}"), &[]).await
          }
          _ => Envelope::bad_request("detail loader given non-detail parameters"),
        }
      }
    }))
}

/* crates/questline-axum/src/handler.rs */

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use questline_ssr::{SsrError, SsrPipeline};

use crate::error::AxumError;

pub(crate) struct AppState {
  pub pipeline: SsrPipeline,
}

/// Shown for render/serialization faults. Detail stays in the server log;
/// the visitor never sees the raw error.
const FAILURE_DOCUMENT: &str = concat!(
  r#"<!doctype html><html><head><meta charset="utf-8">"#,
  "<title>Something went wrong</title></head>",
  "<body><main><h1>Something went wrong</h1>",
  "<p>The page could not be rendered. Please try again.</p></main></body></html>",
);

pub(crate) async fn handle_health() -> &'static str {
  "ok"
}

/// Every GET that no fixed route claimed: server-render public paths,
/// serve the bare shell for everything else (admin and other client-only
/// surfaces take over in the browser).
pub(crate) async fn handle_public(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
  let target = uri.path_and_query().map_or("/", |pq| pq.as_str());

  match state.pipeline.render_request(target).await {
    Ok(Some(page)) => {
      let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
      (status, Html(page.html)).into_response()
    }
    Ok(None) => Html(state.pipeline.template().to_string()).into_response(),
    Err(err) => {
      tracing::error!(url = target, error = %err, "page render failed");
      (StatusCode::INTERNAL_SERVER_ERROR, Html(FAILURE_DOCUMENT.to_string())).into_response()
    }
  }
}

#[derive(serde::Deserialize)]
pub(crate) struct DataQuery {
  path: String,
}

/// Client-navigation data endpoint: run the loader matching `path` and
/// return its envelope, mirroring the envelope status on the response.
pub(crate) async fn handle_page_data(
  State(state): State<Arc<AppState>>,
  Query(query): Query<DataQuery>,
) -> Result<Response, AxumError> {
  let route = state
    .pipeline
    .resolve(&query.path)
    .ok_or_else(|| SsrError::not_found("not a server-renderable path"))?;

  let envelope = state.pipeline.load_route(&route).await;
  let status = StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
  Ok((status, axum::Json(envelope)).into_response())
}

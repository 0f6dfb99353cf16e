/* crates/questline-axum/src/lib.rs */

mod error;
mod handler;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use questline_ssr::SsrPipeline;
use tokio::net::TcpListener;

use handler::AppState;

/// The public site server: one SSR pipeline behind an axum router.
pub struct SsrSite {
  pipeline: SsrPipeline,
}

impl SsrSite {
  pub fn new(pipeline: SsrPipeline) -> Self {
    Self { pipeline }
  }

  pub fn into_router(self) -> Router {
    let state = Arc::new(AppState { pipeline: self.pipeline });

    Router::new()
      .route("/healthz", get(handler::handle_health))
      .route("/_questline/data", get(handler::handle_page_data))
      .fallback(get(handler::handle_public))
      .with_state(state)
  }

  pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.into_router();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("questline site listening on http://{addr}");
    axum::serve(listener, router).await?;
    Ok(())
  }
}

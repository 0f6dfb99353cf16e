/* crates/questline-serve/src/main.rs */

mod config;
mod site;

use std::sync::Arc;

use questline_axum::SsrSite;
use questline_ssr::{site_loaders, ApiClient, LoaderRegistry, RouteTable, SsrPipeline};
use tracing_subscriber::EnvFilter;

use config::Config;
use site::{SiteRenderer, DEFAULT_TEMPLATE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = Config::load();

  let template = match &config.template_path {
    Some(path) => std::fs::read_to_string(path)?,
    None => DEFAULT_TEMPLATE.to_string(),
  };

  let api = Arc::new(ApiClient::new(&config.backend_url));
  let loaders = LoaderRegistry::new()
    .register("", site_loaders(Arc::clone(&api), "/api", "quests"))
    .register("journal", site_loaders(api, "/api/journal", "posts"));

  let pipeline =
    SsrPipeline::new(RouteTable::site(), loaders, Arc::new(SiteRenderer), template).lang("en");

  let addr = format!("0.0.0.0:{}", config.port);
  SsrSite::new(pipeline).serve(&addr).await
}

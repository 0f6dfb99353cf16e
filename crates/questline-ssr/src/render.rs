/* crates/questline-ssr/src/render.rs */

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::errors::SsrError;
use crate::html::{inject_body, inject_head, inject_html_lang, HeadMeta};
use crate::key::route_key;
use crate::loader::{LoaderFn, LoaderRegistry};
use crate::route::{ResolvedRoute, RouteParams, RouteTable};
use crate::store::{InitialDataStore, DEFAULT_DATA_ID};

/// What the view tree hands back for one render pass: body markup plus
/// document metadata collected as a side output.
pub struct ViewOutput {
  pub body: String,
  pub head: HeadMeta,
}

/// Seam to the view-component tree. The store is the request-scoped
/// read-only handle pages resolve their data from; implementations must
/// report faults through `Err`, which is fatal to the request.
pub trait ViewRenderer: Send + Sync {
  fn render(&self, route: &ResolvedRoute, store: &InitialDataStore)
    -> Result<ViewOutput, SsrError>;
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
  pub html: String,
  pub status: u16,
}

/// Per-request server-render pipeline: resolve the route, run its
/// loaders, populate a fresh data store, render the view tree, assemble
/// the document with the transport script embedded. Nothing here is
/// shared mutable state; every request gets its own store.
pub struct SsrPipeline {
  routes: RouteTable,
  loaders: LoaderRegistry,
  renderer: Arc<dyn ViewRenderer>,
  template: String,
  data_id: String,
  lang: Option<String>,
}

impl SsrPipeline {
  pub fn new(
    routes: RouteTable,
    loaders: LoaderRegistry,
    renderer: Arc<dyn ViewRenderer>,
    template: impl Into<String>,
  ) -> Self {
    Self {
      routes,
      loaders,
      renderer,
      template: template.into(),
      data_id: DEFAULT_DATA_ID.to_string(),
      lang: None,
    }
  }

  pub fn data_id(mut self, data_id: impl Into<String>) -> Self {
    self.data_id = data_id.into();
    self
  }

  pub fn lang(mut self, lang: impl Into<String>) -> Self {
    self.lang = Some(lang.into());
    self
  }

  /// The raw page template, served as-is for client-only paths.
  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn resolve(&self, target: &str) -> Option<ResolvedRoute> {
    self.routes.resolve_target(target)
  }

  /// Run the matching loader for an already-resolved route and return its
  /// envelope. The client-navigation fetch path.
  pub async fn load_route(&self, route: &ResolvedRoute) -> Envelope {
    let Some(loader) = self.loaders.loader_for(route) else {
      return Envelope::not_found("no loader for route");
    };
    run_isolated(loader, route.params.clone()).await
  }

  /// Render one request target. `Ok(None)` means the path is outside the
  /// public enumeration and the caller falls through to the client-only
  /// path. `Err` means a render/serialization fault: the caller must log
  /// it with the URL and answer with a generic 500 document.
  pub async fn render_request(&self, target: &str) -> Result<Option<RenderedPage>, SsrError> {
    let Some(route) = self.routes.resolve_target(target) else {
      return Ok(None);
    };

    let (store, status) = self.run_loaders(&route).await;

    let view = self.renderer.render(&route, &store)?;

    let mut html = inject_body(&self.template, &view.body);
    html = inject_head(&html, &view.head);
    if let Some(ref lang) = self.lang {
      html = inject_html_lang(&html, lang);
    }
    let html = store.inject_into(&html, &self.data_id)?;

    Ok(Some(RenderedPage { html, status }))
  }

  /// Spawn every loader of the route concurrently, then collect in spawn
  /// order. A failing or panicked loader never aborts its siblings; the
  /// document status is the first non-2xx envelope in spawn order, else
  /// 200. Only successful payloads enter the store.
  async fn run_loaders(&self, route: &ResolvedRoute) -> (InitialDataStore, u16) {
    let mut jobs: Vec<(String, LoaderFn, RouteParams)> = Vec::new();
    if let Some(loader) = self.loaders.loader_for(route) {
      jobs.push((route_key(route), loader, route.params.clone()));
    }

    let handles: Vec<(String, tokio::task::JoinHandle<Envelope>)> = jobs
      .into_iter()
      .map(|(key, loader, params)| (key, tokio::spawn(async move { loader(params).await })))
      .collect();

    let mut envelopes = Vec::with_capacity(handles.len());
    for (key, handle) in handles {
      let envelope = match handle.await {
        Ok(envelope) => envelope,
        Err(e) => Envelope::internal(format!("loader task failed: {e}")),
      };
      envelopes.push((key, envelope));
    }

    let status = envelopes
      .iter()
      .map(|(_, envelope)| envelope.status)
      .find(|status| !(200..300).contains(status))
      .unwrap_or(200);

    let mut store = InitialDataStore::new();
    for (key, envelope) in envelopes {
      if envelope.is_success() {
        if let Some(data) = envelope.data {
          store.set(key, data);
        }
      }
    }

    (store, status)
  }
}

async fn run_isolated(loader: LoaderFn, params: RouteParams) -> Envelope {
  match tokio::spawn(async move { loader(params).await }).await {
    Ok(envelope) => envelope,
    Err(e) => Envelope::internal(format!("loader task failed: {e}")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::loader::{loader, LoaderSet};
  use serde_json::json;

  const TEMPLATE: &str = concat!(
    r#"<html><head><meta charset="utf-8"></head>"#,
    "<body><main><!--questline:outlet--></main></body></html>",
  );

  struct EchoRenderer;

  impl ViewRenderer for EchoRenderer {
    fn render(
      &self,
      route: &ResolvedRoute,
      store: &InitialDataStore,
    ) -> Result<ViewOutput, SsrError> {
      let key = route_key(route);
      let body = match store.get(&key) {
        Some(payload) => format!(r#"<section data-page="{key}">{payload}</section>"#),
        None => format!(r#"<section data-page="{key}" data-empty="">unavailable</section>"#),
      };
      Ok(ViewOutput { body, head: HeadMeta::new().with_title("Questline") })
    }
  }

  struct FailingRenderer;

  impl ViewRenderer for FailingRenderer {
    fn render(
      &self,
      _route: &ResolvedRoute,
      _store: &InitialDataStore,
    ) -> Result<ViewOutput, SsrError> {
      Err(SsrError::render("boom"))
    }
  }

  fn pipeline_with(set: LoaderSet, renderer: Arc<dyn ViewRenderer>) -> SsrPipeline {
    SsrPipeline::new(
      RouteTable::site(),
      LoaderRegistry::new().register("", set),
      renderer,
      TEMPLATE,
    )
  }

  #[tokio::test]
  async fn home_request_populates_one_entry() {
    let set = LoaderSet::new()
      .home(loader(|_| async { Envelope::success(json!({"headline": "Welcome"})) }));
    let pipeline = pipeline_with(set, Arc::new(EchoRenderer));

    let page = pipeline.render_request("/").await.expect("no fault").expect("handled");
    assert_eq!(page.status, 200);
    assert!(page.html.contains(r#"<section data-page="home:main">"#));
    assert!(page.html.contains(r#"<script id="__QUESTLINE_DATA__" type="application/json">"#));
    assert!(page.html.contains(r#""home:main""#));
    assert!(page.html.contains("<title>Questline</title>"));

    // Exactly one entry rode along.
    let blob = extract_data_blob(&page.html);
    let store = InitialDataStore::deserialize(&blob).expect("parse blob");
    assert_eq!(store.len(), 1);
  }

  #[tokio::test]
  async fn non_public_path_is_not_handled() {
    let pipeline = pipeline_with(LoaderSet::new(), Arc::new(EchoRenderer));
    assert!(pipeline.render_request("/dashboard/flags").await.expect("no fault").is_none());
  }

  #[tokio::test]
  async fn failed_loader_keeps_store_empty_and_mirrors_status() {
    let set = LoaderSet::new()
      .detail(loader(|_| async { Envelope::not_found("not_found") }));
    let pipeline = pipeline_with(set, Arc::new(EchoRenderer));

    let page = pipeline.render_request("/quests/q1").await.expect("no fault").expect("handled");
    assert_eq!(page.status, 404);
    // The page still renders, with its own empty state.
    assert!(page.html.contains(r#"data-empty="""#));
    let store = InitialDataStore::deserialize(&extract_data_blob(&page.html)).expect("blob");
    assert!(store.is_empty());
  }

  #[tokio::test]
  async fn panicking_loader_is_isolated() {
    let set = LoaderSet::new().list(loader(|_| async { panic!("loader exploded") }));
    let pipeline = pipeline_with(set, Arc::new(EchoRenderer));

    let page = pipeline.render_request("/quests?page=2").await.expect("no fault").expect("handled");
    assert_eq!(page.status, 500);
    assert!(page.html.contains("</html>"));
  }

  #[tokio::test]
  async fn renderer_fault_propagates() {
    let set =
      LoaderSet::new().home(loader(|_| async { Envelope::success(json!({})) }));
    let pipeline = pipeline_with(set, Arc::new(FailingRenderer));

    let err = pipeline.render_request("/").await.expect_err("fault");
    assert_eq!(err.code(), "RENDER_ERROR");
    assert_eq!(err.status(), 500);
  }

  #[tokio::test]
  async fn equivalent_queries_embed_identical_blobs() {
    let set = LoaderSet::new().list(loader(|params| async move {
      let RouteParams::List(query) = params else {
        return Envelope::bad_request("expected list params");
      };
      Envelope::success(json!({"page": query.page, "tags": query.tags}))
    }));
    let pipeline = pipeline_with(set, Arc::new(EchoRenderer));

    let a = pipeline
      .render_request("/quests?page=2&tag=b&tag=a")
      .await
      .expect("no fault")
      .expect("handled");
    let b = pipeline
      .render_request("/quests?page=2&tag=a&tag=b")
      .await
      .expect("no fault")
      .expect("handled");
    assert_eq!(extract_data_blob(&a.html), extract_data_blob(&b.html));
    assert!(extract_data_blob(&a.html).contains(r#""list:2:a,b::""#));
  }

  #[tokio::test]
  async fn load_route_runs_matching_loader() {
    let set = LoaderSet::new().home(loader(|_| async { Envelope::success(json!(1)) }));
    let pipeline = pipeline_with(set, Arc::new(EchoRenderer));
    let route = pipeline.resolve("/").expect("home");
    assert_eq!(pipeline.load_route(&route).await.data, Some(json!(1)));

    let detail = pipeline.resolve("/quests/q1").expect("detail");
    assert_eq!(pipeline.load_route(&detail).await.status, 404);
  }

  fn extract_data_blob(html: &str) -> String {
    let open = format!(r#"<script id="{DEFAULT_DATA_ID}" type="application/json">"#);
    let start = html.find(&open).expect("script open") + open.len();
    let end = html[start..].find("</script>").expect("script close") + start;
    html[start..end].to_string()
  }
}

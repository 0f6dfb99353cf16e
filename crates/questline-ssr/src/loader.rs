/* crates/questline-ssr/src/loader.rs */

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::envelope::Envelope;
use crate::route::{ResolvedRoute, RouteKind, RouteParams};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// One async loader bound to one backend endpoint. Loaders receive
/// already-validated, already-normalized parameters and report ordinary
/// HTTP failure through the envelope, never by panicking.
pub type LoaderFn = Arc<dyn Fn(RouteParams) -> BoxFuture<Envelope> + Send + Sync>;

/// Wrap an async fn into the boxed loader shape.
pub fn loader<F, Fut>(f: F) -> LoaderFn
where
  F: Fn(RouteParams) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Envelope> + Send + 'static,
{
  Arc::new(move |params| Box::pin(f(params)))
}

/// The loaders of one app: at most one per public route kind.
#[derive(Clone, Default)]
pub struct LoaderSet {
  home: Option<LoaderFn>,
  list: Option<LoaderFn>,
  detail: Option<LoaderFn>,
}

impl LoaderSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn home(mut self, f: LoaderFn) -> Self {
    self.home = Some(f);
    self
  }

  pub fn list(mut self, f: LoaderFn) -> Self {
    self.list = Some(f);
    self
  }

  pub fn detail(mut self, f: LoaderFn) -> Self {
    self.detail = Some(f);
    self
  }

  pub fn for_kind(&self, kind: RouteKind) -> Option<&LoaderFn> {
    match kind {
      RouteKind::Home => self.home.as_ref(),
      RouteKind::List => self.list.as_ref(),
      RouteKind::Detail => self.detail.as_ref(),
    }
  }
}

/// Loader sets keyed by app path (`""` for the root app, `"journal"` for
/// a mounted sub-app, nested mounts joined with `/`).
#[derive(Clone, Default)]
pub struct LoaderRegistry {
  sets: HashMap<String, LoaderSet>,
}

impl LoaderRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(mut self, app_path: impl Into<String>, set: LoaderSet) -> Self {
    self.sets.insert(app_path.into(), set);
    self
  }

  /// The loader matching a resolved route, if one is registered.
  pub fn loader_for(&self, route: &ResolvedRoute) -> Option<LoaderFn> {
    self.sets.get(&route.app_path())?.for_kind(route.kind()).cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn stub(marker: &'static str) -> LoaderFn {
    loader(move |_params| async move { Envelope::success(json!({ "from": marker })) })
  }

  #[tokio::test]
  async fn registry_dispatches_by_app_and_kind() {
    let registry = LoaderRegistry::new()
      .register("", LoaderSet::new().home(stub("root-home")).list(stub("root-list")))
      .register("journal", LoaderSet::new().list(stub("journal-list")));

    let route = ResolvedRoute { app: Vec::new(), params: RouteParams::Home };
    let env = registry.loader_for(&route).expect("root home")(route.params).await;
    assert_eq!(env.data, Some(json!({"from": "root-home"})));

    let route = ResolvedRoute {
      app: vec!["journal".to_string()],
      params: RouteParams::List(Default::default()),
    };
    let env = registry.loader_for(&route).expect("journal list")(route.params).await;
    assert_eq!(env.data, Some(json!({"from": "journal-list"})));
  }

  #[test]
  fn missing_loader_is_none() {
    let registry = LoaderRegistry::new().register("", LoaderSet::new().home(stub("h")));
    let route = ResolvedRoute {
      app: Vec::new(),
      params: RouteParams::Detail { collection: "quests".into(), id: "q1".into() },
    };
    assert!(registry.loader_for(&route).is_none());
  }
}

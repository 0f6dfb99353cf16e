/* crates/questline-ssr/src/key.rs */

//! Cache-key construction shared by the server render pipeline and the
//! client page hooks. Pure string work: no I/O, no clocks, no hashing,
//! so both sides can derive (and humans can read) the same key.

use crate::route::{ListQuery, ResolvedRoute, RouteParams};

/// Key for the home route of an app. Root app: `home:main`.
pub fn home_key(app: &[String]) -> String {
  format!("{}home:main", app_prefix(app))
}

/// Key for the list route. Multi-valued tags are deduplicated and sorted
/// lexicographically before joining; absent optional scalars serialize as
/// an empty segment so the key shape never varies with presence.
pub fn list_key(app: &[String], query: &ListQuery) -> String {
  let mut tags: Vec<&str> = query.tags.iter().map(String::as_str).collect();
  tags.sort_unstable();
  tags.dedup();

  format!(
    "{}list:{}:{}:{}:{}",
    app_prefix(app),
    query.page.max(1),
    tags.join(","),
    query.from.as_deref().unwrap_or(""),
    query.to.as_deref().unwrap_or(""),
  )
}

/// Key for a detail route.
pub fn detail_key(app: &[String], collection: &str, id: &str) -> String {
  format!("{}detail:{collection}:{id}", app_prefix(app))
}

/// Key for any resolved route. This is the one call site shape used on
/// both sides of the document boundary.
pub fn route_key(route: &ResolvedRoute) -> String {
  match &route.params {
    RouteParams::Home => home_key(&route.app),
    RouteParams::List(query) => list_key(&route.app, query),
    RouteParams::Detail { collection, id } => detail_key(&route.app, collection, id),
  }
}

/// Sub-app keys carry their mount chain (`journal/list:...`) so they can
/// never collide with root-app keys.
fn app_prefix(app: &[String]) -> String {
  if app.is_empty() { String::new() } else { format!("{}/", app.join("/")) }
}

/* crates/questline-ssr/src/route.rs */

use std::collections::BTreeMap;

use regex::Regex;

/// The closed set of server-renderable page shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
  Home,
  List,
  Detail,
}

/// Normalized query parameters for the list route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  pub page: u32,
  pub tags: Vec<String>,
  pub from: Option<String>,
  pub to: Option<String>,
}

impl Default for ListQuery {
  fn default() -> Self {
    Self { page: 1, tags: Vec::new(), from: None, to: None }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteParams {
  Home,
  List(ListQuery),
  Detail { collection: String, id: String },
}

impl RouteParams {
  pub fn kind(&self) -> RouteKind {
    match self {
      Self::Home => RouteKind::Home,
      Self::List(_) => RouteKind::List,
      Self::Detail { .. } => RouteKind::Detail,
    }
  }
}

/// A matched public route: the sub-app mount chain (empty for the root
/// app) plus the normalized parameters parsed out of path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
  pub app: Vec<String>,
  pub params: RouteParams,
}

impl ResolvedRoute {
  pub fn kind(&self) -> RouteKind {
    self.params.kind()
  }

  /// Registry key for the owning app: mount segments joined with `/`,
  /// empty string for the root app.
  pub fn app_path(&self) -> String {
    self.app.join("/")
  }
}

/// Route table for one app: an exact root, one list path, a closed set of
/// detail collections, and optional sub-app tables mounted under a prefix
/// segment. Matching is pure string/regex inspection.
pub struct RouteTable {
  list_segment: String,
  collections: Vec<String>,
  sub_apps: BTreeMap<String, RouteTable>,
  id_pattern: Regex,
}

impl RouteTable {
  pub fn new(list_segment: impl Into<String>, collections: Vec<String>) -> Self {
    Self {
      list_segment: list_segment.into(),
      collections,
      sub_apps: BTreeMap::new(),
      id_pattern: Regex::new("^[A-Za-z0-9_-]+$").expect("identifier pattern"),
    }
  }

  /// Mount a child app's table under `prefix`. Paths below the prefix are
  /// resolved against the child table recursively.
  pub fn mount(mut self, prefix: impl Into<String>, table: RouteTable) -> Self {
    self.sub_apps.insert(prefix.into(), table);
    self
  }

  /// The canonical Questline public-site table: quests at the root, the
  /// journal mounted as a sub-app.
  pub fn site() -> Self {
    Self::new("quests", vec!["quests".into()])
      .mount("journal", Self::new("posts", vec!["posts".into()]))
  }

  pub fn is_public_path(&self, pathname: &str) -> bool {
    self.resolve(pathname, None).is_some()
  }

  /// Resolve a full request target (`/quests?page=2&tag=lore`).
  pub fn resolve_target(&self, target: &str) -> Option<ResolvedRoute> {
    match target.split_once('?') {
      Some((path, query)) => self.resolve(path, Some(query)),
      None => self.resolve(target, None),
    }
  }

  /// Resolve a pathname plus optional raw query string. `None` means the
  /// path is not server-renderable and the caller must fall through to
  /// the client-only path.
  pub fn resolve(&self, pathname: &str, query: Option<&str>) -> Option<ResolvedRoute> {
    let path = normalize_pathname(pathname);
    if path == "/" {
      return Some(ResolvedRoute { app: Vec::new(), params: RouteParams::Home });
    }

    let segments: Vec<&str> = path[1..].split('/').collect();

    // Sub-app prefix wins over same-named collections; the remainder is
    // resolved against the child table with the prefix recorded.
    if let Some(child) = self.sub_apps.get(segments[0]) {
      let rest = if segments.len() == 1 {
        "/".to_string()
      } else {
        format!("/{}", segments[1..].join("/"))
      };
      let mut resolved = child.resolve(&rest, query)?;
      resolved.app.insert(0, segments[0].to_string());
      return Some(resolved);
    }

    match segments.as_slice() {
      [seg] if *seg == self.list_segment => Some(ResolvedRoute {
        app: Vec::new(),
        params: RouteParams::List(parse_list_query(query)),
      }),
      [collection, id]
        if self.collections.iter().any(|c| c == collection) && self.id_pattern.is_match(id) =>
      {
        Some(ResolvedRoute {
          app: Vec::new(),
          params: RouteParams::Detail {
            collection: (*collection).to_string(),
            id: (*id).to_string(),
          },
        })
      }
      _ => None,
    }
  }
}

/// Strip a single trailing slash and default an empty pathname to `/`.
pub fn normalize_pathname(pathname: &str) -> &str {
  let path = if pathname.is_empty() { "/" } else { pathname };
  if path.len() > 1 && path.ends_with('/') { &path[..path.len() - 1] } else { path }
}

/// Parse and normalize the list-route query grammar: `page` (positive
/// integer, default 1), repeated `tag` (trimmed, empties dropped,
/// duplicates collapsed, sorted), `from`/`to` (trimmed to absent).
pub fn parse_list_query(query: Option<&str>) -> ListQuery {
  let mut out = ListQuery::default();
  let Some(raw) = query else { return out };

  for pair in raw.split('&') {
    if pair.is_empty() {
      continue;
    }
    let (key, value) = match pair.split_once('=') {
      Some((k, v)) => (percent_decode(k), percent_decode(v)),
      None => (percent_decode(pair), String::new()),
    };
    match key.as_str() {
      "page" => {
        if let Ok(n) = value.trim().parse::<u32>() {
          out.page = n.max(1);
        }
      }
      "tag" => {
        let tag = value.trim();
        if !tag.is_empty() {
          out.tags.push(tag.to_string());
        }
      }
      "from" => out.from = non_blank(&value),
      "to" => out.to = non_blank(&value),
      _ => {}
    }
  }

  out.tags.sort();
  out.tags.dedup();
  out
}

fn non_blank(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Minimal application/x-www-form-urlencoded decoding: `+` to space,
/// `%XX` to the byte it names, anything malformed passed through.
fn percent_decode(input: &str) -> String {
  let bytes = input.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    match bytes[i] {
      b'+' => {
        out.push(b' ');
        i += 1;
      }
      b'%' => match hex_pair(bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) {
        Some(byte) => {
          out.push(byte);
          i += 3;
        }
        None => {
          out.push(b'%');
          i += 1;
        }
      },
      byte => {
        out.push(byte);
        i += 1;
      }
    }
  }
  String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: Option<u8>, lo: Option<u8>) -> Option<u8> {
  let hi = (hi? as char).to_digit(16)?;
  let lo = (lo? as char).to_digit(16)?;
  Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> RouteTable {
    RouteTable::site()
  }

  #[test]
  fn root_resolves_home() {
    let route = table().resolve("/", None).expect("home");
    assert_eq!(route.params, RouteParams::Home);
    assert!(route.app.is_empty());
  }

  #[test]
  fn empty_pathname_defaults_to_root() {
    assert_eq!(table().resolve("", None).expect("home").params, RouteParams::Home);
  }

  #[test]
  fn list_with_and_without_trailing_slash() {
    let a = table().resolve("/quests", None).expect("list");
    let b = table().resolve("/quests/", None).expect("list");
    assert_eq!(a, b);
    assert_eq!(a.kind(), RouteKind::List);
  }

  #[test]
  fn list_query_normalization() {
    let route = table()
      .resolve("/quests", Some("page=2&tag=b&tag=a&tag=%20&tag=a&from=&to=2026-01-01"))
      .expect("list");
    let RouteParams::List(query) = route.params else { panic!("expected list") };
    assert_eq!(query.page, 2);
    assert_eq!(query.tags, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(query.from, None);
    assert_eq!(query.to.as_deref(), Some("2026-01-01"));
  }

  #[test]
  fn page_below_one_clamps() {
    let query = parse_list_query(Some("page=0"));
    assert_eq!(query.page, 1);
  }

  #[test]
  fn malformed_page_defaults() {
    let query = parse_list_query(Some("page=lots"));
    assert_eq!(query.page, 1);
  }

  #[test]
  fn tag_order_is_insensitive() {
    let a = parse_list_query(Some("tag=b&tag=a"));
    let b = parse_list_query(Some("tag=a&tag=b"));
    assert_eq!(a, b);
  }

  #[test]
  fn detail_resolves() {
    let route = table().resolve("/quests/first-light_2", None).expect("detail");
    assert_eq!(
      route.params,
      RouteParams::Detail { collection: "quests".into(), id: "first-light_2".into() }
    );
  }

  #[test]
  fn detail_rejects_bad_identifier() {
    assert!(table().resolve("/quests/first%20light", None).is_none());
    assert!(table().resolve("/quests/a/b", None).is_none());
  }

  #[test]
  fn unknown_paths_yield_none() {
    assert!(table().resolve("/admin", None).is_none());
    assert!(table().resolve("/quests/x/y/z", None).is_none());
    assert!(table().resolve("/about", None).is_none());
  }

  #[test]
  fn sub_app_home_and_list() {
    let home = table().resolve("/journal", None).expect("journal home");
    assert_eq!(home.app, vec!["journal".to_string()]);
    assert_eq!(home.params, RouteParams::Home);

    let list = table().resolve("/journal/posts", Some("page=3")).expect("journal list");
    assert_eq!(list.app_path(), "journal");
    let RouteParams::List(query) = list.params else { panic!("expected list") };
    assert_eq!(query.page, 3);
  }

  #[test]
  fn sub_app_detail() {
    let route = table().resolve("/journal/posts/winter-update", None).expect("journal detail");
    assert_eq!(route.app, vec!["journal".to_string()]);
    assert_eq!(
      route.params,
      RouteParams::Detail { collection: "posts".into(), id: "winter-update".into() }
    );
  }

  #[test]
  fn resolve_target_splits_query() {
    let route = table().resolve_target("/quests?page=2").expect("list");
    let RouteParams::List(query) = route.params else { panic!("expected list") };
    assert_eq!(query.page, 2);
  }

  #[test]
  fn is_public_path_matches_enumeration() {
    let table = table();
    assert!(table.is_public_path("/"));
    assert!(table.is_public_path("/quests"));
    assert!(table.is_public_path("/quests/q1"));
    assert!(table.is_public_path("/journal/posts"));
    assert!(!table.is_public_path("/dashboard/quests"));
  }

  #[test]
  fn percent_decoding() {
    assert_eq!(percent_decode("a%2Bb+c"), "a+b c");
    assert_eq!(percent_decode("100%"), "100%");
    assert_eq!(percent_decode("%zz"), "%zz");
  }
}

/* crates/questline-serve/src/site.rs */

use questline_ssr::{
  escape_html_text, route_key, HeadMeta, InitialDataStore, ListQuery, ResolvedRoute, RouteParams,
  SsrError, ViewOutput, ViewRenderer,
};
use serde_json::Value;

/// Built-in page shell. The body outlet is where the rendered view
/// lands; the client bundle takes over after hydration.
pub const DEFAULT_TEMPLATE: &str = concat!(
  "<!doctype html>\n",
  r#"<html><head><meta charset="utf-8">"#,
  r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
  r#"<link rel="stylesheet" href="/assets/site.css">"#,
  "</head><body><div id=\"app\"><!--questline:outlet--></div>",
  r#"<script type="module" src="/assets/site.js"></script>"#,
  "</body></html>",
);

/// The public site's view layer: renders each page kind from its stored
/// payload, or the page's own unavailable state when the loader failed.
pub struct SiteRenderer;

impl ViewRenderer for SiteRenderer {
  fn render(
    &self,
    route: &ResolvedRoute,
    store: &InitialDataStore,
  ) -> Result<ViewOutput, SsrError> {
    let payload = store.get(&route_key(route));
    let (body, head) = match &route.params {
      RouteParams::Home => home_view(payload),
      RouteParams::List(query) => list_view(query, payload),
      RouteParams::Detail { collection, id } => detail_view(collection, id, payload),
    };
    Ok(ViewOutput { body, head })
  }
}

fn home_view(payload: Option<&Value>) -> (String, HeadMeta) {
  let head = HeadMeta::new()
    .with_title("Questline")
    .with_meta("description", "Community quests and stories");

  let Some(data) = payload else {
    return (unavailable("home"), head);
  };

  let mut body = format!("<section class=\"home\"><h1>{}</h1>", text(data, "headline"));
  let intro = text(data, "intro");
  if !intro.is_empty() {
    body.push_str(&format!("<p>{intro}</p>"));
  }
  if let Some(items) = data.get("featured").and_then(Value::as_array) {
    body.push_str("<ul class=\"featured\">");
    for item in items {
      body.push_str(&format!("<li>{}</li>", text(item, "title")));
    }
    body.push_str("</ul>");
  }
  body.push_str("</section>");
  (body, head)
}

fn list_view(query: &ListQuery, payload: Option<&Value>) -> (String, HeadMeta) {
  let head = HeadMeta::new()
    .with_title(format!("Quests — page {}", query.page))
    .with_meta("description", "Browse all quests");

  let Some(data) = payload else {
    return (unavailable("list"), head);
  };

  let mut body = format!("<section class=\"list\" data-page-number=\"{}\">", query.page);
  if let Some(items) = data.get("items").and_then(Value::as_array) {
    body.push_str("<ol class=\"quests\">");
    for item in items {
      body.push_str(&format!(
        "<li><h2>{}</h2><p>{}</p></li>",
        text(item, "title"),
        text(item, "summary"),
      ));
    }
    body.push_str("</ol>");
  }
  body.push_str("</section>");
  (body, head)
}

fn detail_view(collection: &str, id: &str, payload: Option<&Value>) -> (String, HeadMeta) {
  let Some(data) = payload else {
    let head = HeadMeta::new().with_title("Not found — Questline");
    return (unavailable("detail"), head);
  };

  let title = text(data, "title");
  let summary = text(data, "summary");
  let head = HeadMeta::new()
    .with_title(format!("{title} — Questline"))
    .with_meta("description", &summary)
    .with_json_ld(serde_json::json!({
      "@context": "https://schema.org",
      "@type": "Article",
      "headline": data.get("title").and_then(Value::as_str).unwrap_or(""),
      "identifier": id,
    }));

  let mut body = format!(
    "<article class=\"detail\" data-collection=\"{}\"><h1>{title}</h1>",
    escape_html_text(collection),
  );
  if !summary.is_empty() {
    body.push_str(&format!("<p class=\"summary\">{summary}</p>"));
  }
  if let Some(content) = data.get("body").and_then(Value::as_str) {
    // Quest bodies arrive as sanitized HTML from the backend.
    body.push_str(&format!("<div class=\"body\">{content}</div>"));
  }
  body.push_str("</article>");
  (body, head)
}

fn unavailable(kind: &str) -> String {
  format!(
    "<section class=\"{kind} unavailable\"><p>This page could not be loaded right now.</p></section>"
  )
}

/// Escaped text field out of a payload object; empty when absent.
fn text(data: &Value, field: &str) -> String {
  escape_html_text(data.get(field).and_then(Value::as_str).unwrap_or(""))
}

/* crates/questline-ssr/src/html.rs */

use serde_json::Value;

use crate::escape::{escape_embedded_json, escape_html_text};

/// Marker in the page template where the rendered view body lands.
pub const BODY_OUTLET: &str = "<!--questline:outlet-->";

/// Document metadata collected during a render pass, kept separate from
/// the body markup: title, named meta tags, JSON-LD structured data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadMeta {
  pub title: Option<String>,
  pub meta: Vec<(String, String)>,
  pub json_ld: Vec<Value>,
}

impl HeadMeta {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn with_meta(mut self, name: &str, content: &str) -> Self {
    self.meta.push((name.to_string(), content.to_string()));
    self
  }

  pub fn with_json_ld(mut self, block: Value) -> Self {
    self.json_ld.push(block);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.meta.is_empty() && self.json_ld.is_empty()
  }

  /// Render to head HTML. All text content comes from loader payloads
  /// (user-authored elsewhere) and is escaped accordingly.
  pub fn render(&self) -> String {
    let mut html = String::new();
    if let Some(ref title) = self.title {
      html.push_str(&format!("<title>{}</title>", escape_html_text(title)));
    }
    for (name, content) in &self.meta {
      html.push_str(&format!(
        r#"<meta name="{}" content="{}">"#,
        escape_html_text(name),
        escape_html_text(content),
      ));
    }
    for block in &self.json_ld {
      let json = serde_json::to_string(block).unwrap_or_default();
      html.push_str(&format!(
        r#"<script type="application/ld+json">{}</script>"#,
        escape_embedded_json(&json),
      ));
    }
    html
  }
}

/// Replace the body outlet marker with rendered view markup. Falls back
/// to inserting before `</body>` for templates without the marker.
pub fn inject_body(template: &str, body: &str) -> String {
  if template.contains(BODY_OUTLET) {
    template.replacen(BODY_OUTLET, body, 1)
  } else if let Some(pos) = template.rfind("</body>") {
    let mut result = String::with_capacity(template.len() + body.len());
    result.push_str(&template[..pos]);
    result.push_str(body);
    result.push_str(&template[pos..]);
    result
  } else {
    format!("{template}{body}")
  }
}

/// Inject collected head metadata after `<meta charset="utf-8">`, else
/// before `</head>`.
pub fn inject_head(html: &str, head: &HeadMeta) -> String {
  if head.is_empty() {
    return html.to_string();
  }
  let meta_html = head.render();

  let charset = r#"<meta charset="utf-8">"#;
  let insert_at = html
    .find(charset)
    .map(|pos| pos + charset.len())
    .or_else(|| html.find("</head>"));

  match insert_at {
    Some(pos) => {
      let mut result = String::with_capacity(html.len() + meta_html.len());
      result.push_str(&html[..pos]);
      result.push_str(&meta_html);
      result.push_str(&html[pos..]);
      result
    }
    None => html.to_string(),
  }
}

/// Set `<html lang="...">` on the document element.
pub fn inject_html_lang(html: &str, lang: &str) -> String {
  html.replacen("<html", &format!("<html lang=\"{lang}\""), 1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const TEMPLATE: &str = concat!(
    r#"<html><head><meta charset="utf-8"></head>"#,
    "<body><main><!--questline:outlet--></main></body></html>",
  );

  #[test]
  fn body_replaces_outlet() {
    let html = inject_body(TEMPLATE, "<section>quest</section>");
    assert!(html.contains("<main><section>quest</section></main>"));
    assert!(!html.contains(BODY_OUTLET));
  }

  #[test]
  fn body_falls_back_before_body_close() {
    let html = inject_body("<body></body>", "<p>x</p>");
    assert_eq!(html, "<body><p>x</p></body>");
  }

  #[test]
  fn head_injected_after_charset() {
    let head = HeadMeta::new().with_title("Quests").with_meta("description", "All quests");
    let html = inject_head(TEMPLATE, &head);
    let charset_pos = html.find("charset").expect("charset");
    let title_pos = html.find("<title>Quests</title>").expect("title");
    let head_close = html.find("</head>").expect("head close");
    assert!(charset_pos < title_pos && title_pos < head_close);
    assert!(html.contains(r#"<meta name="description" content="All quests">"#));
  }

  #[test]
  fn head_title_is_escaped() {
    let head = HeadMeta::new().with_title(r#"<script>"x"</script>"#);
    assert!(!inject_head(TEMPLATE, &head).contains("<script>\"x\""));
  }

  #[test]
  fn json_ld_rendered_and_safe() {
    let head = HeadMeta::new().with_json_ld(json!({
      "@type": "Article",
      "headline": "</script>oops",
    }));
    let html = inject_head(TEMPLATE, &head);
    assert!(html.contains(r#"<script type="application/ld+json">"#));
    assert!(!html.contains("</script>oops"));
  }

  #[test]
  fn empty_head_is_noop() {
    assert_eq!(inject_head(TEMPLATE, &HeadMeta::new()), TEMPLATE);
  }

  #[test]
  fn lang_attribute() {
    assert!(inject_html_lang(TEMPLATE, "en").starts_with(r#"<html lang="en"><head>"#));
  }
}

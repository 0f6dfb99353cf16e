/* crates/questline-ssr/src/escape.rs */

/// Escape serialized JSON for embedding inside an inline HTML element.
///
/// Walks the JSON text tracking whether the current position is inside a
/// JSON string (handling `\"` and `\\` correctly). Inside strings,
/// `<` becomes `\u003c` so payload content can never produce a
/// `</script>`/`</style>` terminator or comment opener, and non-ASCII
/// codepoints are replaced with `\uXXXX` (surrogate pairs outside the
/// BMP). The output is still valid JSON describing the same value.
pub fn escape_embedded_json(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut chars = json.chars().peekable();

  while let Some(ch) = chars.next() {
    if in_string {
      if ch == '\\' {
        // Escaped character inside string -- push both and skip next
        out.push(ch);
        if let Some(next) = chars.next() {
          out.push(next);
        }
        continue;
      }
      if ch == '"' {
        in_string = false;
        out.push(ch);
        continue;
      }
      if ch == '<' {
        out.push_str("\\u003c");
        continue;
      }
      if ch as u32 > 0x7F {
        let code = ch as u32;
        if code > 0xFFFF {
          let adjusted = code - 0x1_0000;
          let hi = (adjusted >> 10) + 0xD800;
          let lo = (adjusted & 0x3FF) + 0xDC00;
          out.push_str(&format!("\\u{hi:04x}\\u{lo:04x}"));
        } else {
          out.push_str(&format!("\\u{code:04x}"));
        }
        continue;
      }
      out.push(ch);
    } else {
      if ch == '"' {
        in_string = true;
      }
      out.push(ch);
    }
  }
  out
}

/// Escape text for interpolation into HTML element content or a
/// double-quoted attribute value.
pub fn escape_html_text(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(ch),
    }
  }
  out
}

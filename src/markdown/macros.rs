//! Confluence structured macro rewriting.
//!
//! Macros are located with a tag scanner that balances nested
//! `<ac:structured-macro>` elements, so a macro's body is rewritten before the
//! macro itself. Macros without a handler are reassembled unchanged and left
//! to the converter, which keeps their body content.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::utils::escape_attribute;

/// Nesting depth past which macros are left untouched.
const MAX_MACRO_DEPTH: usize = 64;

static MACRO_TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)<(/)?ac:structured-macro\b([^>]*?)(/)?>").unwrap());
static MACRO_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\bac:name\s*=\s*"([^"]*)""#).unwrap());
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?is)<ac:parameter\b[^>]*\bac:name\s*=\s*"([^"]*)"[^>]*>(.*?)</ac:parameter\s*>"#).unwrap()
});
static BODY_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ac:(?:plain|rich)-text-body\b").unwrap());
static PLAIN_TEXT_BODY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<ac:plain-text-body\b[^>]*>(.*?)</ac:plain-text-body\s*>").unwrap());
static RICH_TEXT_BODY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<ac:rich-text-body\b[^>]*>(.*)</ac:rich-text-body\s*>").unwrap());

/// A structured macro with its body already rewritten.
struct StructuredMacro<'a> {
  name: &'a str,
  body: &'a str,
}

impl StructuredMacro<'_> {
  /// Looks up a parameter of this macro. Only the markup ahead of the first
  /// body is searched, so parameters of nested macros are not picked up.
  fn parameter(&self, name: &str) -> Option<&str> {
    let head_end = BODY_START.find(self.body).map_or(self.body.len(), |body| body.start());
    PARAMETER
      .captures_iter(&self.body[..head_end])
      .find(|caps| caps[1].eq_ignore_ascii_case(name))
      .and_then(|caps| caps.get(2))
      .map(|value| value.as_str().trim())
      .filter(|value| !value.is_empty())
  }
}

/// Signature used by all macro handlers. `None` leaves the macro as is.
type MacroHandler = fn(&StructuredMacro<'_>) -> Option<String>;

struct Handler {
  names: &'static [&'static str],
  func: MacroHandler,
}

const HANDLERS: &[Handler] = &[
  Handler {
    names: &["code"],
    func: render_code,
  },
  Handler {
    names: &["info", "note", "tip", "warning"],
    func: render_alert,
  },
];

/// Rewrites every handled structured macro in `markup` into plain HTML.
pub(super) fn rewrite_macros(markup: &str) -> String {
  rewrite_at_depth(markup, 0)
}

fn rewrite_at_depth(markup: &str, depth: usize) -> String {
  if depth > MAX_MACRO_DEPTH {
    warn!("Structured macros nested deeper than {MAX_MACRO_DEPTH} levels are left unconverted");
    return markup.to_string();
  }

  let mut result = String::with_capacity(markup.len());
  let mut cursor = 0;

  while let Some(open) = MACRO_TAG.captures_at(markup, cursor) {
    let Some(open_tag) = open.get(0) else {
      break;
    };

    // A stray closing tag has nothing to pair with.
    if open.get(1).is_some() {
      result.push_str(&markup[cursor..open_tag.end()]);
      cursor = open_tag.end();
      continue;
    }

    result.push_str(&markup[cursor..open_tag.start()]);
    let attributes = open.get(2).map_or("", |attributes| attributes.as_str());

    let (body, element_end) = if open.get(3).is_some() {
      ("", open_tag.end())
    } else {
      match find_closing_tag(markup, open_tag.end()) {
        Some((close_start, close_end)) => (&markup[open_tag.end()..close_start], close_end),
        None => {
          debug!("Unclosed structured macro, leaving the remaining markup as is");
          result.push_str(&markup[open_tag.start()..]);
          return result;
        }
      }
    };

    let body = rewrite_at_depth(body, depth + 1);
    result.push_str(&convert_macro(open_tag.as_str(), attributes, &body, open.get(3).is_some()));
    cursor = element_end;
  }

  result.push_str(&markup[cursor..]);
  result
}

/// Finds the closing tag balancing an opening tag that ends at `from`.
/// Returns the closing tag's start and end offsets.
fn find_closing_tag(markup: &str, from: usize) -> Option<(usize, usize)> {
  let mut depth = 1usize;

  for caps in MACRO_TAG.captures_iter(&markup[from..]) {
    let tag = caps.get(0)?;
    if caps.get(1).is_some() {
      depth -= 1;
      if depth == 0 {
        return Some((from + tag.start(), from + tag.end()));
      }
    } else if caps.get(3).is_none() {
      depth += 1;
    }
  }

  None
}

fn convert_macro(open_tag: &str, attributes: &str, body: &str, self_closing: bool) -> String {
  let name = MACRO_NAME
    .captures(attributes)
    .and_then(|caps| caps.get(1))
    .map_or("", |name| name.as_str());
  let structured_macro = StructuredMacro { name, body };

  for handler in HANDLERS {
    if handler.names.iter().any(|candidate| candidate.eq_ignore_ascii_case(name))
      && let Some(html) = (handler.func)(&structured_macro)
    {
      return html;
    }
  }

  debug!("Leaving structured macro '{name}' for the converter");
  if self_closing {
    open_tag.to_string()
  } else {
    format!("{open_tag}{body}</ac:structured-macro>")
  }
}

/// Code macros become `<pre><code>`, with a `language-*` class when the
/// macro names a language. The body is already escaped text.
fn render_code(structured_macro: &StructuredMacro<'_>) -> Option<String> {
  let body = PLAIN_TEXT_BODY
    .captures(structured_macro.body)
    .and_then(|caps| caps.get(1))
    .map_or("", |body| body.as_str());

  match structured_macro.parameter("language") {
    Some(language) => {
      debug!("Code block language: {language}");
      Some(format!(
        r#"<pre><code class="language-{}">{body}</code></pre>"#,
        escape_attribute(language)
      ))
    }
    None => Some(format!("<pre><code>{body}</code></pre>")),
  }
}

/// Alert macros become `<blockquote data-alert>`; macros without a rich text
/// body are left alone.
fn render_alert(structured_macro: &StructuredMacro<'_>) -> Option<String> {
  let alert_type = match structured_macro.name.to_ascii_lowercase().as_str() {
    "info" | "note" => "NOTE",
    "tip" => "TIP",
    "warning" => "WARNING",
    _ => return None,
  };

  let body = RICH_TEXT_BODY.captures(structured_macro.body)?.get(1)?.as_str();
  Some(format!(r#"<blockquote data-alert="{alert_type}">{body}</blockquote>"#))
}

//! Rewrites Confluence-only markup into plain HTML before conversion.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::images::rewrite_images;
use super::links::rewrite_links;
use super::macros::rewrite_macros;
use super::utils::escape_text;

static COLGROUP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<colgroup\b[^>]*>.*?</colgroup\s*>").unwrap());
static COL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?col\b[^>]*>").unwrap());
static HIGHLIGHT_ATTRIBUTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)\s+data-highlight-colour\s*=\s*"[^"]*""#).unwrap());
static LOCAL_ID_ATTRIBUTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)\s+(?:ac:)?local-id\s*=\s*"[^"]*""#).unwrap());
static COMMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<ac:inline-comment-marker\b[^>]*>(.*?)</ac:inline-comment-marker\s*>").unwrap()
});
static EMPTY_COMMENT_MARKER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)<ac:inline-comment-marker\b[^>]*/>").unwrap());
static CDATA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Runs every rewrite in order and returns HTML ready for the converter.
pub(super) fn preprocess(storage: &str, attachment_paths: Option<&HashMap<String, String>>) -> String {
  let without_colgroups = COLGROUP.replace_all(storage, "");
  let without_cols = COL.replace_all(&without_colgroups, "");
  let without_highlights = HIGHLIGHT_ATTRIBUTE.replace_all(&without_cols, "");
  let without_ids = LOCAL_ID_ATTRIBUTE.replace_all(&without_highlights, "");
  let unmarked = unwrap_comment_markers(&without_ids);
  let unwrapped = unwrap_cdata(&unmarked);
  let with_links = rewrite_links(&unwrapped);
  let with_images = rewrite_images(&with_links, attachment_paths);
  rewrite_macros(&with_images)
}

/// Replaces inline comment markers with their content. Markers can nest when
/// comments overlap, so the rewrite repeats until none are left.
fn unwrap_comment_markers(markup: &str) -> String {
  let mut result = EMPTY_COMMENT_MARKER.replace_all(markup, "").into_owned();
  while COMMENT_MARKER.is_match(&result) {
    result = COMMENT_MARKER.replace_all(&result, "${1}").into_owned();
  }
  result
}

/// Replaces CDATA sections with their content, escaped so the HTML parser
/// reads it back as literal text.
fn unwrap_cdata(markup: &str) -> String {
  CDATA
    .replace_all(markup, |caps: &Captures| escape_text(&caps[1]))
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_removes_column_definitions() {
    let input = r#"<table><colgroup><col style="width: 50px;" /><col /></colgroup><tbody><tr><td>x</td></tr></tbody></table>"#;
    assert_eq!(
      preprocess(input, None),
      "<table><tbody><tr><td>x</td></tr></tbody></table>"
    );
  }

  #[test]
  fn test_strips_noise_attributes() {
    let input = r##"<p local-id="a1"><span data-highlight-colour="#fff">x</span></p><table ac:local-id="b2" data-layout="wide"></table>"##;
    assert_eq!(
      preprocess(input, None),
      r#"<p><span>x</span></p><table data-layout="wide"></table>"#
    );
  }

  #[test]
  fn test_unwraps_nested_comment_markers() {
    let input = r#"<p><ac:inline-comment-marker ac:ref="1">a <ac:inline-comment-marker ac:ref="2">b</ac:inline-comment-marker></ac:inline-comment-marker> c<ac:inline-comment-marker ac:ref="3" /></p>"#;
    assert_eq!(preprocess(input, None), "<p>a b c</p>");
  }

  #[test]
  fn test_cdata_is_escaped() {
    assert_eq!(unwrap_cdata("<x><![CDATA[a < b && c]]></x>"), "<x>a &lt; b &amp;&amp; c</x>");
  }
}

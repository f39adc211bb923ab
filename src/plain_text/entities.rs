//! HTML entity decoding for the plain-text pipeline.
//!
//! Only the handful of entities that Confluence emits in practice are
//! decoded, in a fixed order. Each pass runs over the output of the previous
//! one, so `&amp;lt;` decodes twice (to `<`) while `&amp;nbsp;` stops at
//! `&nbsp;` because the `&nbsp;` pass has already run.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static DECIMAL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#(\d+);").unwrap());

/// Named and fixed numeric references, in decoding order.
const ENTITY_PASSES: &[(&str, &str)] = &[
  ("&nbsp;", " "),
  ("&amp;", "&"),
  ("&lt;", "<"),
  ("&gt;", ">"),
  ("&quot;", "\""),
  ("&#39;", "'"),
  ("&#x27;", "'"),
];

/// Decodes HTML entities in the fixed pipeline order.
///
/// Named entities go first, then decimal references such as `&#8212;`.
/// References that do not name a Unicode scalar value are left as-is.
pub fn decode_html_entities(text: &str) -> String {
  let mut decoded = text.to_string();
  for (entity, replacement) in ENTITY_PASSES {
    if decoded.contains(entity) {
      decoded = decoded.replace(entity, replacement);
    }
  }

  decode_decimal_references(&decoded)
}

fn decode_decimal_references(text: &str) -> String {
  DECIMAL_REFERENCE
    .replace_all(text, |caps: &Captures| {
      caps[1]
        .parse::<u32>()
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

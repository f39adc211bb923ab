//! Confluence storage format to plain text.
//!
//! The conversion is a fixed sequence of textual rewrites over the raw
//! markup; no DOM is built. The order of the steps matters: placeholders must
//! be substituted before tags are stripped, separators must be inserted
//! before tags disappear, and entities are decoded last so that decoded `<`
//! characters are never mistaken for markup.
//!
//! # Example
//!
//! ```
//! use atlassian_textify::plain_text::storage_format_to_plain_text;
//!
//! let storage = "<h1>Title</h1><p>Hello&nbsp;<strong>world</strong></p>";
//! assert_eq!(storage_format_to_plain_text(Some(storage)), "Title\nHello world");
//! ```

use std::sync::LazyLock;
use std::time::Instant;

use regex::{Captures, Regex};
use tracing::{debug, trace};

mod blocks;
mod entities;

pub use blocks::{insert_block_separators, normalize_whitespace};
pub use entities::decode_html_entities;

/// Placeholder substituted for user mentions.
pub const USER_PLACEHOLDER: &str = "[user]";

static CDATA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());
static TITLE_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?is)<ac:parameter\b[^>]*\bac:name\s*=\s*"title"[^>]*>(.*?)</ac:parameter>"#).unwrap()
});
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<ac:image\b[^>]*>(.*?)</ac:image>").unwrap());
static ATTACHMENT_FILENAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)<ri:attachment\b[^>]*\bri:filename\s*=\s*"([^"]*)""#).unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<ac:link\b[^>]*>(.*?)</ac:link>").unwrap());
static USER_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ri:user\b").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Converts Confluence storage format to normalized plain text.
///
/// `None` and the empty string produce an empty string. The output has one
/// logical line per block element, no blank lines, and single spaces between
/// words.
pub fn storage_format_to_plain_text(input: Option<&str>) -> String {
  let Some(storage) = input.filter(|storage| !storage.is_empty()) else {
    return String::new();
  };

  let start = Instant::now();

  let unwrapped = CDATA.replace_all(storage, "${1}");
  let titled = TITLE_PARAMETER.replace_all(&unwrapped, "${1}");
  let with_images = replace_images(&titled);
  let with_users = replace_user_links(&with_images);
  let separated = insert_block_separators(&with_users);
  let stripped = TAG.replace_all(&separated, "");

  trace!(
    "Stripped storage format (first 500 chars):\n{}",
    stripped.chars().take(500).collect::<String>()
  );

  let decoded = decode_html_entities(&stripped);
  let text = normalize_whitespace(&decoded);

  debug!(
    "Converted storage format to plain text in {duration:?} ({input} chars in, {output} chars out)",
    duration = start.elapsed(),
    input = storage.len(),
    output = text.len()
  );

  text
}

/// Replaces attachment images with `[image: <filename>]`.
///
/// Images without an attachment reference (external URLs) are left for the
/// tag-stripping step.
fn replace_images(markup: &str) -> String {
  IMAGE
    .replace_all(markup, |caps: &Captures| match ATTACHMENT_FILENAME.captures(&caps[1]) {
      Some(attachment) => format!("[image: {}]", &attachment[1]),
      None => caps[0].to_string(),
    })
    .into_owned()
}

/// Replaces links to users with [`USER_PLACEHOLDER`]; page and attachment
/// links keep their body text.
fn replace_user_links(markup: &str) -> String {
  LINK
    .replace_all(markup, |caps: &Captures| {
      if USER_REFERENCE.is_match(&caps[1]) {
        USER_PLACEHOLDER.to_string()
      } else {
        caps[0].to_string()
      }
    })
    .into_owned()
}

//! Rewrites `ac:image` elements into `<img>` and `<figure>` markup.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use super::utils::escape_attribute;
use crate::plain_text::decode_html_entities;

static IMAGE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<ac:image\b([^>]*?)(?:/>|>(.*?)</ac:image\s*>)").unwrap());
static CAPTION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<ac:caption\b[^>]*>(.*?)</ac:caption\s*>").unwrap());
static ATTACHMENT_FILENAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)<ri:attachment\b[^>]*\bri:filename\s*=\s*"([^"]*)""#).unwrap());
static URL_VALUE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)<ri:url\b[^>]*\bri:value\s*=\s*"([^"]*)""#).unwrap());
static ALT_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\bac:alt\s*=\s*"([^"]*)""#).unwrap());

/// Where an image points and what it is called.
struct ImageSource {
  src: String,
  alt: String,
}

/// Replaces every `ac:image` with an `<img>`, or with a `<figure>` when the
/// image carries an `ac:caption`.
///
/// Attachment images point at `attachment_paths[filename]` when mapped and
/// at the bare filename otherwise. Images with no usable source are dropped.
pub(super) fn rewrite_images(markup: &str, attachment_paths: Option<&HashMap<String, String>>) -> String {
  IMAGE
    .replace_all(markup, |caps: &Captures| {
      let attributes = &caps[1];
      let body = caps.get(2).map_or("", |body| body.as_str());

      let Some(source) = image_source(attributes, body, attachment_paths) else {
        trace!("Dropping ac:image without a source");
        return String::new();
      };

      let img = format!(
        r#"<img src="{}" alt="{}">"#,
        escape_attribute(&source.src),
        escape_attribute(&source.alt)
      );

      match CAPTION.captures(body) {
        Some(caption) => format!("<figure>{img}<figcaption>{}</figcaption></figure>", &caption[1]),
        None => img,
      }
    })
    .into_owned()
}

fn image_source(
  attributes: &str,
  body: &str,
  attachment_paths: Option<&HashMap<String, String>>,
) -> Option<ImageSource> {
  if let Some(attachment) = ATTACHMENT_FILENAME.captures(body) {
    let filename = decode_html_entities(&attachment[1]);
    if !filename.is_empty() {
      let src = match attachment_paths.and_then(|paths| paths.get(&filename)) {
        Some(path) => path.clone(),
        None => {
          trace!("No local path for attachment {filename}, using the filename");
          filename.clone()
        }
      };
      return Some(ImageSource { src, alt: filename });
    }
  }

  let url = URL_VALUE.captures(body)?;
  let src = decode_html_entities(&url[1]);
  if src.is_empty() {
    return None;
  }

  let alt = ALT_ATTRIBUTE
    .captures(attributes)
    .map(|alt| decode_html_entities(&alt[1]))
    .filter(|alt| !alt.is_empty())
    .unwrap_or_else(|| "image".to_string());

  Some(ImageSource { src, alt })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_attachment_image_uses_mapped_path() {
    let mut paths = HashMap::new();
    paths.insert("chart.png".to_string(), "images/chart.png".to_string());

    let input = r#"<ac:image ac:height="250"><ri:attachment ri:filename="chart.png" /></ac:image>"#;
    assert_eq!(
      rewrite_images(input, Some(&paths)),
      r#"<img src="images/chart.png" alt="chart.png">"#
    );
  }

  #[test]
  fn test_unmapped_attachment_falls_back_to_filename() {
    let input = r#"<ac:image><ri:attachment ri:filename="a &amp; b.png" /></ac:image>"#;
    assert_eq!(rewrite_images(input, None), r#"<img src="a &amp; b.png" alt="a &amp; b.png">"#);
  }

  #[test]
  fn test_caption_produces_figure() {
    let input = r#"<ac:image><ri:attachment ri:filename="flow.svg" /><ac:caption><p>Request flow</p></ac:caption></ac:image>"#;
    assert_eq!(
      rewrite_images(input, None),
      r#"<figure><img src="flow.svg" alt="flow.svg"><figcaption><p>Request flow</p></figcaption></figure>"#
    );
  }

  #[test]
  fn test_external_image() {
    let input = r#"<ac:image ac:alt="Logo"><ri:url ri:value="https://example.com/logo.png" /></ac:image>"#;
    assert_eq!(
      rewrite_images(input, None),
      r#"<img src="https://example.com/logo.png" alt="Logo">"#
    );
  }

  #[test]
  fn test_image_without_source_is_dropped() {
    assert_eq!(rewrite_images("<p>a<ac:image ac:width=\"10\" />b</p>", None), "<p>ab</p>");
    assert_eq!(rewrite_images("<ac:image></ac:image>", None), "");
  }
}

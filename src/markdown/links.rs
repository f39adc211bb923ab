//! Rewrites `ac:link` elements into text.
//!
//! User links become `@user:<account id>`. Other links keep their body,
//! falling back to the linked page title or attachment filename.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::adf::MENTION_PLACEHOLDER;

static LINK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<ac:link(?:\s[^>]*?)?(?:/>|>(.*?)</ac:link\s*>)").unwrap());
static USER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ri:user\b([^>]*)>").unwrap());
static ACCOUNT_ID: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)\bri:(?:account-id|userkey)\s*=\s*"([^"]*)""#).unwrap());
static LINK_BODY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<ac:(?:plain-text-)?link-body\b[^>]*>(.*?)</ac:(?:plain-text-)?link-body\s*>").unwrap()
});
static PAGE_TITLE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)<ri:page\b[^>]*\bri:content-title\s*=\s*"([^"]*)""#).unwrap());
static ATTACHMENT_FILENAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)<ri:attachment\b[^>]*\bri:filename\s*=\s*"([^"]*)""#).unwrap());

/// Replaces every `ac:link` with its text form. Attribute values are copied
/// as they appear in the markup, so they stay valid HTML text.
pub(super) fn rewrite_links(markup: &str) -> String {
  LINK
    .replace_all(markup, |caps: &Captures| {
      let body = caps.get(1).map_or("", |body| body.as_str());
      link_text(body)
    })
    .into_owned()
}

fn link_text(body: &str) -> String {
  if let Some(user) = USER.captures(body) {
    return match ACCOUNT_ID.captures(&user[1]).filter(|id| !id[1].trim().is_empty()) {
      Some(id) => format!("{MENTION_PLACEHOLDER}:{}", id[1].trim()),
      None => MENTION_PLACEHOLDER.to_string(),
    };
  }

  if let Some(link_body) = LINK_BODY.captures(body).filter(|caps| !caps[1].trim().is_empty()) {
    return link_body[1].to_string();
  }

  let fallback = PAGE_TITLE
    .captures(body)
    .or_else(|| ATTACHMENT_FILENAME.captures(body))
    .map(|caps| caps[1].to_string());

  if fallback.is_none() {
    trace!("Dropping ac:link with nothing to show");
  }
  fallback.unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_user_link_becomes_mention() {
    let input = r#"<p>Owner: <ac:link><ri:user ri:account-id="5b10ac8d" /></ac:link></p>"#;
    assert_eq!(rewrite_links(input), "<p>Owner: @user:5b10ac8d</p>");
  }

  #[test]
  fn test_user_link_without_id() {
    assert_eq!(rewrite_links(r#"<ac:link><ri:user ri:account-id="" /></ac:link>"#), "@user");
  }

  #[test]
  fn test_page_link_keeps_body() {
    let input = r#"<ac:link><ri:page ri:content-title="Runbook" /><ac:plain-text-link-body>the runbook</ac:plain-text-link-body></ac:link>"#;
    assert_eq!(rewrite_links(input), "the runbook");
  }

  #[test]
  fn test_page_link_falls_back_to_title() {
    let input = r#"<ac:link><ri:page ri:space-key="OPS" ri:content-title="On-call &amp; escalation" /></ac:link>"#;
    assert_eq!(rewrite_links(input), "On-call &amp; escalation");
  }

  #[test]
  fn test_attachment_link_and_empty_link() {
    let input = r#"<ac:link><ri:attachment ri:filename="report.pdf" /></ac:link>|<ac:link />"#;
    assert_eq!(rewrite_links(input), "report.pdf|");
  }
}

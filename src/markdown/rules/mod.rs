//! Rule registry layered over htmd's built-in element handling.
//!
//! A rule names the tags it applies to and pairs a filter with a
//! replacement. Rules are kept in ordered slices and the first rule whose
//! filter matches an element wins. The Confluence-specific rules are
//! consulted before the GFM rules, so they can override how a standard
//! element such as `<blockquote>` is rendered. Tags no rule names keep htmd's
//! own handling; for a tag some rule names, an element no rule accepts
//! renders its converted content.

mod custom;
mod gfm;

use htmd::Element;

use super::converter::ConversionContext;

/// Decides whether a rule applies to an element.
pub type Filter = fn(&Element<'_>, &ConversionContext) -> bool;

/// Produces Markdown for a matched element. The element carries its
/// already-converted children in `content`.
pub type Replacement = fn(&Element<'_>, &ConversionContext) -> String;

/// A single conversion rule.
pub struct Rule {
  pub name: &'static str,
  pub tags: &'static [&'static str],
  pub filter: Filter,
  pub replacement: Replacement,
}

impl Rule {
  /// Checks this rule's filter against an element.
  pub fn matches(&self, element: &Element<'_>, context: &ConversionContext) -> bool {
    (self.filter)(element, context)
  }

  /// Applies this rule's replacement.
  pub fn replace(&self, element: &Element<'_>, context: &ConversionContext) -> String {
    (self.replacement)(element, context)
  }
}

pub use custom::CUSTOM_RULES;
pub use gfm::GFM_RULES;

/// Elements dropped together with their content.
pub const REMOVED_TAGS: &[&str] = &["script", "style", "ac:parameter", "ac:placeholder"];

/// Every tag named by a rule, in precedence order without duplicates.
pub fn handled_tags() -> Vec<&'static str> {
  let mut tags: Vec<&'static str> = Vec::new();
  for tag in CUSTOM_RULES.iter().chain(GFM_RULES).flat_map(|rule| rule.tags.iter().copied()) {
    if !tags.contains(&tag) {
      tags.push(tag);
    }
  }
  tags
}

/// Finds the first rule for `tag` that accepts the element, custom rules
/// first.
pub fn rule_for(tag: &str, element: &Element<'_>, context: &ConversionContext) -> Option<&'static Rule> {
  CUSTOM_RULES
    .iter()
    .chain(GFM_RULES)
    .filter(|rule| rule.tags.contains(&tag))
    .find(|rule| rule.matches(element, context))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::markdown::MarkdownOptions;
  use crate::markdown::converter::{BLOCK_TAG, MarkdownConverter};

  fn convert(html: &str) -> String {
    MarkdownConverter::new(MarkdownOptions::default()).convert(html)
  }

  #[test]
  fn test_handled_tags_are_unique() {
    let tags = handled_tags();
    for tag in ["blockquote", "span", "figure", BLOCK_TAG, "h1", "em"] {
      assert_eq!(tags.iter().filter(|candidate| **candidate == tag).count(), 1, "{tag}");
    }
    assert!(!tags.contains(&"p"));
  }

  #[test]
  fn test_custom_rules_take_precedence() {
    assert_eq!(
      convert(r#"<blockquote data-alert="TIP"><p>x</p></blockquote>"#),
      "> [!TIP]\n> x"
    );
    assert_eq!(convert("<blockquote><p>x</p></blockquote>"), "> x");
  }

  #[test]
  fn test_colored_span_is_kept() {
    assert_eq!(
      convert(r#"<p><span style="color: rgb(255,0,0);">red</span></p>"#),
      r#"<span style="color: rgb(255,0,0);">red</span>"#
    );
    assert_eq!(convert(r#"<p><span style="background-color: red;">plain</span></p>"#), "plain");
  }

  #[test]
  fn test_figure_without_image_renders_its_content() {
    assert_eq!(convert("<figure><figcaption>Only a caption</figcaption></figure>"), "*Only a caption*");
  }

  #[test]
  fn test_removed_tags_drop_content() {
    assert_eq!(
      convert(r#"<p>kept</p><ac:parameter ac:name="title">dropped</ac:parameter><script>var x;</script>"#),
      "kept"
    );
  }
}

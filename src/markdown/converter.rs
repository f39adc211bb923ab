//! HTML to Markdown conversion on top of htmd.
//!
//! Standard elements go through htmd's handlers, configured from
//! [`MarkdownOptions`]. The [`rules`] registry is installed as extra htmd
//! handlers for the tags it names.
//!
//! A handler only sees an element's converted children, not its markup, so
//! tables are classified and rendered before htmd runs. Each table is
//! replaced by an empty placeholder element whose rule splices the
//! prerendered block back in.

use std::sync::Arc;

use htmd::options::{BulletListMarker, CodeBlockFence, Options};
use htmd::{Element, HtmlToMarkdown};
use tracing::{trace, warn};

use super::rules::{self, REMOVED_TAGS};
use super::tables::extract_tables;
use super::utils::{attribute, clean_markdown};
use super::{CodeBlockStyle, MarkdownOptions};

/// Placeholder element standing in for a prerendered table.
pub const BLOCK_TAG: &str = "textify-block";

/// A table rendered ahead of conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrerenderedBlock {
  /// A GFM pipe table.
  Markdown(String),
  /// A table Markdown cannot express, kept as its HTML.
  Html(String),
}

impl PrerenderedBlock {
  /// Placeholder markup for the block stored at `index`.
  pub fn placeholder(index: usize) -> String {
    format!(r#"<{BLOCK_TAG} data-index="{index}"></{BLOCK_TAG}>"#)
  }
}

/// State shared by every rule during one conversion.
#[derive(Debug)]
pub struct ConversionContext {
  options: MarkdownOptions,
  blocks: Vec<PrerenderedBlock>,
}

impl ConversionContext {
  pub fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The prerendered block a placeholder element points at.
  pub fn block(&self, element: &Element<'_>) -> Option<&PrerenderedBlock> {
    let index = attribute(element, "data-index")?.trim().parse::<usize>().ok()?;
    self.blocks.get(index)
  }
}

/// Converts HTML fragments to Markdown.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
  options: MarkdownOptions,
}

impl MarkdownConverter {
  pub fn new(options: MarkdownOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Converts an HTML fragment and normalizes the resulting Markdown.
  pub fn convert(&self, html: &str) -> String {
    let (html, blocks) = extract_tables(html, self);
    let context = Arc::new(ConversionContext {
      options: self.options,
      blocks,
    });

    match build_converter(&context).convert(&html) {
      Ok(markdown) => clean_markdown(&markdown),
      Err(error) => {
        warn!("HTML to Markdown conversion failed, keeping the HTML: {error}");
        html
      }
    }
  }
}

fn build_converter(context: &Arc<ConversionContext>) -> HtmlToMarkdown {
  let mut builder = HtmlToMarkdown::builder()
    .options(htmd_options(&context.options))
    .skip_tags(REMOVED_TAGS.to_vec());

  for tag in rules::handled_tags() {
    let context = Arc::clone(context);
    builder = builder.add_handler(vec![tag], move |element: Element| {
      let markdown = match rules::rule_for(tag, &element, &context) {
        Some(rule) => {
          trace!("Rule '{}' matched <{tag}>", rule.name);
          rule.replace(&element, &context)
        }
        None => element.content.to_string(),
      };
      Some(markdown)
    });
  }

  builder.build()
}

fn htmd_options(options: &MarkdownOptions) -> Options {
  let mut htmd_options = Options::default();

  htmd_options.bullet_list_marker = match options.bullet_list_marker {
    '*' => BulletListMarker::Asterisk,
    _ => BulletListMarker::Dash,
  };
  htmd_options.code_block_style = match options.code_block_style {
    CodeBlockStyle::Fenced => htmd::options::CodeBlockStyle::Fenced,
    CodeBlockStyle::Indented => htmd::options::CodeBlockStyle::Indented,
  };
  htmd_options.code_block_fence = if options.fence.starts_with('~') {
    CodeBlockFence::Tildes
  } else {
    CodeBlockFence::Backticks
  };

  htmd_options
}

#[cfg(test)]
mod tests {
  use super::*;

  fn convert(html: &str) -> String {
    MarkdownConverter::new(MarkdownOptions::default()).convert(html)
  }

  #[test]
  fn test_paragraphs_and_links() {
    let output = convert(r#"<p>See <a href="https://example.com/docs">the docs</a>.</p><p>Next</p>"#);
    assert_eq!(output, "See [the docs](https://example.com/docs).\n\nNext");
  }

  #[test]
  fn test_fenced_code_block_with_language() {
    let output = convert(r#"<pre><code class="language-rust">let x = 1;</code></pre>"#);
    assert!(output.starts_with("```rust\n"), "{output}");
    assert!(output.contains("let x = 1;"));
    assert!(output.ends_with("```"));
  }

  #[test]
  fn test_tilde_fence() {
    let options = MarkdownOptions {
      fence: "~~~",
      ..Default::default()
    };
    let output = MarkdownConverter::new(options).convert("<pre><code>make</code></pre>");
    assert!(output.starts_with("~~~"), "{output}");
  }

  #[test]
  fn test_bullet_marker() {
    let output = convert("<ul><li>one</li><li>two</li></ul>");
    let items: Vec<&str> = output.lines().filter(|line| !line.is_empty()).collect();
    assert_eq!(items.len(), 2, "{output}");
    assert!(items.iter().all(|line| line.starts_with('-')), "{output}");

    let options = MarkdownOptions {
      bullet_list_marker: '*',
      ..Default::default()
    };
    let output = MarkdownConverter::new(options).convert("<ul><li>one</li></ul>");
    assert!(output.starts_with('*'), "{output}");
  }

  #[test]
  fn test_unknown_elements_keep_content() {
    assert_eq!(convert("<p><ac:emoticon ac:name=\"smile\" />hi <x-widget>there</x-widget></p>"), "hi there");
  }

  #[test]
  fn test_placeholder_without_block_renders_nothing() {
    assert_eq!(convert(&format!("<p>a</p>{}", PrerenderedBlock::placeholder(7))), "a");
  }
}

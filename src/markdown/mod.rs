//! Confluence storage format to GitHub-flavored Markdown.
//!
//! Conversion happens in three stages:
//! - [`preprocess`] rewrites Confluence-only markup (`ac:image`, `ac:link`,
//!   code and alert macros, comment markers, CDATA) into plain HTML.
//! - [`nesting`] flattens element trees nested past [`MAX_HTML_DEPTH`].
//! - [`converter`] hands the result to htmd, with the [`rules`] registry
//!   installed as extra element handlers, Confluence rules first and GFM
//!   rules after.
//!
//! # Example
//!
//! ```
//! use atlassian_textify::markdown::storage_format_to_markdown;
//!
//! let storage = r#"<h1>Title</h1><p><strong>Bold text</strong></p>"#;
//! let markdown = storage_format_to_markdown(Some(storage), None);
//! assert_eq!(markdown, "# Title\n\n**Bold text**");
//! ```

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, trace};

pub mod converter;
mod images;
mod links;
mod macros;
mod nesting;
mod preprocess;
pub mod rules;
pub mod tables;
pub mod utils;

pub use converter::MarkdownConverter;
pub use nesting::MAX_HTML_DEPTH;
pub use tables::is_table_convertible;

/// Heading syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
  /// `# Heading`
  #[default]
  Atx,
  /// Underlined with `=` or `-`; levels 3 to 6 fall back to ATX.
  Setext,
}

/// Code block syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
  #[default]
  Fenced,
  Indented,
}

/// Options that control Markdown rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
  pub heading_style: HeadingStyle,
  pub bullet_list_marker: char,
  pub code_block_style: CodeBlockStyle,
  /// Fence for fenced code blocks. A fence starting with `~` selects tildes,
  /// anything else backticks.
  pub fence: &'static str,
  pub em_delimiter: char,
  pub strong_delimiter: &'static str,
  pub horizontal_rule: &'static str,
  /// Render convertible tables as GFM pipe tables. When off, every table is
  /// kept as HTML.
  pub tables: bool,
  /// Render `<del>`, `<s>` and `<strike>` as `~~text~~`.
  pub strikethrough: bool,
  /// Render Markdown tables without padding cells to align columns.
  pub compact_tables: bool,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      heading_style: HeadingStyle::Atx,
      bullet_list_marker: '-',
      code_block_style: CodeBlockStyle::Fenced,
      fence: "```",
      em_delimiter: '*',
      strong_delimiter: "**",
      horizontal_rule: "---",
      tables: true,
      strikethrough: true,
      compact_tables: false,
    }
  }
}

/// Converts Confluence storage format to Markdown with the default options.
///
/// `attachment_paths` maps attachment filenames to the paths images should
/// point at; unmapped images keep their bare filename.
pub fn storage_format_to_markdown(input: Option<&str>, attachment_paths: Option<&HashMap<String, String>>) -> String {
  storage_format_to_markdown_with_options(input, attachment_paths, &MarkdownOptions::default())
}

/// Converts Confluence storage format to Markdown using the provided options.
///
/// # Arguments
///
/// * `input` - The storage format (XHTML) to convert. `None` and the empty
///   string produce an empty string.
/// * `attachment_paths` - Optional filename to path mapping for images.
/// * `options` - Rendering options.
///
/// # Returns
///
/// The Markdown, trimmed of leading and trailing whitespace.
///
/// # Examples
///
/// ```
/// # use atlassian_textify::markdown::{storage_format_to_markdown_with_options, MarkdownOptions};
/// let input = "<table><tr><th>A</th></tr><tr><td>1</td></tr></table>";
/// let options = MarkdownOptions { compact_tables: true, ..Default::default() };
/// let output = storage_format_to_markdown_with_options(Some(input), None, &options);
/// assert_eq!(output, "| A |\n| --- |\n| 1 |");
/// ```
pub fn storage_format_to_markdown_with_options(
  input: Option<&str>,
  attachment_paths: Option<&HashMap<String, String>>,
  options: &MarkdownOptions,
) -> String {
  let Some(storage) = input.filter(|storage| !storage.is_empty()) else {
    return String::new();
  };

  let start = Instant::now();

  let html = preprocess::preprocess(storage, attachment_paths);

  trace!(
    "Preprocessed storage format (first 500 chars):\n{}",
    html.chars().take(500).collect::<String>()
  );

  let markdown = MarkdownConverter::new(*options).convert(&nesting::limit_nesting(&html));

  debug!(
    "Converted storage format to Markdown in {duration:?} ({input} chars in, {output} chars out)",
    duration = start.elapsed(),
    input = storage.len(),
    output = markdown.len()
  );

  markdown
}

//! GitHub-flavored Markdown rules for the elements whose output
//! [`MarkdownOptions`](crate::markdown::MarkdownOptions) controls beyond what
//! htmd's own options cover.

use htmd::Element;

use super::Rule;
use crate::markdown::HeadingStyle;
use crate::markdown::converter::{BLOCK_TAG, ConversionContext, PrerenderedBlock};
use crate::markdown::utils::clean_markdown;

pub const GFM_RULES: &[Rule] = &[
  Rule {
    name: "heading-1",
    tags: &["h1"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(1, element, context),
  },
  Rule {
    name: "heading-2",
    tags: &["h2"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(2, element, context),
  },
  Rule {
    name: "heading-3",
    tags: &["h3"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(3, element, context),
  },
  Rule {
    name: "heading-4",
    tags: &["h4"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(4, element, context),
  },
  Rule {
    name: "heading-5",
    tags: &["h5"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(5, element, context),
  },
  Rule {
    name: "heading-6",
    tags: &["h6"],
    filter: |_, _| true,
    replacement: |element, context| render_heading(6, element, context),
  },
  Rule {
    name: "blockquote",
    tags: &["blockquote"],
    filter: |_, _| true,
    replacement: render_blockquote,
  },
  Rule {
    name: "horizontal-rule",
    tags: &["hr"],
    filter: |_, _| true,
    replacement: |_, context| format!("\n\n{}\n\n", context.options().horizontal_rule),
  },
  Rule {
    name: "emphasis",
    tags: &["em", "i"],
    filter: |_, _| true,
    replacement: |element, context| {
      let delimiter = context.options().em_delimiter.to_string();
      wrap_inline(element.content, &delimiter)
    },
  },
  Rule {
    name: "strong",
    tags: &["strong", "b"],
    filter: |_, _| true,
    replacement: |element, context| wrap_inline(element.content, context.options().strong_delimiter),
  },
  Rule {
    name: "strikethrough",
    tags: &["del", "s", "strike"],
    filter: |_, context| context.options().strikethrough,
    replacement: |element, _| wrap_inline(element.content, "~~"),
  },
  Rule {
    name: "table",
    tags: &[BLOCK_TAG],
    filter: |element, context| matches!(context.block(element), Some(PrerenderedBlock::Markdown(_))),
    replacement: render_markdown_block,
  },
];

fn render_heading(level: usize, element: &Element<'_>, context: &ConversionContext) -> String {
  let text = element.content.split_whitespace().collect::<Vec<_>>().join(" ");
  if text.is_empty() {
    return String::new();
  }

  match context.options().heading_style {
    HeadingStyle::Setext if level <= 2 => {
      let underline = if level == 1 { "=" } else { "-" };
      format!("\n\n{text}\n{}\n\n", underline.repeat(text.chars().count()))
    }
    _ => format!("\n\n{} {text}\n\n", "#".repeat(level)),
  }
}

fn render_blockquote(element: &Element<'_>, _context: &ConversionContext) -> String {
  let content = clean_markdown(element.content);
  if content.is_empty() {
    return String::new();
  }

  let quoted = content
    .lines()
    .map(|line| format!("> {line}").trim_end().to_string())
    .collect::<Vec<_>>()
    .join("\n");
  format!("\n\n{quoted}\n\n")
}

fn render_markdown_block(element: &Element<'_>, context: &ConversionContext) -> String {
  match context.block(element) {
    Some(PrerenderedBlock::Markdown(markdown)) if !markdown.is_empty() => format!("\n\n{markdown}\n\n"),
    _ => String::new(),
  }
}

/// Wraps inline content in a delimiter, keeping surrounding whitespace
/// outside of it so the delimiters stay left- and right-flanking.
fn wrap_inline(content: &str, delimiter: &str) -> String {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    return content.to_string();
  }

  let leading = &content[..content.len() - content.trim_start().len()];
  let trailing = &content[content.trim_end().len()..];
  format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

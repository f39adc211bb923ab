//! Confluence-specific rules layered over the GFM rules.

use htmd::Element;

use super::Rule;
use crate::markdown::converter::{BLOCK_TAG, ConversionContext, PrerenderedBlock};
use crate::markdown::utils::{attribute, clean_markdown, collapse_whitespace, escape_attribute};

/// Custom rules in precedence order.
pub const CUSTOM_RULES: &[Rule] = &[
  Rule {
    name: "figure",
    tags: &["figure"],
    filter: |element, _| element.content.contains("!["),
    replacement: render_figure,
  },
  Rule {
    name: "figure-caption",
    tags: &["figcaption"],
    filter: |_, _| true,
    replacement: render_caption,
  },
  Rule {
    name: "alert",
    tags: &["blockquote"],
    filter: |element, _| attribute(element, "data-alert").is_some(),
    replacement: render_alert,
  },
  Rule {
    name: "colored-span",
    tags: &["span"],
    filter: is_colored_span,
    replacement: keep_span,
  },
  Rule {
    name: "complex-table",
    tags: &[BLOCK_TAG],
    filter: |element, context| matches!(context.block(element), Some(PrerenderedBlock::Html(_))),
    replacement: render_html_block,
  },
];

/// The image followed by its caption, each as its own block.
fn render_figure(element: &Element<'_>, _context: &ConversionContext) -> String {
  format!("\n\n{}\n\n", clean_markdown(element.content))
}

fn render_caption(element: &Element<'_>, context: &ConversionContext) -> String {
  let caption = collapse_whitespace(element.content);
  let caption = caption.trim();
  if caption.is_empty() {
    return String::new();
  }

  let em = context.options().em_delimiter;
  format!("\n\n{em}{caption}{em}\n\n")
}

/// Renders a GFM alert: a `> [!TYPE]` marker line followed by the body, with
/// every line quoted.
fn render_alert(element: &Element<'_>, _context: &ConversionContext) -> String {
  let alert_type = attribute(element, "data-alert").unwrap_or_default().trim();

  let mut result = format!("\n\n> [!{alert_type}]\n");
  for line in clean_markdown(element.content).lines() {
    let quoted = format!("> {line}");
    result.push_str(quoted.trim_end());
    result.push('\n');
  }
  result.push('\n');
  result
}

fn is_colored_span(element: &Element<'_>, _context: &ConversionContext) -> bool {
  attribute(element, "style").is_some_and(|style| {
    style
      .split(';')
      .filter_map(|declaration| declaration.split_once(':'))
      .any(|(property, _)| property.trim().eq_ignore_ascii_case("color"))
  })
}

/// Emits the span as HTML around its converted content; Markdown has no
/// equivalent for color.
fn keep_span(element: &Element<'_>, _context: &ConversionContext) -> String {
  let attributes: String = element
    .attrs
    .iter()
    .map(|attribute| format!(r#" {}="{}""#, &*attribute.name.local, escape_attribute(&attribute.value)))
    .collect();

  format!("<span{attributes}>{}</span>", element.content)
}

/// Emits a table kept as HTML, unchanged.
fn render_html_block(element: &Element<'_>, context: &ConversionContext) -> String {
  match context.block(element) {
    Some(PrerenderedBlock::Html(html)) => format!("\n\n{html}\n\n"),
    _ => String::new(),
  }
}

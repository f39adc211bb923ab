//! HTML table classification and Markdown table rendering.
//!
//! GFM pipe tables cannot express merged cells or multi-line cells, so
//! tables using either are classified as not convertible and kept as HTML.
//! Tables are pulled out of the markup before conversion and rendered here,
//! each cell converted on its own.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use super::converter::{MarkdownConverter, PrerenderedBlock};

static SPAN_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(?:colspan|rowspan)\s*=").unwrap());
static CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]\s*>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\b").unwrap());
static TABLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(/)?table\b[^>]*>").unwrap());

/// Decides whether a table can be written as a GFM pipe table.
///
/// Returns `false` when the markup contains a `colspan` or `rowspan`
/// attribute, or a `<br>` inside any cell.
pub fn is_table_convertible(table_html: &str) -> bool {
  if SPAN_ATTRIBUTE.is_match(table_html) {
    return false;
  }

  !CELL
    .captures_iter(table_html)
    .any(|cell| LINE_BREAK.is_match(&cell[1]))
}

/// Replaces every outermost `<table>` in `html` with a placeholder and
/// renders it.
///
/// Returns the rewritten markup together with the rendered tables, indexed
/// by their placeholders. A table missing its closing tag runs to the end of
/// the markup.
pub(super) fn extract_tables(html: &str, converter: &MarkdownConverter) -> (String, Vec<PrerenderedBlock>) {
  let mut blocks = Vec::new();
  let mut result = String::with_capacity(html.len());
  let mut cursor = 0;

  while let Some(open) = TABLE_TAG.captures_at(html, cursor) {
    let Some(open_tag) = open.get(0) else {
      break;
    };

    // A stray closing tag has nothing to pair with.
    if open.get(1).is_some() {
      result.push_str(&html[cursor..open_tag.end()]);
      cursor = open_tag.end();
      continue;
    }

    let table_end = find_table_end(html, open_tag.end()).unwrap_or(html.len());
    result.push_str(&html[cursor..open_tag.start()]);
    result.push_str(&PrerenderedBlock::placeholder(blocks.len()));
    blocks.push(render_table(&html[open_tag.start()..table_end], converter));
    cursor = table_end;
  }

  result.push_str(&html[cursor..]);
  (result, blocks)
}

/// Finds the end of the closing tag balancing a `<table>` that ends at
/// `from`.
fn find_table_end(html: &str, from: usize) -> Option<usize> {
  let mut depth = 1usize;

  for caps in TABLE_TAG.captures_iter(&html[from..]) {
    let tag = caps.get(0)?;
    if caps.get(1).is_some() {
      depth -= 1;
      if depth == 0 {
        return Some(from + tag.end());
      }
    } else {
      depth += 1;
    }
  }

  None
}

fn render_table(table_html: &str, converter: &MarkdownConverter) -> PrerenderedBlock {
  if !converter.options().tables || !is_table_convertible(table_html) {
    trace!("Keeping table as HTML");
    return PrerenderedBlock::Html(table_html.to_string());
  }

  let fragment = Html::parse_fragment(table_html);
  let Some(table) = fragment
    .root_element()
    .descendants()
    .filter_map(ElementRef::wrap)
    .find(|element| element.value().name() == "table")
  else {
    return PrerenderedBlock::Html(table_html.to_string());
  };

  let rows: Vec<Vec<String>> = table_rows(table)
    .into_iter()
    .map(|row| {
      row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .map(|cell| format_cell(&converter.convert(&cell.inner_html())))
        .collect::<Vec<_>>()
    })
    .filter(|cells| !cells.is_empty())
    .collect();

  debug!("Rendering {} table row(s) as Markdown", rows.len());
  PrerenderedBlock::Markdown(render_markdown_table(rows, converter.options().compact_tables).unwrap_or_default())
}

/// Collects `<tr>` elements that belong to this table, skipping nested
/// tables.
fn table_rows(table: ElementRef) -> Vec<ElementRef> {
  let mut rows = Vec::new();

  for child in table.children().filter_map(ElementRef::wrap) {
    match child.value().name() {
      "tr" => rows.push(child),
      "thead" | "tbody" | "tfoot" => {
        rows.extend(
          child
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|row| row.value().name() == "tr"),
        );
      }
      _ => {}
    }
  }

  rows
}

fn format_cell(content: &str) -> String {
  content
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .replace('|', r"\|")
}

/// Pretty-print Markdown tables.
///
/// Rows shorter than the widest row are padded with empty cells. Unless
/// `compact` is set, columns are padded to their display width.
///
/// # Returns
/// `Some(String)` containing the rendered table without surrounding blank
/// lines, or `None` when there is nothing to render.
pub fn render_markdown_table(mut rows: Vec<Vec<String>>, compact: bool) -> Option<String> {
  let column_count = rows.iter().map(Vec::len).max()?;
  if column_count == 0 {
    return None;
  }

  for row in &mut rows {
    row.resize(column_count, String::new());
  }

  let column_widths: Vec<usize> = if compact {
    vec![0; column_count]
  } else {
    (0..column_count)
      .map(|index| rows.iter().map(|row| row[index].width()).max().unwrap_or(0))
      .collect()
  };

  let mut lines = Vec::with_capacity(rows.len() + 1);
  lines.push(format_row(&rows[0], &column_widths));
  lines.push(format_separator(&column_widths, compact));
  lines.extend(rows.iter().skip(1).map(|row| format_row(row, &column_widths)));

  Some(lines.join("\n"))
}

fn format_separator(column_widths: &[usize], compact: bool) -> String {
  let mut line = String::from("|");
  for width in column_widths {
    let dash_count = if compact { 3 } else { (*width).max(3) };
    line.push(' ');
    line.push_str(&"-".repeat(dash_count));
    line.push_str(" |");
  }
  line
}

fn format_row(row: &[String], column_widths: &[usize]) -> String {
  let mut line = String::from("|");

  for (cell, width) in row.iter().zip(column_widths) {
    line.push(' ');
    line.push_str(cell);
    let cell_width = cell.width();
    if *width > cell_width {
      line.push_str(&" ".repeat(width - cell_width));
    }
    line.push_str(" |");
  }

  line
}

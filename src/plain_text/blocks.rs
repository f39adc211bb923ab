//! Block-level separator insertion and whitespace normalization.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_END: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)</(?:p|h[1-6]|li|tr|blockquote)\s*>").unwrap());
static CELL_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Inserts the line and column breaks that block elements imply.
///
/// Must run before tags are stripped: paragraphs, headings, list items, rows
/// and blockquotes end a line, cells are preceded by a tab, and `<br>` becomes
/// a newline.
pub fn insert_block_separators(markup: &str) -> String {
  let with_lines = BLOCK_END.replace_all(markup, "${0}\n");
  let with_cells = CELL_END.replace_all(&with_lines, "\t${0}");
  LINE_BREAK.replace_all(&with_cells, "\n").into_owned()
}

/// Collapses horizontal whitespace per line and drops blank lines.
pub fn normalize_whitespace(text: &str) -> String {
  text
    .split('\n')
    .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

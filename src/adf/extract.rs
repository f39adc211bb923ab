//! Plain-text extraction from typed ADF nodes.

use super::node::{AdfDocument, AdfNode};

/// Placeholder for a mention without display text.
pub const MENTION_PLACEHOLDER: &str = "@user";

/// Placeholder for embedded media.
pub const ATTACHMENT_PLACEHOLDER: &str = "[attachment]";

/// Extracts the plain text of a single node and its descendants.
///
/// Block containers such as paragraphs and headings add no separator of their
/// own; only list items, table cells and table rows contribute line and column
/// breaks.
pub fn extract_node(node: &AdfNode) -> String {
  match node {
    AdfNode::Text { text, .. } => text.clone(),
    AdfNode::HardBreak => "\n".to_string(),
    AdfNode::Mention { text } => text.clone().unwrap_or_else(|| MENTION_PLACEHOLDER.to_string()),
    AdfNode::Emoji { text, short_name } => text.as_ref().or(short_name.as_ref()).cloned().unwrap_or_default(),
    AdfNode::Media => ATTACHMENT_PLACEHOLDER.to_string(),
    AdfNode::MediaSingle(content)
    | AdfNode::Paragraph(content)
    | AdfNode::Heading { content, .. }
    | AdfNode::Container { content, .. } => extract_children(content),
    AdfNode::ListItem(content) => {
      let mut item = extract_children(content);
      item.push('\n');
      item
    }
    AdfNode::TableCell { content, .. } => {
      let mut cell = extract_children(content);
      cell.push('\t');
      cell
    }
    AdfNode::TableRow(content) => {
      let cells = extract_children(content);
      let mut row = cells.trim_end().to_string();
      row.push('\n');
      row
    }
    AdfNode::Unknown { .. } => String::new(),
  }
}

fn extract_children(content: &[AdfNode]) -> String {
  content.iter().map(extract_node).collect()
}

impl AdfDocument {
  /// Extracts each top-level block and joins the non-empty ones with newlines.
  pub fn to_plain_text(&self) -> String {
    self
      .content
      .iter()
      .map(extract_node)
      .filter(|text| !text.is_empty())
      .collect::<Vec<_>>()
      .join("\n")
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn extract(value: serde_json::Value) -> String {
    extract_node(&AdfNode::from_value(&value))
  }

  #[test]
  fn test_hard_break_is_a_single_newline() {
    let output = extract(json!({"type": "hardBreak"}));
    assert_eq!(output, "\n");
    assert_eq!(output.len(), 1);
  }

  #[test]
  fn test_media_placeholder() {
    assert_eq!(extract(json!({"type": "media", "attrs": {"id": "x"}})), "[attachment]");
  }

  #[test]
  fn test_mention_without_text_uses_placeholder() {
    assert_eq!(extract(json!({"type": "mention", "attrs": {"id": "x"}})), "@user");
  }

  #[test]
  fn test_mention_with_text() {
    assert_eq!(
      extract(json!({"type": "mention", "attrs": {"id": "x", "text": "@Ada Lovelace"}})),
      "@Ada Lovelace"
    );
  }

  #[test]
  fn test_emoji_prefers_text_then_short_name() {
    assert_eq!(
      extract(json!({"type": "emoji", "attrs": {"shortName": ":smile:", "text": "😄"}})),
      "😄"
    );
    assert_eq!(extract(json!({"type": "emoji", "attrs": {"shortName": ":smile:"}})), ":smile:");
    assert_eq!(extract(json!({"type": "emoji"})), "");
  }

  #[test]
  fn test_table_row_trims_trailing_tab() {
    let row = json!({
      "type": "tableRow",
      "content": [
        {"type": "tableCell", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "A"}]}]},
        {"type": "tableCell", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "B"}]}]}
      ]
    });
    assert_eq!(extract(row), "A\tB\n");
  }

  #[test]
  fn test_table_header_cells_behave_like_cells() {
    let row = json!({
      "type": "tableRow",
      "content": [
        {"type": "tableHeader", "content": [{"type": "text", "text": "Name"}]},
        {"type": "tableHeader", "content": [{"type": "text", "text": "Value"}]}
      ]
    });
    assert_eq!(extract(row), "Name\tValue\n");
  }

  #[test]
  fn test_list_items_end_with_newline() {
    let list = json!({
      "type": "bulletList",
      "content": [
        {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "one"}]}]},
        {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "two"}]}]}
      ]
    });
    assert_eq!(extract(list), "one\ntwo\n");
  }

  #[test]
  fn test_media_single_wraps_media() {
    let node = json!({"type": "mediaSingle", "content": [{"type": "media", "attrs": {"id": "abc"}}]});
    assert_eq!(extract(node), "[attachment]");
  }

  #[test]
  fn test_unknown_leaf_is_empty() {
    assert_eq!(extract(json!({"type": "rule"})), "");
    assert_eq!(extract(json!({"type": "inlineCard", "attrs": {"url": "https://example.com"}})), "");
  }

  #[test]
  fn test_document_joins_non_empty_blocks() {
    let document = AdfDocument::from_value(&json!({
      "type": "doc",
      "version": 1,
      "content": [
        {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Title"}]},
        {"type": "rule"},
        {"type": "paragraph", "content": [
          {"type": "text", "text": "line one"},
          {"type": "hardBreak"},
          {"type": "text", "text": "line two"}
        ]}
      ]
    }))
    .unwrap();

    assert_eq!(document.to_plain_text(), "Title\nline one\nline two");
  }
}

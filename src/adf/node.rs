//! Typed ADF document tree.
//!
//! ADF arrives as untyped JSON. Nodes are lifted into a closed enum once,
//! up front, so extraction can dispatch with an exhaustive `match` instead of
//! probing JSON fields at every step.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Nodes nested deeper than this are replaced by [`AdfNode::Unknown`].
pub const MAX_ADF_DEPTH: usize = 512;

/// A formatting mark attached to a text node (`strong`, `link`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdfMark {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub attrs: Option<Value>,
}

/// A validated ADF document: `{ "type": "doc", "content": [...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfDocument {
  pub version: Option<u64>,
  pub content: Vec<AdfNode>,
}

/// A single ADF node.
///
/// Kinds without dedicated text semantics are folded into
/// [`AdfNode::Container`] when they carry children and into
/// [`AdfNode::Unknown`] when they do not.
#[derive(Debug, Clone, PartialEq)]
pub enum AdfNode {
  Text { text: String, marks: Vec<AdfMark> },
  HardBreak,
  Mention { text: Option<String> },
  Emoji { text: Option<String>, short_name: Option<String> },
  Media,
  MediaSingle(Vec<AdfNode>),
  Paragraph(Vec<AdfNode>),
  Heading { level: Option<u8>, content: Vec<AdfNode> },
  ListItem(Vec<AdfNode>),
  /// `tableCell`, or `tableHeader` when `header` is set.
  TableCell { header: bool, content: Vec<AdfNode> },
  TableRow(Vec<AdfNode>),
  Container { kind: String, content: Vec<AdfNode> },
  Unknown { kind: Option<String> },
}

impl AdfDocument {
  /// Validates and converts a JSON value into a document.
  ///
  /// The check is structural only: the value must be an object whose `type`
  /// is `"doc"` and whose `content` is an array.
  ///
  /// # Errors
  /// Returns an error describing the first structural mismatch.
  pub fn from_value(value: &Value) -> Result<Self> {
    let object = value.as_object().context("ADF document must be a JSON object")?;

    match object.get("type").and_then(Value::as_str) {
      Some("doc") => {}
      Some(other) => bail!("expected ADF type \"doc\", found \"{other}\""),
      None => bail!("ADF document has no type"),
    }

    let content = object
      .get("content")
      .and_then(Value::as_array)
      .context("ADF document content must be an array")?;

    Ok(Self {
      version: object.get("version").and_then(Value::as_u64),
      content: content.iter().map(|node| AdfNode::from_value_at(node, 1)).collect(),
    })
  }

  /// Parses JSON text and validates it as a document.
  ///
  /// # Errors
  /// Fails when the text is not JSON or the JSON is not an ADF document.
  pub fn parse(json: &str) -> Result<Self> {
    let value: Value = serde_json::from_str(json).context("ADF input is not valid JSON")?;
    Self::from_value(&value)
  }
}

impl AdfNode {
  /// Converts a JSON value into a node. Non-object values become
  /// [`AdfNode::Unknown`].
  pub fn from_value(value: &Value) -> Self {
    Self::from_value_at(value, 0)
  }

  pub(crate) fn from_value_at(value: &Value, depth: usize) -> Self {
    let Some(object) = value.as_object() else {
      return AdfNode::Unknown { kind: None };
    };

    let kind = object.get("type").and_then(Value::as_str);

    if depth > MAX_ADF_DEPTH {
      warn!(
        "ADF node {kind:?} exceeds the maximum nesting depth of {MAX_ADF_DEPTH}; dropping its subtree"
      );
      return AdfNode::Unknown {
        kind: kind.map(str::to_string),
      };
    }

    let children = || children_of(object, depth);

    match kind {
      Some("text") => AdfNode::Text {
        text: object.get("text").and_then(Value::as_str).unwrap_or_default().to_string(),
        marks: marks_of(object),
      },
      Some("hardBreak") => AdfNode::HardBreak,
      Some("mention") => AdfNode::Mention {
        text: attr_string(object, "text"),
      },
      Some("emoji") => AdfNode::Emoji {
        text: attr_string(object, "text"),
        short_name: attr_string(object, "shortName"),
      },
      Some("media") => AdfNode::Media,
      Some("mediaSingle") => AdfNode::MediaSingle(children()),
      Some("paragraph") => AdfNode::Paragraph(children()),
      Some("heading") => AdfNode::Heading {
        level: attrs_of(object)
          .and_then(|attrs| attrs.get("level"))
          .and_then(Value::as_u64)
          .and_then(|level| u8::try_from(level).ok()),
        content: children(),
      },
      Some("listItem") => AdfNode::ListItem(children()),
      Some("tableCell") => AdfNode::TableCell {
        header: false,
        content: children(),
      },
      Some("tableHeader") => AdfNode::TableCell {
        header: true,
        content: children(),
      },
      Some("tableRow") => AdfNode::TableRow(children()),
      _ if object.get("content").is_some_and(Value::is_array) => AdfNode::Container {
        kind: kind.unwrap_or_default().to_string(),
        content: children(),
      },
      _ => AdfNode::Unknown {
        kind: kind.map(str::to_string),
      },
    }
  }
}

fn children_of(object: &Map<String, Value>, depth: usize) -> Vec<AdfNode> {
  object
    .get("content")
    .and_then(Value::as_array)
    .map(|content| {
      content
        .iter()
        .map(|child| AdfNode::from_value_at(child, depth + 1))
        .collect()
    })
    .unwrap_or_default()
}

fn attrs_of(object: &Map<String, Value>) -> Option<&Map<String, Value>> {
  object.get("attrs").and_then(Value::as_object)
}

/// Reads a non-empty string attribute.
fn attr_string(object: &Map<String, Value>, name: &str) -> Option<String> {
  attrs_of(object)
    .and_then(|attrs| attrs.get(name))
    .and_then(Value::as_str)
    .filter(|value| !value.is_empty())
    .map(str::to_string)
}

fn marks_of(object: &Map<String, Value>) -> Vec<AdfMark> {
  object
    .get("marks")
    .and_then(Value::as_array)
    .map(|marks| {
      marks
        .iter()
        .filter_map(|mark| AdfMark::deserialize(mark).ok())
        .collect()
    })
    .unwrap_or_default()
}

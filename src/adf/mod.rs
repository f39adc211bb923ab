//! Atlassian Document Format (ADF) to plain text.
//!
//! Jira stores descriptions and comments as ADF, a JSON node tree. Older
//! issues may still carry plain strings in the same fields, so the string
//! entry point accepts both.
//!
//! # Example
//!
//! ```
//! use atlassian_textify::adf::adf_to_plain_text;
//! use serde_json::json;
//!
//! let doc = json!({
//!   "type": "doc",
//!   "version": 1,
//!   "content": [{"type": "paragraph", "content": [{"type": "text", "text": "hello"}]}]
//! });
//! assert_eq!(adf_to_plain_text(Some(&doc)), "hello");
//! ```

use serde_json::Value;
use tracing::debug;

mod extract;
mod node;

pub use extract::{ATTACHMENT_PLACEHOLDER, MENTION_PLACEHOLDER, extract_node};
pub use node::{AdfDocument, AdfMark, AdfNode, MAX_ADF_DEPTH};

/// Converts an ADF value to plain text.
///
/// - `None` and JSON `null` produce an empty string.
/// - A JSON string is handled by [`adf_str_to_plain_text`].
/// - Any other value must be an ADF document; anything else produces an empty
///   string.
pub fn adf_to_plain_text(input: Option<&Value>) -> String {
  match input {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(raw)) => adf_str_to_plain_text(raw),
    Some(value) => match AdfDocument::from_value(value) {
      Ok(document) => document.to_plain_text(),
      Err(e) => {
        debug!("Ignoring invalid ADF value: {e:#}");
        String::new()
      }
    },
  }
}

/// Converts JSON-encoded ADF to plain text.
///
/// Text that is not JSON, or JSON that is not an ADF document, is returned
/// unchanged: it is treated as a legacy plain-text field.
pub fn adf_str_to_plain_text(raw: &str) -> String {
  match AdfDocument::parse(raw) {
    Ok(document) => document.to_plain_text(),
    Err(e) => {
      debug!("Treating ADF input as plain text: {e:#}");
      raw.to_string()
    }
  }
}

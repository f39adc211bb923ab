//! Helpers shared by the preprocessor, the converter and its rules.

use htmd::Element;

/// Returns the value of an attribute on an element handed to a rule.
pub fn attribute<'a>(element: &'a Element<'_>, name: &str) -> Option<&'a str> {
  element
    .attrs
    .iter()
    .find(|attribute| &*attribute.name.local == name)
    .map(|attribute| &*attribute.value)
}

/// Collapses every run of whitespace into a single space.
pub fn collapse_whitespace(text: &str) -> String {
  let mut result = String::with_capacity(text.len());
  let mut previous_was_whitespace = false;

  for ch in text.chars() {
    if ch.is_whitespace() {
      if !previous_was_whitespace {
        result.push(' ');
      }
      previous_was_whitespace = true;
    } else {
      result.push(ch);
      previous_was_whitespace = false;
    }
  }

  result
}

/// Escapes a value for use inside a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('"', "&quot;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

/// Escapes text so an HTML parser reads it back verbatim.
pub fn escape_text(value: &str) -> String {
  value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Normalizes rendered Markdown.
///
/// - Empties lines that hold only whitespace
/// - Removes excessive blank lines (more than 2 consecutive newlines)
/// - Drops leading and trailing blank lines and trailing whitespace
///
/// Indentation of the first line is kept, since an indented code block
/// depends on it.
pub fn clean_markdown(content: &str) -> String {
  let mut result = content
    .split('\n')
    .map(|line| if line.trim().is_empty() { "" } else { line })
    .collect::<Vec<_>>()
    .join("\n");

  while result.contains("\n\n\n") {
    result = result.replace("\n\n\n", "\n\n");
  }

  result.trim_start_matches('\n').trim_end().to_string()
}

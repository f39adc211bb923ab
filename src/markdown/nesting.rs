//! Bounds element nesting before conversion.
//!
//! HTML to Markdown conversion recurses once per element level, so deeply
//! nested markup is rebuilt with every element past [`MAX_HTML_DEPTH`]
//! replaced by its text.

use std::borrow::Cow;

use scraper::{ElementRef, Html, Node};
use tracing::warn;

use super::utils::{escape_attribute, escape_text};

/// Element nesting depth past which elements are flattened to text.
pub const MAX_HTML_DEPTH: usize = 128;

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
  Enter,
  Leave,
}

/// Returns `html` unchanged unless elements nest deeper than
/// [`MAX_HTML_DEPTH`]; otherwise returns a copy with the deepest subtrees
/// flattened to escaped text.
pub(super) fn limit_nesting(html: &str) -> Cow<'_, str> {
  // Depth cannot exceed the number of tags.
  if html.matches('<').count() <= MAX_HTML_DEPTH {
    return Cow::Borrowed(html);
  }

  let fragment = Html::parse_fragment(html);
  let root = fragment.root_element();

  let mut depth = 0usize;
  let mut max_depth = 0usize;
  walk(root, |node, _, visit| {
    if node.is_element() {
      match visit {
        Visit::Enter => {
          depth += 1;
          max_depth = max_depth.max(depth);
        }
        Visit::Leave => depth -= 1,
      }
    }
    true
  });

  if max_depth <= MAX_HTML_DEPTH {
    return Cow::Borrowed(html);
  }

  warn!("HTML nested {max_depth} levels deep, flattening below level {MAX_HTML_DEPTH}");
  Cow::Owned(rebuild_flattened(root))
}

fn rebuild_flattened(root: ElementRef<'_>) -> String {
  let mut output = String::new();
  let mut depth = 0usize;

  walk(root, |node, element_ref, visit| {
    match (node, visit) {
      (Node::Element(element), Visit::Enter) => {
        depth += 1;
        if depth > MAX_HTML_DEPTH {
          if let Some(subtree) = element_ref {
            output.push_str(&escape_text(&subtree.text().collect::<String>()));
          }
          return false;
        }

        output.push('<');
        output.push_str(element.name());
        for (name, value) in element.attrs() {
          output.push_str(&format!(r#" {name}="{}""#, escape_attribute(value)));
        }
        output.push('>');
      }
      (Node::Element(element), Visit::Leave) => {
        depth -= 1;
        if depth < MAX_HTML_DEPTH && !VOID_ELEMENTS.contains(&element.name()) {
          output.push_str("</");
          output.push_str(element.name());
          output.push('>');
        }
      }
      (Node::Text(text), Visit::Enter) => output.push_str(&escape_text(text)),
      _ => {}
    }
    true
  });

  output
}

/// Visits every node below `root` in document order without recursion.
///
/// `visit` sees each node on entry and on exit. Returning `false` on entry
/// skips the node's children; the node is still visited on exit.
fn walk<'a>(root: ElementRef<'a>, mut visit: impl FnMut(&'a Node, Option<ElementRef<'a>>, Visit) -> bool) {
  let mut current = root.first_child();

  while let Some(node) = current {
    let descend = visit(node.value(), ElementRef::wrap(node), Visit::Enter);
    if descend && let Some(child) = node.first_child() {
      current = Some(child);
      continue;
    }

    let mut cursor = node;
    current = loop {
      visit(cursor.value(), ElementRef::wrap(cursor), Visit::Leave);
      if let Some(sibling) = cursor.next_sibling() {
        break Some(sibling);
      }
      match cursor.parent() {
        Some(parent) if parent.id() != root.id() => cursor = parent,
        _ => break None,
      }
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nested(tag: &str, levels: usize, inner: &str) -> String {
    format!("{}{inner}{}", format!("<{tag}>").repeat(levels), format!("</{tag}>").repeat(levels))
  }

  #[test]
  fn test_shallow_markup_is_borrowed() {
    let html = "<p>a <strong>b</strong></p>";
    assert!(matches!(limit_nesting(html), Cow::Borrowed(_)));

    let wide = "<p>x</p>".repeat(200);
    assert!(matches!(limit_nesting(&wide), Cow::Borrowed(_)));
  }

  #[test]
  fn test_markup_at_the_limit_is_kept() {
    let html = nested("div", MAX_HTML_DEPTH, "x");
    assert!(matches!(limit_nesting(&html), Cow::Borrowed(_)));
  }

  #[test]
  fn test_deep_markup_is_flattened() {
    let html = nested("div", MAX_HTML_DEPTH + 10, "<em>a &lt; b</em>");
    let limited = limit_nesting(&html);

    assert_eq!(limited.matches("<div>").count(), MAX_HTML_DEPTH);
    assert_eq!(limited.matches("</div>").count(), MAX_HTML_DEPTH);
    assert!(limited.contains("a &lt; b"));
    assert!(!limited.contains("<em>"));
  }

  #[test]
  fn test_siblings_after_flattened_subtree_are_kept() {
    let html = format!(
      "{}<p class=\"after\">tail<br></p>",
      nested("section", MAX_HTML_DEPTH + 1, "deep")
    );
    let limited = limit_nesting(&html);

    assert!(limited.contains("deep"));
    assert!(limited.ends_with(r#"<p class="after">tail<br></p>"#));
  }
}

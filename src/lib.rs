//! Atlassian document conversion library
//!
//! This library converts Jira's Atlassian Document Format (ADF) and
//! Confluence storage format into normalized plain text and GitHub-flavored
//! Markdown. Every conversion is a pure function of its arguments.

pub mod adf;
pub mod format;
pub mod markdown;
pub mod plain_text;

pub use adf::{adf_str_to_plain_text, adf_to_plain_text};
pub use markdown::{
  MarkdownOptions, is_table_convertible, storage_format_to_markdown, storage_format_to_markdown_with_options,
};
pub use plain_text::storage_format_to_plain_text;

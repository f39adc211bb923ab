//! Output format definitions and utilities.

use clap::ValueEnum;

/// Target formats for storage format conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
  /// Normalized plain text
  Text,
  /// GitHub-flavored Markdown (default)
  #[default]
  #[value(alias = "md")]
  Markdown,
}

impl OutputFormat {
  /// Returns the file extension for this output format.
  pub fn file_extension(&self) -> &'static str {
    match self {
      OutputFormat::Text => "txt",
      OutputFormat::Markdown => "md",
    }
  }
}

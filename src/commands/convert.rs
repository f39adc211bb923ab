//! Conversion commands.
//!
//! Implements `atlassian-textify adf` and `atlassian-textify storage`: read a
//! document from a file or stdin, convert it, and write the result to stdout.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use atlassian_textify::format::OutputFormat;
use atlassian_textify::{
  MarkdownOptions, adf_str_to_plain_text, storage_format_to_markdown_with_options, storage_format_to_plain_text,
};
use tracing::{debug, info};

use crate::cli::{InputOptions, OutputOptions};
use crate::color::ColorScheme;

/// Convert an ADF document to plain text.
pub(crate) fn handle_adf_command(input: &InputOptions, colors: &ColorScheme) {
  let result = read_input(input.path().map(|path| path.as_path())).and_then(|raw| {
    let start = Instant::now();
    let text = adf_str_to_plain_text(&raw);
    info!("Converted ADF document in {:?}", start.elapsed());
    write_output(&text)
  });

  exit_on_error(result, input, colors);
}

/// Convert a storage format body to plain text or Markdown.
pub(crate) fn handle_storage_command(input: &InputOptions, output: &OutputOptions, colors: &ColorScheme) {
  let result = read_input(input.path().map(|path| path.as_path())).and_then(|storage| {
    let start = Instant::now();
    let converted = match output.format {
      OutputFormat::Text => storage_format_to_plain_text(Some(&storage)),
      OutputFormat::Markdown => {
        let attachment_paths: HashMap<String, String> = output.attachments.iter().cloned().collect();
        debug!("Using {} attachment path mapping(s)", attachment_paths.len());

        let options = MarkdownOptions {
          compact_tables: output.compact_tables,
          ..Default::default()
        };
        storage_format_to_markdown_with_options(Some(&storage), Some(&attachment_paths), &options)
      }
    };
    info!(
      "Converted storage format to {} in {:?}",
      output.format.file_extension(),
      start.elapsed()
    );
    write_output(&converted)
  });

  exit_on_error(result, input, colors);
}

/// Reads the whole input document from `path`, or from stdin when `None`.
fn read_input(path: Option<&Path>) -> Result<String> {
  match path {
    Some(path) => {
      debug!("Reading input from {}", path.display());
      std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
    None => {
      debug!("Reading input from stdin");
      let mut buffer = String::new();
      io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
      Ok(buffer)
    }
  }
}

fn write_output(text: &str) -> Result<()> {
  let mut stdout = io::stdout().lock();
  writeln!(stdout, "{text}").context("Failed to write output")?;
  stdout.flush().context("Failed to write output")
}

fn exit_on_error(result: Result<()>, input: &InputOptions, colors: &ColorScheme) {
  if let Err(error) = result {
    let source = input
      .path()
      .map_or_else(|| "stdin".to_string(), |path| path.display().to_string());
    eprintln!("{} {}", colors.error("✗"), colors.error("Conversion failed"));
    eprintln!("  {}: {error:#}", colors.path(source));
    process::exit(1);
  }
}

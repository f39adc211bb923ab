//! Command-line interface definitions for atlassian-textify.
//!
//! This module defines the CLI structure using clap derives, with option
//! groups flattened into the subcommands that use them.

use std::path::PathBuf;

use atlassian_textify::format::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// atlassian-textify - Convert Jira and Confluence documents to text
#[derive(Debug, Parser)]
#[command(
  name = "atlassian-textify",
  version,
  about = "Convert Jira ADF and Confluence storage format to plain text or Markdown",
  long_about = "Reads a Jira ADF document or a Confluence storage format body from a file or stdin\n\
                and writes the converted text to stdout.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Convert a Jira ADF JSON document to plain text
  Adf {
    #[command(flatten)]
    input: InputOptions,
  },

  /// Convert a Confluence storage format body to plain text or Markdown
  Storage {
    #[command(flatten)]
    input: InputOptions,

    #[command(flatten)]
    output: OutputOptions,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Input options
#[derive(Debug, Parser)]
pub struct InputOptions {
  /// Input file; `-` or nothing reads stdin
  #[arg(value_name = "INPUT")]
  pub input: Option<PathBuf>,
}

impl InputOptions {
  /// The input path, or `None` for stdin.
  pub fn path(&self) -> Option<&PathBuf> {
    self.input.as_ref().filter(|path| path.as_os_str() != "-")
  }
}

/// Output options for storage format conversion
#[derive(Debug, Parser)]
pub struct OutputOptions {
  /// Output format
  #[arg(short, long, value_enum, default_value = "markdown", env = "TEXTIFY_FORMAT", value_name = "FORMAT")]
  pub format: OutputFormat,

  /// Map an attachment filename to the path images should link to
  /// (repeatable)
  #[arg(short, long = "attachment", value_name = "NAME=PATH", value_parser = parse_attachment)]
  pub attachments: Vec<(String, String)>,

  /// Render Markdown tables without padding columns for alignment
  #[arg(long)]
  pub compact_tables: bool,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN", global = true)]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Shells supported by the completions command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

impl From<Shell> for clap_complete::Shell {
  fn from(shell: Shell) -> Self {
    match shell {
      Shell::Bash => Self::Bash,
      Shell::Zsh => Self::Zsh,
      Shell::Fish => Self::Fish,
      Shell::Powershell => Self::PowerShell,
      Shell::Elvish => Self::Elvish,
    }
  }
}

/// Parses a `NAME=PATH` attachment mapping.
fn parse_attachment(value: &str) -> Result<(String, String), String> {
  let (name, path) = value
    .split_once('=')
    .ok_or_else(|| format!("expected NAME=PATH, got '{value}'"))?;

  if name.trim().is_empty() {
    return Err("attachment name must not be empty".to_string());
  }

  Ok((name.trim().to_string(), path.trim().to_string()))
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if let Command::Storage { output, .. } = &self.command
      && output.format == OutputFormat::Text
    {
      if !output.attachments.is_empty() {
        return Err("--attachment only applies to --format markdown".to_string());
      }
      if output.compact_tables {
        return Err("--compact-tables only applies to --format markdown".to_string());
      }
    }

    Ok(())
  }
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}

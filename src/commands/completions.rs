//! Shell completion scripts.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::debug;

use crate::cli::{Cli, Shell};

/// Write the completion script for `shell` to stdout.
pub(crate) fn handle_completions_command(shell: Shell) {
  debug!("Generating {shell:?} completions");
  write_completions(shell, &mut io::stdout().lock());
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
  let mut cmd = Cli::command();
  let bin_name = cmd.get_name().to_string();
  generate(clap_complete::Shell::from(shell), &mut cmd, bin_name, out);
}

//! `wl completions`: shell completion scripts.

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = std::io::stdout();
    write_completions(shell, command, &mut stdout.lock())
}

/// Write the completion script for `command` under its own binary name.
pub fn write_completions(
    shell: Shell,
    command: &mut clap::Command,
    out: &mut dyn Write,
) -> Result<()> {
    let name = command.get_name().to_string();
    generate(shell, command, name, out);
    out.flush()?;
    Ok(())
}

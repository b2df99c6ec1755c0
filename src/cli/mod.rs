//! Command-line interface layer.

use anyhow::Result;

pub mod args;
pub mod commands;
mod exit_status;

pub use args::{Arguments, Command, MakePotCommand};
pub use exit_status::ExitStatus;

/// Dispatch to the appropriate command handler based on parsed arguments.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::MakePot(cmd)) => commands::make_pot(cmd),
        Some(Command::Init) => commands::init(),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}

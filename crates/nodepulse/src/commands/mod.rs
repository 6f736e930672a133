//! Command handlers and shared helpers.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod nodes;
pub mod settings;
pub mod speedtest;

use nodepulse_core::Panel;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(panel, &args, global).await,
        Command::Logout => auth::logout(panel, global).await,
        Command::Whoami => auth::whoami(panel, global).await,
        Command::Dashboard => dashboard::handle(panel, global).await,
        Command::Nodes(args) => nodes::handle(panel, args.command, global).await,
        Command::Speedtest(args) => speedtest::handle(panel, args.command, global).await,
        Command::Settings(args) => settings::handle(panel, args.command, global).await,
        // Handled in main before a panel exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Restore the persisted session or bail with a login hint.
pub(crate) async fn require_session(panel: &Panel) -> Result<(), CliError> {
    if panel.restore_session().await {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

/// Ask for confirmation unless `--yes` was passed. Declining is not an
/// error — the caller simply performs nothing.
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

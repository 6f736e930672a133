//! Session command handlers: login, logout, whoami.

use std::io::BufRead;

use secrecy::SecretString;

use nodepulse_core::Panel;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

pub async fn login(panel: &Panel, args: &LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(ref name) => name.clone(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CliError::Prompt(e.to_string()))?,
    };

    let password = read_password(args.password_stdin)?;

    panel.login(&username, &password).await?;

    let who = panel
        .current_user()
        .map_or_else(|| username.clone(), |user| user.username.clone());
    output::print_output(&format!("Logged in as {who}"), global.quiet);
    Ok(())
}

fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        return Ok(SecretString::from(trimmed.to_owned()));
    }

    rpassword::prompt_password("Password: ")
        .map(SecretString::from)
        .map_err(|e| CliError::Prompt(e.to_string()))
}

pub async fn logout(panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    super::require_session(panel).await?;
    panel.logout().await?;
    output::print_output("Logged out", global.quiet);
    Ok(())
}

pub async fn whoami(panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    super::require_session(panel).await?;

    let Some(user) = panel.current_user() else {
        return Err(CliError::NotLoggedIn);
    };

    let out = output::render_single(
        &global.output,
        &*user,
        |u| format!("{} ({})", u.username, u.role),
        |u| u.username.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

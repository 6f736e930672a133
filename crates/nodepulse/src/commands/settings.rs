//! Settings command handlers.
//!
//! The settings map is round-tripped wholesale: `set` loads the current
//! map, applies the edits, and PUTs the whole thing back.

use tabled::Tabled;

use nodepulse_core::Panel;

use crate::cli::{GlobalOpts, SettingsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

pub async fn handle(
    panel: &Panel,
    cmd: SettingsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::require_session(panel).await?;

    match cmd {
        SettingsCommand::Show => {
            panel.load_settings().await?;
            let settings = panel.settings_snapshot();
            let entries: Vec<(String, String)> = settings
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let out = output::render_list(
                &global.output,
                &entries,
                |(k, v)| SettingRow {
                    key: k.clone(),
                    value: v.clone(),
                },
                |(k, v)| format!("{k}={v}"),
            );
            output::print_output(&out, global.quiet);
        }

        SettingsCommand::Set { pairs } => {
            panel.load_settings().await?;
            for pair in &pairs {
                let (key, value) = parse_pair(pair)?;
                panel.set_setting(key, value);
            }
            panel.save_settings().await?;
            output::print_output("Settings saved", global.quiet);
        }
    }

    Ok(())
}

fn parse_pair(pair: &str) -> Result<(&str, &str), CliError> {
    pair.split_once('=').ok_or_else(|| CliError::Validation {
        field: "setting".into(),
        reason: format!("expected KEY=VALUE, got '{pair}'"),
    })
}

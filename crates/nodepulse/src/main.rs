mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nodepulse_config::FileStateStore;
use nodepulse_core::{CoreError, Panel, PanelClient, TlsMode, TransportConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a panel connection
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "nodepulse", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the panel
        cmd => {
            let panel = build_panel(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &panel, &cli.global).await
        }
    }
}

/// Build the view-model from the config file plus CLI flag overrides.
fn build_panel(global: &cli::GlobalOpts) -> Result<Panel, CliError> {
    let mut cfg = nodepulse_config::load_config_or_default();
    if let Some(ref url) = global.panel {
        cfg.panel = Some(url.clone());
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }

    let url = nodepulse_config::panel_url(&cfg)?;
    let transport = TransportConfig {
        tls: if cfg.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(cfg.timeout),
    };

    let client = PanelClient::new(url, &transport).map_err(CoreError::from)?;
    Ok(Panel::new(client, FileStateStore::new()))
}

mod app;
mod event;
mod screens;
mod term;
mod theme;
mod widgets;

use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use nodepulse_config::FileStateStore;
use nodepulse_core::{Panel, PanelClient, TlsMode, TransportConfig};

/// nodepulse-tui -- terminal panel for a node speed-testing system
#[derive(Debug, Parser)]
#[command(name = "nodepulse-tui", version, about)]
struct Args {
    /// Panel base URL (overrides the config file)
    #[arg(long, short = 'p', env = "NODEPULSE_PANEL")]
    panel: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NODEPULSE_INSECURE")]
    insecure: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    term::install_hooks()?;
    init_logging();

    let panel = build_panel(&args)?;
    app::App::new(panel).run().await
}

/// Log to a file — stdout belongs to the UI.
fn init_logging() {
    let Some(dir) = nodepulse_config::state_path().parent().map(std::path::Path::to_path_buf)
    else {
        return;
    };
    let appender = tracing_appender::rolling::never(dir, "nodepulse-tui.log");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(appender)
        .with_ansi(false)
        .init();
}

fn build_panel(args: &Args) -> Result<Panel> {
    let mut cfg = nodepulse_config::load_config_or_default();
    if let Some(ref url) = args.panel {
        cfg.panel = Some(url.clone());
    }
    if args.insecure {
        cfg.insecure = true;
    }

    let url = nodepulse_config::panel_url(&cfg).map_err(|err| {
        eyre!("{err}\nPass --panel <URL>, set NODEPULSE_PANEL, or configure `panel` in the config file")
    })?;

    let transport = TransportConfig {
        tls: if cfg.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(cfg.timeout),
    };

    let client = PanelClient::new(url, &transport).map_err(|err| eyre!("{err}"))?;
    Ok(Panel::new(client, FileStateStore::new()))
}

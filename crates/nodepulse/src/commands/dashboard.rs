//! Dashboard command: stats summary, node table, recent results.

use owo_colors::OwoColorize;
use serde::Serialize;

use nodepulse_core::{
    Node, PanelStats, SpeedTestResult, Panel, format_date, format_ping, format_speed, node_name,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// How many recent results the dashboard shows.
const RECENT_RESULTS: usize = 5;

#[derive(Serialize)]
struct DashboardView<'a> {
    stats: &'a PanelStats,
    nodes: &'a [Node],
    recent_results: &'a [SpeedTestResult],
}

pub async fn handle(panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    super::require_session(panel).await?;

    panel.load_dashboard().await?;

    let stats = panel.stats_snapshot();
    let nodes = panel.nodes_snapshot();
    let results = panel.results_snapshot();
    let recent = &results[..results.len().min(RECENT_RESULTS)];

    let out = match global.output {
        OutputFormat::Table => {
            render_text(&stats, &nodes, recent, output::should_color(&global.color))
        }
        OutputFormat::Plain => format!(
            "nodes={} online={} offline={} tests_today={} tests_total={}",
            stats.total_nodes,
            stats.online_nodes,
            stats.offline_nodes,
            stats.today_tests,
            stats.total_tests
        ),
        ref format => {
            let view = DashboardView {
                stats: &stats,
                nodes: &nodes,
                recent_results: recent,
            };
            match format {
                OutputFormat::Json => output::render_json_pretty(&view),
                OutputFormat::JsonCompact => output::render_json_compact(&view),
                _ => output::render_yaml(&view),
            }
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_text(
    stats: &PanelStats,
    nodes: &[Node],
    recent: &[SpeedTestResult],
    color: bool,
) -> String {
    let mut out = String::new();

    let online = if color {
        format!("{}", stats.online_nodes.green())
    } else {
        stats.online_nodes.to_string()
    };
    let offline = if color {
        format!("{}", stats.offline_nodes.red())
    } else {
        stats.offline_nodes.to_string()
    };

    out.push_str(&format!(
        "Nodes: {} total, {online} online, {offline} offline\n",
        stats.total_nodes
    ));
    out.push_str(&format!(
        "Tests: {} today, {} total\n",
        stats.today_tests, stats.total_tests
    ));
    out.push_str(&format!(
        "Panel: cpu {:.0}%  mem {:.0}%  disk {:.0}%\n",
        stats.cpu_usage, stats.memory_usage, stats.disk_usage
    ));

    if !recent.is_empty() {
        out.push_str("\nRecent tests:\n");
        for result in recent {
            out.push_str(&format!(
                "  {} -> {}  [{}] {}  down {}  ping {}  {}\n",
                node_name(nodes, &result.source_node_id),
                node_name(nodes, &result.target_node_id),
                result.kind.as_str(),
                result.status.as_str(),
                format_speed(result.download_speed),
                format_ping(result.ping),
                format_date(result.start_time),
            ));
        }
    }

    out.trim_end().to_owned()
}

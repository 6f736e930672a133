//! Speed-test command handlers.

use tabled::Tabled;

use nodepulse_core::{
    Node, Panel, ResultsQuery, SpeedTestRequest, SpeedTestResult, format_date, format_ping,
    format_speed, node_name,
};

use crate::cli::{GlobalOpts, SpeedtestCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SOURCE")]
    source: String,
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "DOWN")]
    download: String,
    #[tabled(rename = "UP")]
    upload: String,
    #[tabled(rename = "PING")]
    ping: String,
    #[tabled(rename = "STARTED")]
    started: String,
}

fn to_row(result: &SpeedTestResult, nodes: &[Node]) -> ResultRow {
    ResultRow {
        id: result.id.clone(),
        source: node_name(nodes, &result.source_node_id),
        target: node_name(nodes, &result.target_node_id),
        kind: result.kind.as_str().to_owned(),
        status: result.status.as_str().to_owned(),
        download: format_speed(result.download_speed),
        upload: format_speed(result.upload_speed),
        ping: format_ping(result.ping),
        started: format_date(result.start_time),
    }
}

fn detail(result: &SpeedTestResult) -> String {
    let mut lines = vec![
        format!("Id:        {}", result.id),
        format!("Source:    {}", result.source_node_id),
        format!("Target:    {}", result.target_node_id),
        format!("Type:      {}", result.kind.as_str()),
        format!("Status:    {}", result.status.as_str()),
        format!("Started:   {}", format_date(result.start_time)),
        format!("Finished:  {}", format_date(result.end_time)),
        format!("Download:  {}", format_speed(result.download_speed)),
        format!("Upload:    {}", format_speed(result.upload_speed)),
        format!("Ping:      {}", format_ping(result.ping)),
        format!("Jitter:    {}", format_ping(result.jitter)),
    ];
    if let Some(loss) = result.packet_loss {
        lines.push(format!("Loss:      {loss:.2}%"));
    }
    if !result.error_message.is_empty() {
        lines.push(format!("Error:     {}", result.error_message));
    }
    lines.join("\n")
}

pub async fn handle(
    panel: &Panel,
    cmd: SpeedtestCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::require_session(panel).await?;

    match cmd {
        SpeedtestCommand::Run {
            source,
            target,
            kind,
        } => {
            let ticket = panel
                .start_test(SpeedTestRequest {
                    source_node_id: source,
                    target_node_id: target,
                    kind: kind.into(),
                })
                .await?;
            output::print_output(
                &format!("Speed test {} queued; check results shortly", ticket.id),
                global.quiet,
            );
        }

        SpeedtestCommand::Results {
            node,
            page,
            page_size,
        } => {
            // Node names resolve from the node list; a failed load just
            // leaves raw ids in the table.
            let _ = panel.load_nodes().await;
            let nodes = panel.nodes_snapshot();

            let query = ResultsQuery {
                page,
                page_size,
                node_id: node,
            };
            let results = panel.results_page(&query).await?;

            let out = output::render_list(
                &global.output,
                &results.results,
                |r| to_row(r, &nodes),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
        }

        SpeedtestCommand::Get { id } => {
            let result = panel.get_result(&id).await?;
            let out = output::render_single(&global.output, &result, detail, |r| r.id.clone());
            output::print_output(&out, global.quiet);
        }
    }

    Ok(())
}

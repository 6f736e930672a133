//! Node command handlers.

use serde::Serialize;
use tabled::Tabled;

use nodepulse_core::{
    Node, NodeDraft, NodeFormMode, Panel, format_date, node_status_tone,
};

use crate::cli::{GlobalOpts, NodesCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "LOCATION")]
    location: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TAGS")]
    tags: String,
    #[tabled(rename = "LAST SEEN")]
    last_seen: String,
}

fn to_row(node: &Node) -> NodeRow {
    NodeRow {
        name: node.name.clone(),
        ip: node.ip.clone(),
        location: node.location.clone(),
        status: node.status.as_str().to_owned(),
        tags: node.tags.join(","),
        last_seen: format_date(node.last_seen),
    }
}

fn detail(node: &Node) -> String {
    let mut lines = vec![
        format!("Id:          {}", node.id),
        format!("Name:        {}", node.name),
        format!("IP:          {}", node.ip),
        format!("Location:    {}", node.location),
        format!("Description: {}", node.description),
        format!("Tags:        {}", node.tags.join(", ")),
        format!(
            "Status:      {} ({:?})",
            node.status.as_str(),
            node_status_tone(node.status)
        ),
        format!("Last seen:   {}", format_date(node.last_seen)),
        format!("Created:     {}", format_date(node.created_at)),
    ];
    if node.uptime > 0 {
        lines.push(format!(
            "System:      cpu {:.1}%  mem {:.1}%  disk {:.1}%  load {:.2}/{:.2}/{:.2}",
            node.cpu, node.memory, node.disk, node.load[0], node.load[1], node.load[2]
        ));
        lines.push(format!("Uptime:      {}s", node.uptime));
    }
    if !node.version.is_empty() {
        lines.push(format!("Agent:       v{}", node.version));
    }
    lines.join("\n")
}

pub async fn handle(panel: &Panel, cmd: NodesCommand, global: &GlobalOpts) -> Result<(), CliError> {
    super::require_session(panel).await?;

    match cmd {
        NodesCommand::List => {
            panel.load_nodes().await?;
            let nodes = panel.nodes_snapshot();
            let out = output::render_list(&global.output, &nodes, to_row, |n| n.id.clone());
            output::print_output(&out, global.quiet);
        }

        NodesCommand::Get { id } => {
            let node = panel.get_node(&id).await?;
            let out = output::render_single(&global.output, &node, detail, |n| n.id.clone());
            output::print_output(&out, global.quiet);
        }

        NodesCommand::Add {
            name,
            ip,
            location,
            description,
            tags,
        } => {
            let draft = NodeDraft {
                id: String::new(),
                name: name.clone(),
                ip,
                location,
                description,
                tags,
            };
            panel.submit_node(NodeFormMode::Add, &draft).await?;
            output::print_output(&format!("Node '{name}' registered"), global.quiet);
        }

        NodesCommand::Edit {
            id,
            name,
            ip,
            location,
            description,
            tags,
        } => {
            // Pre-populate from the existing node, exactly like the edit
            // form; the PUT routing comes from the Edit mode, not the id.
            let node = panel.get_node(&id).await?;
            let draft = NodeDraft {
                id: node.id.clone(),
                name: name.unwrap_or(node.name),
                ip: ip.unwrap_or(node.ip),
                location: location.unwrap_or(node.location),
                description: description.unwrap_or(node.description),
                tags: tags.unwrap_or(node.tags),
            };
            panel.submit_node(NodeFormMode::Edit, &draft).await?;
            output::print_output(&format!("Node {id} updated"), global.quiet);
        }

        NodesCommand::Delete { id } => {
            if !super::confirm(&format!("Delete node {id}?"), global.yes)? {
                output::print_output("Aborted", global.quiet);
                return Ok(());
            }
            panel.delete_node(&id).await?;
            output::print_output(&format!("Node {id} deleted"), global.quiet);
        }

        NodesCommand::InstallCommand { id } => {
            let command = panel.generate_install_command(&id).await?;
            print_install_command(&command, global);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct InstallCommandView<'a> {
    command: &'a str,
    node_key: &'a str,
    panel_url: &'a str,
}

fn print_install_command(cmd: &nodepulse_core::InstallCommand, global: &GlobalOpts) {
    let view = InstallCommandView {
        command: &cmd.command,
        node_key: &cmd.node_key,
        panel_url: &cmd.panel_url,
    };
    let out = match global.output {
        // Table mode gets a short explanation; plain emits just the command
        // so it can be piped straight to a shell.
        OutputFormat::Table => format!(
            "Run this on the new node:\n\n  {}\n\nNode key: {}",
            cmd.command, cmd.node_key
        ),
        OutputFormat::Plain => cmd.command.clone(),
        OutputFormat::Json => output::render_json_pretty(&view),
        OutputFormat::JsonCompact => output::render_json_compact(&view),
        OutputFormat::Yaml => output::render_yaml(&view),
    };
    output::print_output(&out, global.quiet);
}

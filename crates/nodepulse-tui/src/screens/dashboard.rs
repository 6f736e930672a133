//! Dashboard page: aggregate stats, node overview, recent results.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use nodepulse_core::{
    Node, PanelStats, SpeedTestResult, format_date, format_ping, format_speed, node_name,
    node_status_tone, test_status_tone,
};

use crate::theme::Theme;
use crate::widgets::pct_bar;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    stats: &PanelStats,
    nodes: &[Node],
    results: &[SpeedTestResult],
) {
    let layout = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(5),
        Constraint::Length(9),
    ])
    .split(area);

    render_stats(frame, layout[0], theme, stats);
    render_nodes(frame, layout[1], theme, nodes);
    render_recent(frame, layout[2], theme, nodes, results);
}

fn render_stats(frame: &mut Frame, area: Rect, theme: &Theme, stats: &PanelStats) {
    let block = Block::default()
        .title(" Overview ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let counts = Line::from(vec![
        Span::styled("  Nodes ", theme.key_hint()),
        Span::styled(stats.total_nodes.to_string(), theme.table_row()),
        Span::styled("   online ", theme.key_hint()),
        Span::styled(
            stats.online_nodes.to_string(),
            Style::default().fg(theme.ok),
        ),
        Span::styled("   offline ", theme.key_hint()),
        Span::styled(
            stats.offline_nodes.to_string(),
            Style::default().fg(theme.danger),
        ),
        Span::styled("   tests today ", theme.key_hint()),
        Span::styled(stats.today_tests.to_string(), theme.table_row()),
        Span::styled("   total ", theme.key_hint()),
        Span::styled(stats.total_tests.to_string(), theme.table_row()),
    ]);

    let mut lines = vec![Line::from(""), counts, Line::from("")];
    for (label, pct) in [
        ("cpu ", stats.cpu_usage),
        ("mem ", stats.memory_usage),
        ("disk", stats.disk_usage),
    ] {
        let (filled, empty) = pct_bar(pct, 24);
        lines.push(Line::from(vec![
            Span::styled(format!("  {label} "), theme.key_hint()),
            Span::styled(filled, Style::default().fg(theme.accent)),
            Span::styled(empty, theme.key_hint()),
            Span::styled(format!(" {pct:>3.0}%"), theme.table_row()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_nodes(frame: &mut Frame, area: Rect, theme: &Theme, nodes: &[Node]) {
    let block = Block::default()
        .title(" Nodes ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if nodes.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  no nodes registered",
                theme.key_hint(),
            ))),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = nodes
        .iter()
        .take(usize::from(inner.height))
        .map(|node| {
            let tone = theme.tone(node_status_tone(node.status));
            Line::from(vec![
                Span::styled("  ● ", Style::default().fg(tone)),
                Span::styled(format!("{:<20}", node.name), theme.table_row()),
                Span::styled(format!("{:<16}", node.ip), theme.key_hint()),
                Span::styled(format!("{:<12}", node.location), theme.key_hint()),
                Span::styled(node.status.as_str(), Style::default().fg(tone)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_recent(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    nodes: &[Node],
    results: &[SpeedTestResult],
) {
    let block = Block::default()
        .title(" Recent tests ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if results.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  no results yet",
                theme.key_hint(),
            ))),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = results
        .iter()
        .take(usize::from(inner.height))
        .map(|result| {
            let tone = theme.tone(test_status_tone(result.status));
            Line::from(vec![
                Span::styled(
                    format!(
                        "  {} -> {} ",
                        node_name(nodes, &result.source_node_id),
                        node_name(nodes, &result.target_node_id)
                    ),
                    theme.table_row(),
                ),
                Span::styled(format!("[{:<9}] ", result.status.as_str()), Style::default().fg(tone)),
                Span::styled(
                    format!(
                        "down {}  ping {}  {}",
                        format_speed(result.download_speed),
                        format_ping(result.ping),
                        format_date(result.start_time)
                    ),
                    theme.key_hint(),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

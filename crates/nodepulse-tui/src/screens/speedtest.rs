//! Speedtest page: result table plus the test launcher popup.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use nodepulse_core::{
    Node, SpeedTestRequest, SpeedTestResult, format_date, format_ping, format_speed, node_name,
    test_status_tone,
};

use crate::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    nodes: &[Node],
    results: &[SpeedTestResult],
    selected: usize,
) {
    let block = Block::default()
        .title(" Speed tests ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused_style());

    let header = Row::new(vec![
        Cell::from("Source").style(theme.table_header()),
        Cell::from("Target").style(theme.table_header()),
        Cell::from("Type").style(theme.table_header()),
        Cell::from("Status").style(theme.table_header()),
        Cell::from("Down").style(theme.table_header()),
        Cell::from("Up").style(theme.table_header()),
        Cell::from("Ping").style(theme.table_header()),
        Cell::from("Started").style(theme.table_header()),
    ]);

    let rows: Vec<Row> = results
        .iter()
        .map(|result| {
            let tone = theme.tone(test_status_tone(result.status));
            Row::new(vec![
                Cell::from(node_name(nodes, &result.source_node_id)).style(theme.table_row()),
                Cell::from(node_name(nodes, &result.target_node_id)).style(theme.table_row()),
                Cell::from(result.kind.as_str()),
                Cell::from(result.status.as_str()).style(Style::default().fg(tone)),
                Cell::from(format_speed(result.download_speed)),
                Cell::from(format_speed(result.upload_speed)),
                Cell::from(format_ping(result.ping)),
                Cell::from(format_date(result.start_time)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.table_selected());

    let mut state = TableState::default();
    if !results.is_empty() {
        state.select(Some(selected.min(results.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// The launcher popup shown over the page while a test form is open.
pub fn render_launcher(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    nodes: &[Node],
    form: &SpeedTestRequest,
) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 9u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let box_area = Rect::new(x, y, width, height);

    frame.render_widget(ratatui::widgets::Clear, box_area);

    let block = Block::default()
        .title(" Launch speed test ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused_style());
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Source ", theme.key_hint()),
            Span::styled(node_name(nodes, &form.source_node_id), theme.table_row()),
        ]),
        Line::from(vec![
            Span::styled("  Target ", theme.key_hint()),
            Span::styled(node_name(nodes, &form.target_node_id), theme.table_row()),
        ]),
        Line::from(vec![
            Span::styled("  Type   ", theme.key_hint()),
            Span::styled(form.kind.as_str(), theme.table_row()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  s", theme.key_hint_key()),
            Span::styled("/", theme.key_hint()),
            Span::styled("t", theme.key_hint_key()),
            Span::styled(" cycle nodes  ", theme.key_hint()),
            Span::styled("y", theme.key_hint_key()),
            Span::styled(" type  ", theme.key_hint()),
            Span::styled("Enter", theme.key_hint_key()),
            Span::styled(" start  ", theme.key_hint()),
            Span::styled("Esc", theme.key_hint_key()),
            Span::styled(" cancel", theme.key_hint()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

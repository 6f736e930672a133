//! Nodes page: selectable table of managed nodes.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use nodepulse_core::{Node, format_date, node_status_tone};

use crate::theme::Theme;
use crate::widgets::fmt_uptime;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, nodes: &[Node], selected: usize) {
    let block = Block::default()
        .title(" Nodes ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused_style());

    let header = Row::new(vec![
        Cell::from("St").style(theme.table_header()),
        Cell::from("Name").style(theme.table_header()),
        Cell::from("IP").style(theme.table_header()),
        Cell::from("Location").style(theme.table_header()),
        Cell::from("Tags").style(theme.table_header()),
        Cell::from("CPU").style(theme.table_header()),
        Cell::from("Up").style(theme.table_header()),
        Cell::from("Last seen").style(theme.table_header()),
    ]);

    let rows: Vec<Row> = nodes
        .iter()
        .map(|node| {
            let tone = theme.tone(node_status_tone(node.status));
            Row::new(vec![
                Cell::from("●").style(Style::default().fg(tone)),
                Cell::from(node.name.clone()).style(theme.table_row()),
                Cell::from(node.ip.clone()),
                Cell::from(node.location.clone()),
                Cell::from(node.tags.join(",")),
                Cell::from(format!("{:.0}%", node.cpu)),
                Cell::from(fmt_uptime(node.uptime)),
                Cell::from(format_date(node.last_seen)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(14),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.table_selected());

    let mut state = TableState::default();
    if !nodes.is_empty() {
        state.select(Some(selected.min(nodes.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

//! Settings page: the flat key/value map, read-only in the TUI.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
};

use nodepulse_core::Settings;

use crate::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, settings: &Settings) {
    let layout = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let block = Block::default()
        .title(" Settings ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused_style());

    let header = Row::new(vec![
        Cell::from("Key").style(theme.table_header()),
        Cell::from("Value").style(theme.table_header()),
    ]);

    let rows: Vec<Row> = settings
        .iter()
        .map(|(key, value)| {
            Row::new(vec![
                Cell::from(key.clone()).style(theme.table_row()),
                Cell::from(value.clone()),
            ])
        })
        .collect();

    let widths = [Constraint::Min(24), Constraint::Min(16)];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, layout[0]);

    let hint = Line::from(vec![
        Span::styled(" edit with ", theme.key_hint()),
        Span::styled("nodepulse settings set KEY=VALUE", theme.key_hint_key()),
    ]);
    frame.render_widget(Paragraph::new(hint), layout[1]);
}

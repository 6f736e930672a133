//! Login page: a two-field form rendered centered on screen.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::theme::Theme;

/// Which input currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login form state owned by the app.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
}

impl LoginForm {
    /// Route a typed character into the focused field.
    pub fn push(&mut self, c: char) {
        match self.field {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    /// Backspace in the focused field.
    pub fn pop(&mut self) {
        match self.field {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Move focus to the other field.
    pub fn next_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    form: &LoginForm,
    error: Option<&str>,
    busy: bool,
) {
    let width = 48u16.min(area.width.saturating_sub(4));
    let height = 11u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let box_area = Rect::new(x, y, width, height);

    let block = Block::default()
        .title(" nodepulse · sign in ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused_style());

    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let rows = Layout::vertical([
        Constraint::Length(1), // spacer
        Constraint::Length(1), // username
        Constraint::Length(1), // spacer
        Constraint::Length(1), // password
        Constraint::Length(1), // spacer
        Constraint::Length(1), // error / busy
        Constraint::Min(0),
        Constraint::Length(1), // hints
    ])
    .split(inner);

    let field_style = |focused: bool| {
        if focused {
            theme.border_focused_style()
        } else {
            theme.key_hint()
        }
    };

    let username = Line::from(vec![
        Span::styled(
            "  Username ",
            field_style(form.field == LoginField::Username),
        ),
        Span::styled(form.username.as_str(), theme.table_row()),
        cursor_span(theme, form.field == LoginField::Username),
    ]);
    frame.render_widget(Paragraph::new(username), rows[1]);

    let masked = "•".repeat(form.password.chars().count());
    let password = Line::from(vec![
        Span::styled(
            "  Password ",
            field_style(form.field == LoginField::Password),
        ),
        Span::styled(masked, theme.table_row()),
        cursor_span(theme, form.field == LoginField::Password),
    ]);
    frame.render_widget(Paragraph::new(password), rows[3]);

    if busy {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("  signing in...", theme.key_hint()))),
            rows[5],
        );
    } else if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {error}"),
                ratatui::style::Style::default().fg(theme.danger),
            ))),
            rows[5],
        );
    }

    let hints = Line::from(vec![
        Span::styled("  Tab ", theme.key_hint_key()),
        Span::styled("switch field  ", theme.key_hint()),
        Span::styled("Enter ", theme.key_hint_key()),
        Span::styled("sign in  ", theme.key_hint()),
        Span::styled("q ", theme.key_hint_key()),
        Span::styled("quit", theme.key_hint()),
    ]);
    frame.render_widget(Paragraph::new(hints), rows[7]);
}

fn cursor_span(theme: &Theme, focused: bool) -> Span<'static> {
    if focused {
        Span::styled("▏", theme.border_focused_style())
    } else {
        Span::raw("")
    }
}

//! Application core — event loop, key dispatch, popup management.
//!
//! The app owns interaction state only (selections, the login form, open
//! popups); everything the panel knows lives in the `Panel` view-model and
//! is read back through its snapshots each frame. Actions run on spawned
//! tasks so the UI never blocks on the network; failures from
//! user-initiated actions come back over a message channel and render as a
//! blocking alert popup, while page loads stay silent.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use secrecy::SecretString;
use tokio::sync::mpsc;
use tracing::info;

use nodepulse_core::{Page, Panel, TestKind};

use crate::event::{Event, EventReader};
use crate::screens;
use crate::screens::login::LoginForm;
use crate::term::Term;
use crate::theme::Theme;

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

/// Feedback from spawned actions back to the UI loop.
enum AppMsg {
    /// Blocking error popup (user-initiated action failed).
    Alert(String),
    /// Blocking notice popup (e.g. "test queued").
    Notice(String),
}

/// A popup awaiting dismissal or confirmation.
enum Popup {
    Alert { title: &'static str, text: String },
    ConfirmDelete { node_id: String, node_name: String },
}

pub struct App {
    panel: Panel,
    running: bool,
    login: LoginForm,
    popup: Option<Popup>,
    nodes_selected: usize,
    results_selected: usize,
    spinner: usize,
    msg_tx: mpsc::UnboundedSender<AppMsg>,
    msg_rx: mpsc::UnboundedReceiver<AppMsg>,
}

impl App {
    pub fn new(panel: Panel) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            panel,
            running: true,
            login: LoginForm::default(),
            popup: None,
            nodes_selected: 0,
            results_selected: 0,
            spinner: 0,
            msg_tx,
            msg_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut term = Term::new()?;
        term.enter()?;

        // Restore a prior session in the background; the login page shows
        // until (and unless) it succeeds.
        {
            let panel = self.panel.clone();
            tokio::spawn(async move {
                panel.bootstrap().await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(50),  // 20 FPS render
        );

        info!("panel TUI started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => self.handle_key(key),
                Event::Tick => {
                    if self.panel.is_busy() {
                        self.spinner = (self.spinner + 1) % SPINNER.len();
                    }
                }
                Event::Render => {
                    self.drain_messages();
                    term.draw(|frame| self.render(frame))?;
                }
                Event::Resize(_, _) => {}
            }
        }

        events.stop();
        info!("panel TUI stopped");
        Ok(())
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.popup = Some(match msg {
                AppMsg::Alert(text) => Popup::Alert {
                    title: " Error ",
                    text,
                },
                AppMsg::Notice(text) => Popup::Alert {
                    title: " Notice ",
                    text,
                },
            });
        }
    }

    // ── Key dispatch ─────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        // Popups swallow all input until dismissed.
        if self.popup.is_some() {
            self.handle_popup_key(key);
            return;
        }

        // The install-command overlay behaves like a popup.
        if self.panel.install_command().borrow().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.panel.dismiss_install_command();
            }
            return;
        }

        // The speed-test launcher captures its own keys while open.
        if self.panel.speedtest_form().borrow().is_some() {
            self.handle_launcher_key(key);
            return;
        }

        if self.panel.current_page() == Page::Login {
            self.handle_login_key(key);
            return;
        }

        self.handle_page_key(key);
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        match popup {
            Popup::Alert { .. } => {
                // Any of Esc/Enter dismisses; other keys keep it up.
                if !matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.popup = Some(popup);
                }
            }
            Popup::ConfirmDelete { node_id, node_name } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let panel = self.panel.clone();
                    let tx = self.msg_tx.clone();
                    tokio::spawn(async move {
                        match panel.delete_node(&node_id).await {
                            Ok(()) => {
                                let _ = tx.send(AppMsg::Notice(format!("Node {node_name} deleted")));
                            }
                            Err(err) => {
                                let _ = tx.send(AppMsg::Alert(err.to_string()));
                            }
                        }
                    });
                }
                KeyCode::Char('n') | KeyCode::Esc => {}
                _ => self.popup = Some(Popup::ConfirmDelete { node_id, node_name }),
            },
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::BackTab => self.login.next_field(),
            KeyCode::Backspace => self.login.pop(),
            KeyCode::Enter => {
                let username = self.login.username.trim().to_owned();
                if username.is_empty() {
                    return;
                }
                let password = SecretString::from(self.login.password.clone());
                let panel = self.panel.clone();
                tokio::spawn(async move {
                    // Failures surface through the login_error cell.
                    let _ = panel.login(&username, &password).await;
                });
            }
            KeyCode::Char(c) => self.login.push(c),
            _ => {}
        }
    }

    fn handle_launcher_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.panel.close_speedtest_form(),
            KeyCode::Char('s') => self.cycle_form_node(true),
            KeyCode::Char('t') => self.cycle_form_node(false),
            KeyCode::Char('y') => self.panel.update_speedtest_form(|form| {
                form.kind = match form.kind {
                    TestKind::Full => TestKind::Download,
                    TestKind::Download => TestKind::Upload,
                    TestKind::Upload => TestKind::Ping,
                    TestKind::Ping => TestKind::Full,
                };
            }),
            KeyCode::Enter => {
                let panel = self.panel.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    match panel.start_test_from_form().await {
                        Ok(ticket) => {
                            let _ = tx.send(AppMsg::Notice(format!(
                                "Speed test {} queued; results will refresh shortly",
                                ticket.id
                            )));
                        }
                        Err(err) => {
                            let _ = tx.send(AppMsg::Alert(err.to_string()));
                        }
                    }
                });
            }
            _ => {}
        }
    }

    fn cycle_form_node(&self, source: bool) {
        let nodes = self.panel.nodes_snapshot();
        if nodes.is_empty() {
            return;
        }
        self.panel.update_speedtest_form(|form| {
            let current = if source {
                &mut form.source_node_id
            } else {
                &mut form.target_node_id
            };
            let idx = nodes.iter().position(|n| n.id == *current).unwrap_or(0);
            *current = nodes[(idx + 1) % nodes.len()].id.clone();
        });
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.running = false,

            KeyCode::Char(c @ '1'..='4') => {
                let idx = usize::from(c as u8 - b'1');
                self.spawn_goto(Page::TABS[idx]);
            }
            KeyCode::Tab => {
                let current = self.panel.current_page();
                let idx = Page::TABS.iter().position(|&p| p == current).unwrap_or(0);
                self.spawn_goto(Page::TABS[(idx + 1) % Page::TABS.len()]);
            }

            KeyCode::Char('d') => self.panel.toggle_dark_mode(),
            KeyCode::Char('r') => self.spawn_goto(self.panel.current_page()),

            KeyCode::Char('L') => {
                let panel = self.panel.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = panel.logout().await {
                        let _ = tx.send(AppMsg::Alert(err.to_string()));
                    }
                });
            }

            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),

            // Page-specific actions
            KeyCode::Char('t') if self.panel.current_page() == Page::Speedtest => {
                self.panel.open_speedtest_form();
            }
            KeyCode::Char('i') if self.panel.current_page() == Page::Nodes => {
                if let Some(node) = self.selected_node() {
                    let panel = self.panel.clone();
                    let tx = self.msg_tx.clone();
                    tokio::spawn(async move {
                        if let Err(err) = panel.generate_install_command(&node).await {
                            let _ = tx.send(AppMsg::Alert(err.to_string()));
                        }
                    });
                }
            }
            KeyCode::Char('x') | KeyCode::Delete
                if self.panel.current_page() == Page::Nodes =>
            {
                let nodes = self.panel.nodes_snapshot();
                if let Some(node) = nodes.get(self.nodes_selected) {
                    self.popup = Some(Popup::ConfirmDelete {
                        node_id: node.id.clone(),
                        node_name: node.name.clone(),
                    });
                }
            }

            _ => {}
        }
    }

    fn selected_node(&self) -> Option<String> {
        self.panel
            .nodes_snapshot()
            .get(self.nodes_selected)
            .map(|n| n.id.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.panel.current_page() {
            Page::Nodes => (&mut self.nodes_selected, self.panel.nodes_snapshot().len()),
            Page::Speedtest => (
                &mut self.results_selected,
                self.panel.results_snapshot().len(),
            ),
            _ => return,
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let max = len - 1;
        *selected = selected
            .saturating_add_signed(delta)
            .min(max);
    }

    fn spawn_goto(&self, page: Page) {
        let panel = self.panel.clone();
        tokio::spawn(async move {
            panel.goto(page).await;
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let theme = Theme::for_mode(self.panel.is_dark_mode());
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
            area,
        );

        let page = self.panel.current_page();

        if page == Page::Login {
            let error = self.panel.login_error().borrow().clone();
            screens::login::render(
                frame,
                area,
                &theme,
                &self.login,
                error.as_deref(),
                self.panel.is_busy(),
            );
            return;
        }

        let layout = Layout::vertical([
            Constraint::Min(1),    // page content
            Constraint::Length(1), // tab bar
            Constraint::Length(1), // status bar
        ])
        .split(area);

        match page {
            Page::Dashboard => screens::dashboard::render(
                frame,
                layout[0],
                &theme,
                &self.panel.stats_snapshot(),
                &self.panel.nodes_snapshot(),
                &self.panel.results_snapshot(),
            ),
            Page::Nodes => screens::nodes::render(
                frame,
                layout[0],
                &theme,
                &self.panel.nodes_snapshot(),
                self.nodes_selected,
            ),
            Page::Speedtest => screens::speedtest::render(
                frame,
                layout[0],
                &theme,
                &self.panel.nodes_snapshot(),
                &self.panel.results_snapshot(),
                self.results_selected,
            ),
            Page::Settings => screens::settings::render(
                frame,
                layout[0],
                &theme,
                &self.panel.settings_snapshot(),
            ),
            Page::Login => {}
        }

        self.render_tab_bar(frame, layout[1], &theme, page);
        self.render_status_bar(frame, layout[2], &theme);

        // Overlays, innermost last.
        if let Some(form) = self.panel.speedtest_form().borrow().as_ref() {
            screens::speedtest::render_launcher(
                frame,
                area,
                &theme,
                &self.panel.nodes_snapshot(),
                form,
            );
        }
        if let Some(command) = self.panel.install_command().borrow().as_ref() {
            self.render_install_popup(frame, area, &theme, &command.command);
        }
        if let Some(ref popup) = self.popup {
            self.render_popup(frame, area, &theme, popup);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme, page: Page) {
        let titles: Vec<Line> = Page::TABS
            .iter()
            .enumerate()
            .map(|(i, &tab)| {
                let style = if tab == page {
                    theme.tab_active()
                } else {
                    theme.tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, tab.title()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme.key_hint()))
            .select(Page::TABS.iter().position(|&p| p == page).unwrap_or(0));

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let busy = if self.panel.is_busy() {
            Span::styled(
                format!(" {} loading", SPINNER[self.spinner]),
                Style::default().fg(theme.warn),
            )
        } else {
            Span::styled(" ● ready", Style::default().fg(theme.ok))
        };

        let user = self
            .panel
            .current_user()
            .map(|u| u.username.clone())
            .unwrap_or_default();

        let hints = Span::styled(
            " │ 1-4 pages  r reload  d theme  L logout  q quit",
            theme.key_hint(),
        );

        let line = Line::from(vec![
            busy,
            Span::styled(format!("  {user}"), theme.key_hint()),
            hints,
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect, theme: &Theme, popup: &Popup) {
        let (title, text, hint) = match popup {
            Popup::Alert { title, text } => (*title, text.clone(), "Enter/Esc to dismiss"),
            Popup::ConfirmDelete { node_name, .. } => (
                " Confirm ",
                format!("Delete node '{node_name}'?"),
                "y confirm · n cancel",
            ),
        };
        self.render_message_box(frame, area, theme, title, &text, hint);
    }

    fn render_install_popup(&self, frame: &mut Frame, area: Rect, theme: &Theme, command: &str) {
        self.render_message_box(
            frame,
            area,
            theme,
            " Install command ",
            command,
            "Enter/Esc to dismiss",
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_message_box(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        title: &str,
        text: &str,
        hint: &str,
    ) {
        let width = 60u16.min(area.width.saturating_sub(4));
        let text_width = usize::from(width.saturating_sub(4)).max(1);
        let wrapped_lines = (text.chars().count() / text_width + 1) as u16;
        let height = (wrapped_lines + 4).min(area.height.saturating_sub(2));

        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let box_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, box_area);

        let block = Block::default()
            .title(title)
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_focused_style());
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        frame.render_widget(
            Paragraph::new(text.to_owned()).wrap(ratatui::widgets::Wrap { trim: false }),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, theme.key_hint()))).centered(),
            rows[1],
        );
    }
}

//! Dark and light palettes plus semantic styling.
//!
//! The active palette follows the view-model's dark-mode flag; every screen
//! styles through a `Theme` so the whole UI flips with one toggle.

use ratatui::style::{Color, Modifier, Style};

use nodepulse_core::Tone;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_bg: Color,

    // Tone colors
    pub ok: Color,
    pub danger: Color,
    pub warn: Color,
    pub info: Color,
    pub muted: Color,
}

/// Dark palette (the default when the preference was never set).
pub fn dark() -> Theme {
    Theme {
        bg: Color::Rgb(24, 26, 33),
        fg: Color::Rgb(205, 209, 222),
        dim: Color::Rgb(110, 118, 140),
        accent: Color::Rgb(120, 200, 255),
        border: Color::Rgb(70, 78, 102),
        border_focused: Color::Rgb(120, 200, 255),
        highlight_bg: Color::Rgb(42, 46, 60),
        ok: Color::Rgb(98, 220, 130),
        danger: Color::Rgb(240, 95, 95),
        warn: Color::Rgb(235, 203, 100),
        info: Color::Rgb(110, 170, 250),
        muted: Color::Rgb(130, 138, 160),
    }
}

/// Light palette.
pub fn light() -> Theme {
    Theme {
        bg: Color::Rgb(246, 247, 250),
        fg: Color::Rgb(36, 41, 56),
        dim: Color::Rgb(120, 128, 148),
        accent: Color::Rgb(20, 110, 190),
        border: Color::Rgb(180, 186, 200),
        border_focused: Color::Rgb(20, 110, 190),
        highlight_bg: Color::Rgb(222, 228, 240),
        ok: Color::Rgb(22, 140, 60),
        danger: Color::Rgb(190, 40, 40),
        warn: Color::Rgb(160, 120, 10),
        info: Color::Rgb(30, 90, 190),
        muted: Color::Rgb(130, 138, 160),
    }
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Theme {
        if dark_mode { dark() } else { light() }
    }

    /// Map a semantic tone to this palette's color.
    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Ok => self.ok,
            Tone::Danger => self.danger,
            Tone::Warn => self.warn,
            Tone::Info => self.info,
            Tone::Muted => self.muted,
        }
    }

    // ── Semantic styles ──────────────────────────────────────────────

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused_style(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn table_header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn table_row(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn table_selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

//! Color schemes for the FraudGuard shell.

use ratatui::style::{Color, Modifier, Style};

use crate::session::ThemeMode;

/// Theme configuration for the shell. The same mode also drives the palette
/// of the rendered plot image, so the report matches what is on screen.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub mode: ThemeMode,
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub normal: Color,
    pub fraud: Color,
    pub warning: Color,
    pub danger: Color,
    pub success: Color,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                mode,
                fg: Color::Gray,
                bg: Color::Reset,
                accent: Color::LightBlue,
                muted: Color::DarkGray,
                normal: Color::LightGreen,
                fraud: Color::LightRed,
                warning: Color::Yellow,
                danger: Color::Red,
                success: Color::Green,
            },
            ThemeMode::Light => Self {
                mode,
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                normal: Color::Green,
                fraud: Color::Red,
                warning: Color::Magenta,
                danger: Color::Red,
                success: Color::Green,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn status(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn status_ok(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn status_err(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::Dark)
    }
}

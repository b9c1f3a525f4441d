//! Key bindings for the FraudGuard shell.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions a key press can trigger in browse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Load,
    Analyze,
    Report,
    ToggleTheme,
    Quit,
    None,
}

/// Configurable key bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub load: Vec<KeyCode>,
    pub analyze: Vec<KeyCode>,
    pub report: Vec<KeyCode>,
    pub theme: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            load: vec![KeyCode::Char('l')],
            analyze: vec![KeyCode::Char('a')],
            report: vec![KeyCode::Char('r')],
            theme: vec![KeyCode::Char('t')],
            quit: vec![KeyCode::Char('q'), KeyCode::Esc],
        }
    }
}

impl KeyBindings {
    /// Map a key event to its action. Ctrl-C always quits.
    pub fn action(&self, key: &KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }
        if self.load.contains(&key.code) {
            AppAction::Load
        } else if self.analyze.contains(&key.code) {
            AppAction::Analyze
        } else if self.report.contains(&key.code) {
            AppAction::Report
        } else if self.theme.contains(&key.code) {
            AppAction::ToggleTheme
        } else if self.quit.contains(&key.code) {
            AppAction::Quit
        } else {
            AppAction::None
        }
    }
}

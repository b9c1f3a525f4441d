//! Terminal shell for FraudGuard.
//!
//! A single-screen ratatui application binding key presses to the pipeline
//! actions: load a CSV (on a background thread, with real parse progress
//! streamed back over a channel), analyze (PCA scatter), export a PDF
//! report, and a dark/light theme toggle.
//!
//! # Module Structure
//!
//! - `app`: application state, event loop, terminal lifecycle
//! - `events`: key bindings and their mapping to actions
//! - `msg`: messages sent by the background load worker
//! - `theme`: color schemes for dark and light mode

mod app;
mod events;
mod msg;
mod theme;

pub use app::{run, App};
pub use events::{AppAction, KeyBindings};
pub use theme::Theme;

use thiserror::Error;

/// Errors that can occur in the terminal shell itself.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal setup, drawing, or teardown.
    #[error("terminal IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for shell operations.
pub type TuiResult<T> = Result<T, TuiError>;

use std::path::Path;

use tracing::info;

use crate::error::PipelineError;
use crate::labeler::{label_transactions, scoring_rng};
use crate::loader::load_csv;
use crate::projector::{project, Projection};
use crate::table::TransactionTable;

/// Visual theme for the shell and the rendered plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Load a CSV and immediately attach the synthetic labels.
///
/// This is the unit of work handed to the background load thread; the result
/// travels back to the shell over a channel, so no table reference is ever
/// shared across threads.
pub fn load_labeled<F>(
    path: &Path,
    seed: Option<u64>,
    progress: F,
) -> Result<TransactionTable, PipelineError>
where
    F: FnMut(f64),
{
    let mut table = load_csv(path, progress)?;
    let mut rng = scoring_rng(seed);
    label_transactions(&mut table, &mut rng);
    Ok(table)
}

/// Per-run application state, owned by the shell and passed to each action
/// handler. At most one table is held at a time; a successful load replaces
/// it, a failed load leaves it untouched. Nothing persists across runs.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<TransactionTable>,
    seed: Option<u64>,
    theme: ThemeMode,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with a fixed scoring seed, for reproducible labeling.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn table(&self) -> Option<&TransactionTable> {
        self.table.as_ref()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Install a freshly loaded table, replacing any prior one.
    pub fn install_table(&mut self, table: TransactionTable) {
        info!(rows = table.n_rows(), "installing loaded table");
        self.table = Some(table);
    }

    /// Project the held table. Recomputed on every call, never cached.
    /// Returns `None` when no table has been loaded yet.
    pub fn analyze(&self) -> Option<Result<Projection, PipelineError>> {
        self.table.as_ref().map(project)
    }
}

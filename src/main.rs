// Entry point for FraudGuard: a terminal dashboard that loads transaction
// CSVs, attaches synthetic risk labels, projects features with PCA, and
// exports a PDF summary.
use std::fs::File;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::session::Session;

mod error;
mod labeler;
mod loader;
mod plot;
mod projector;
mod report;
mod session;
mod table;
mod tui;

#[cfg(test)]
mod tests;

const LOG_FILE: &str = "fraudguard.log";

fn main() -> Result<()> {
    // Log to a file so the TUI screen stays clean.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_file = File::create(LOG_FILE)?;
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    info!("startup");

    let session = Session::new();
    tui::run(session)?;

    info!("shutdown");
    Ok(())
}

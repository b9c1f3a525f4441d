//! Messages from the background load worker to the main loop.

use crate::error::PipelineError;
use crate::table::TransactionTable;

/// Sent over the worker channel during a load action. The table only ever
/// crosses threads inside `Loaded`; the main loop installs it after receiving
/// completion, so there is no unsynchronized handoff.
#[derive(Debug)]
pub enum WorkerMsg {
    /// Fraction of input bytes parsed so far, in [0, 1].
    Progress(f64),
    /// Terminal message: the load finished, successfully or not.
    Loaded(Result<TransactionTable, PipelineError>),
}

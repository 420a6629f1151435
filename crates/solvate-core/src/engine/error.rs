use super::config::ConfigError;
use super::solver::SolverError;
use super::summary::SummaryError;
use crate::core::io::deck::DeckError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch. Per-molecule problems (unparseable geometries,
/// corrupted reports, solver failures under the default policy) are recorded in
/// the run reports instead and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WriteFailure(#[from] DeckError),

    #[error("Solver invocation failed for '{deck}': {source}", deck = .deck.display())]
    Solver {
        deck: PathBuf,
        #[source]
        source: SolverError,
    },

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("Failed to list directory '{path}': {source}", path = .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

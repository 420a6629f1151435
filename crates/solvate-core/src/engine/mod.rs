//! # Engine Module
//!
//! The machinery that turns geometries into solvation energies: pipeline
//! configuration, the error taxonomy, progress reporting, the external solver
//! abstraction and the aggregation of solver reports into the summary table.
//!
//! - **Configuration** ([`config`]) - Directory layout, solver location and condition headers
//! - **Error Handling** ([`error`]) - Engine-level errors and their propagation policy
//! - **Progress Monitoring** ([`progress`]) - Optional observer for cosmetic progress display
//! - **Solver Execution** ([`solver`]) - Invocation of the solver executable over batches of decks
//! - **Summary** ([`summary`]) - Energy pairing, error classification and quarantine

pub mod config;
pub mod error;
pub mod progress;
pub mod solver;
pub mod summary;

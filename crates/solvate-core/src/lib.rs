//! # Solvate Core Library
//!
//! Batch estimation of solvation energies with an external semi-empirical solver.
//! Each molecule is evaluated twice, once inside an implicit solvent and once in
//! vacuum, and the difference of the two total energies is reported.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless geometry models and the text formats the
//!   pipeline reads and writes (raw coordinates, prior solver reports, input decks and
//!   energy reports).
//!
//! - **[`engine`]: The Machinery.** Pipeline configuration, the error taxonomy, progress
//!   reporting, the solver abstraction and the summary aggregation that turns reports
//!   into a solvation table.
//!
//! - **[`workflows`]: The Public API.** Sequences the engine over whole directories:
//!   deck preparation, solver passes and the final summary.

pub mod core;
pub mod engine;
pub mod workflows;

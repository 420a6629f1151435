//! # Workflows Module
//!
//! High-level entry points that run the solvation pipeline over whole
//! directories.
//!
//! ## Overview
//!
//! A solvation run has three stages, each of which can also be invoked on its own:
//!
//! 1. **Deck preparation** reads every geometry source and writes one solvent deck
//!    and one vacuum deck per molecule.
//! 2. **Execution** drives the external solver over the decks, solvent pass first.
//! 3. **Summary** pairs the reports per molecule and writes the solvation table.
//!
//! All stages report through a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and never alter control flow based on whether anyone is listening.

pub mod solvation;

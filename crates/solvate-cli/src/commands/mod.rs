pub mod execute;
pub mod prepare;
pub mod run;
pub mod summarize;

use crate::utils::progress::CliProgressHandler;
use solvate::engine::progress::ProgressReporter;
use solvate::engine::summary::SummaryReport;
use solvate::workflows::solvation::{DeckPreparation, ExecutionReport};

fn progress_reporter() -> ProgressReporter<'static> {
    let progress_handler = CliProgressHandler::new();
    ProgressReporter::with_callback(progress_handler.get_callback())
}

fn print_preparation(preparation: &DeckPreparation) {
    println!(
        "Wrote {} input deck(s) for {} molecule(s).",
        preparation.decks.len(),
        preparation.molecule_count()
    );
    for skipped in &preparation.skipped {
        println!(
            "  Skipped {}: {}",
            skipped.path.display(),
            skipped.error
        );
    }
}

fn print_execution(execution: &ExecutionReport) {
    println!(
        "Solver finished: {} solvent and {} vacuum deck(s) evaluated.",
        execution.solvent.succeeded.len(),
        execution.vacuum.succeeded.len()
    );
    for failure in execution
        .solvent
        .failures
        .iter()
        .chain(&execution.vacuum.failures)
    {
        println!("  Failed {}: {}", failure.deck.display(), failure.error);
    }
}

fn print_summary(summary: &SummaryReport) {
    println!(
        "Summary with {} row(s) written to: {}",
        summary.rows.len(),
        summary.table_path.display()
    );
    println!("{} errors detected", summary.error_count());
}

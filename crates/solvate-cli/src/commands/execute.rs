use super::{print_execution, progress_reporter};
use crate::cli::PipelineArgs;
use crate::config::build_config;
use crate::error::Result;
use solvate::engine::solver::MopacSolver;
use solvate::workflows::solvation;
use tracing::info;

pub fn run(args: PipelineArgs) -> Result<()> {
    let config = build_config(&args)?;
    let reporter = progress_reporter();

    let solver = MopacSolver::new(config.solver_executable.clone());
    info!("Running {:?} over existing decks...", solver.executable());
    let execution = solvation::execute_existing(&config, &solver, &reporter)?;

    print_execution(&execution);
    Ok(())
}

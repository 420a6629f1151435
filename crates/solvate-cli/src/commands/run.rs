use super::{print_execution, print_preparation, print_summary, progress_reporter};
use crate::cli::PipelineArgs;
use crate::config::build_config;
use crate::error::Result;
use solvate::engine::solver::MopacSolver;
use solvate::workflows::solvation;
use tracing::{info, warn};

pub fn run(args: PipelineArgs) -> Result<()> {
    let config = build_config(&args)?;
    let reporter = progress_reporter();
    let solver = MopacSolver::new(config.solver_executable.clone());

    println!("Starting solvation workflow...");
    info!("Invoking the core solvation workflow with {:?}", solver.executable());

    let report = solvation::run(&config, &solver, &reporter)?;

    print_preparation(&report.preparation);
    print_execution(&report.execution);
    if report.summary.rows.is_empty() {
        warn!("Workflow completed but no reports were summarized.");
    }
    print_summary(&report.summary);
    Ok(())
}

use super::{print_summary, progress_reporter};
use crate::cli::PipelineArgs;
use crate::config::build_config;
use crate::error::Result;
use solvate::workflows::solvation;

pub fn run(args: PipelineArgs) -> Result<()> {
    let config = build_config(&args)?;
    let reporter = progress_reporter();

    let summary = solvation::summarize(&config, &reporter)?;

    print_summary(&summary);
    Ok(())
}

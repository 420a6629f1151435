use super::{print_preparation, progress_reporter};
use crate::cli::PipelineArgs;
use crate::config::build_config;
use crate::error::Result;
use solvate::workflows::solvation;
use tracing::info;

pub fn run(args: PipelineArgs) -> Result<()> {
    let config = build_config(&args)?;
    let reporter = progress_reporter();

    info!("Generating input decks...");
    let preparation = solvation::prepare_decks(&config, &reporter)?;

    print_preparation(&preparation);
    Ok(())
}

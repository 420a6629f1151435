use crate::core::io::deck::InputDeck;
use crate::core::io::orca::OrcaOutputFile;
use crate::core::io::traits::{GeometryError, GeometrySource};
use crate::core::io::xyz::XyzFile;
use crate::core::io::{has_extension, molecule_id, sorted_files};
use crate::core::models::condition::Condition;
use crate::core::models::geometry::MolecularGeometry;
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::solver::{BatchOutcome, Solver, SolverRunner};
use crate::engine::summary::{SummaryAggregator, SummaryReport};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const PHASE_PREPARE: &str = "Creating input decks";
const PHASE_SOLVENT: &str = "Running solvent decks";
const PHASE_VACUUM: &str = "Running vacuum decks";
const PHASE_SUMMARY: &str = "Generating summary";

/// The two places geometries are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    RawCoordinates,
    PriorReport,
}

impl SourceKind {
    fn read(self, path: &Path) -> Result<MolecularGeometry, GeometryError> {
        match self {
            SourceKind::RawCoordinates => XyzFile::read_from_path(path),
            SourceKind::PriorReport => OrcaOutputFile::read_from_path(path),
        }
    }
}

/// A geometry source that could not be parsed and produced no decks.
#[derive(Debug)]
pub struct SkippedGeometry {
    pub path: PathBuf,
    pub error: GeometryError,
}

#[derive(Debug, Default)]
pub struct DeckPreparation {
    pub decks: Vec<InputDeck>,
    pub skipped: Vec<SkippedGeometry>,
}

impl DeckPreparation {
    /// Paths of the decks written for `condition`, in generation order.
    pub fn deck_paths(&self, condition: Condition) -> Vec<PathBuf> {
        self.decks
            .iter()
            .filter(|deck| deck.condition == condition)
            .map(|deck| deck.path.clone())
            .collect()
    }

    pub fn molecule_count(&self) -> usize {
        self.decks
            .iter()
            .map(|deck| deck.molecule.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub solvent: BatchOutcome,
    pub vacuum: BatchOutcome,
}

impl ExecutionReport {
    pub fn outcome(&self, condition: Condition) -> &BatchOutcome {
        match condition {
            Condition::Solvent => &self.solvent,
            Condition::Vacuum => &self.vacuum,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.solvent.failures.len() + self.vacuum.failures.len()
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub preparation: DeckPreparation,
    pub execution: ExecutionReport,
    pub summary: SummaryReport,
}

/// Reads every geometry source and writes a solvent and a vacuum deck for each.
///
/// Raw-coordinate files are processed before prior reports, each directory in
/// file-name order. A source that fails to parse is skipped with a warning; a
/// deck that cannot be written aborts the whole preparation.
#[instrument(skip_all, name = "deck_preparation")]
pub fn prepare_decks(
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<DeckPreparation, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: PHASE_PREPARE,
    });

    let sources = collect_sources(config)?;
    info!("Found {} geometry source(s).", sources.len());

    let total = sources.len() as u64;
    reporter.report(Progress::TaskStart { total });

    let mut preparation = DeckPreparation::default();
    let mut written: HashSet<PathBuf> = HashSet::new();
    for (i, (path, kind)) in sources.iter().enumerate() {
        let label = molecule_id(path).unwrap_or_default();
        match kind.read(path) {
            Ok(geometry) => {
                debug!("Read {} atom(s) from {:?}", geometry.len(), path);
                for condition in Condition::ALL {
                    let deck = InputDeck::new(
                        &label,
                        condition,
                        config.directories.condition_dir(condition),
                        &config.extensions.deck,
                    );
                    deck.write(&geometry, config.header(condition))?;
                    if written.insert(deck.path.clone()) {
                        preparation.decks.push(deck);
                    } else {
                        warn!(
                            "Deck {:?} was already generated from another source and has been overwritten by {:?}.",
                            deck.path, path
                        );
                    }
                }
            }
            Err(error) => {
                warn!("Skipping malformed geometry {:?}: {}", path, error);
                reporter.report(Progress::Message(format!(
                    "Skipped {}: {}",
                    path.display(),
                    error
                )));
                preparation.skipped.push(SkippedGeometry {
                    path: path.clone(),
                    error,
                });
            }
        }
        reporter.report(Progress::TaskAdvance {
            current: i as u64 + 1,
            total,
            label,
        });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        "Wrote {} deck(s) for {} molecule(s); {} source(s) skipped.",
        preparation.decks.len(),
        preparation.molecule_count(),
        preparation.skipped.len()
    );
    Ok(preparation)
}

fn collect_sources(config: &PipelineConfig) -> Result<Vec<(PathBuf, SourceKind)>, EngineError> {
    let dirs = &config.directories;
    let exts = &config.extensions;
    let groups = [
        (
            dirs.geometry_dir.as_deref(),
            exts.geometry.as_str(),
            SourceKind::RawCoordinates,
        ),
        (
            dirs.prior_report_dir.as_deref(),
            exts.prior_report.as_str(),
            SourceKind::PriorReport,
        ),
    ];

    let mut sources = Vec::new();
    for (dir, extension, kind) in groups {
        let Some(dir) = dir else { continue };
        let files = list_directory(dir)?;
        sources.extend(
            files
                .into_iter()
                .filter(|path| has_extension(path, extension))
                .filter(|path| molecule_id(path).is_some())
                .map(|path| (path, kind)),
        );
    }
    Ok(sources)
}

fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    sorted_files(dir).map_err(|source| EngineError::Directory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Runs the solver over the given decks, all solvent decks first and then all
/// vacuum decks.
#[instrument(skip_all, name = "deck_execution")]
pub fn execute_decks<S: Solver + ?Sized>(
    config: &PipelineConfig,
    solver: &S,
    solvent_decks: &[PathBuf],
    vacuum_decks: &[PathBuf],
    reporter: &ProgressReporter,
) -> Result<ExecutionReport, EngineError> {
    let runner = SolverRunner::new(solver, config.stop_on_solver_failure);

    let run_pass = |phase: &'static str, decks: &[PathBuf]| -> Result<BatchOutcome, EngineError> {
        reporter.report(Progress::PhaseStart { name: phase });
        info!("{}: {} deck(s).", phase, decks.len());
        let outcome = runner.run_batch(decks, reporter)?;
        reporter.report(Progress::PhaseFinish);
        Ok(outcome)
    };
    let solvent = run_pass(PHASE_SOLVENT, solvent_decks)?;
    let vacuum = run_pass(PHASE_VACUUM, vacuum_decks)?;

    let report = ExecutionReport { solvent, vacuum };
    if report.failure_count() > 0 {
        warn!(
            "{} solver invocation(s) failed; affected molecules will be missing from the summary.",
            report.failure_count()
        );
    }
    Ok(report)
}

/// Runs the solver over every deck file currently present in the solvent and
/// vacuum directories.
pub fn execute_existing<S: Solver + ?Sized>(
    config: &PipelineConfig,
    solver: &S,
    reporter: &ProgressReporter,
) -> Result<ExecutionReport, EngineError> {
    let find_decks = |condition: Condition| -> Result<Vec<PathBuf>, EngineError> {
        let files = list_directory(config.directories.condition_dir(condition))?;
        Ok(files
            .into_iter()
            .filter(|path| has_extension(path, &config.extensions.deck))
            .collect())
    };
    let solvent = find_decks(Condition::Solvent)?;
    let vacuum = find_decks(Condition::Vacuum)?;
    execute_decks(config, solver, &solvent, &vacuum, reporter)
}

/// Builds the solvation table from the reports on disk.
#[instrument(skip_all, name = "summary")]
pub fn summarize(
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<SummaryReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: PHASE_SUMMARY,
    });
    let summary = SummaryAggregator::new(config).run(reporter)?;
    reporter.report(Progress::PhaseFinish);
    info!("{} errors detected", summary.error_count());
    Ok(summary)
}

/// Prepares decks, runs the solver over exactly the decks generated here and
/// writes the summary table.
#[instrument(skip_all, name = "solvation_workflow")]
pub fn run<S: Solver + ?Sized>(
    config: &PipelineConfig,
    solver: &S,
    reporter: &ProgressReporter,
) -> Result<RunReport, EngineError> {
    info!("Starting solvation workflow.");

    let preparation = prepare_decks(config, reporter)?;
    let execution = execute_decks(
        config,
        solver,
        &preparation.deck_paths(Condition::Solvent),
        &preparation.deck_paths(Condition::Vacuum),
        reporter,
    )?;
    let summary = summarize(config, reporter)?;

    info!(
        "Workflow complete: {} row(s) in {:?}.",
        summary.rows.len(),
        summary.table_path
    );
    Ok(RunReport {
        preparation,
        execution,
        summary,
    })
}

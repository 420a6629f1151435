use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Failed to start '{program}': {source}", program = .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Solver exited unsuccessfully (exit code: {})", .code.map_or("none".to_string(), |c| c.to_string()))]
    ExitStatus { code: Option<i32> },
}

/// The external program that evaluates an input deck.
///
/// Implementations must block until the evaluation has finished; the report is
/// expected next to the deck once `run` returns `Ok`.
pub trait Solver {
    fn run(&self, deck: &Path) -> Result<(), SolverError>;
}

/// Runs a MOPAC-style executable with the deck path as its only argument.
/// Standard output and standard error are discarded.
#[derive(Debug, Clone)]
pub struct MopacSolver {
    executable: PathBuf,
}

impl MopacSolver {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Solver for MopacSolver {
    fn run(&self, deck: &Path) -> Result<(), SolverError> {
        let status = Command::new(&self.executable)
            .arg(deck)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SolverError::Spawn {
                program: self.executable.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SolverError::ExitStatus {
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct SolverFailure {
    pub deck: PathBuf,
    pub error: SolverError,
}

/// Result of running the solver over one condition's decks.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<PathBuf>,
    pub failures: Vec<SolverFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

/// Drives a [`Solver`] over decks strictly one after another.
pub struct SolverRunner<'a, S: Solver + ?Sized> {
    solver: &'a S,
    stop_on_failure: bool,
}

impl<'a, S: Solver + ?Sized> SolverRunner<'a, S> {
    pub fn new(solver: &'a S, stop_on_failure: bool) -> Self {
        Self {
            solver,
            stop_on_failure,
        }
    }

    /// Runs every deck in order. Failed decks are recorded and skipped unless the
    /// runner was built with `stop_on_failure`, in which case the first failure
    /// is returned as [`EngineError::Solver`]. Failures are never retried.
    pub fn run_batch(
        &self,
        decks: &[PathBuf],
        reporter: &ProgressReporter,
    ) -> Result<BatchOutcome, EngineError> {
        let total = decks.len() as u64;
        reporter.report(Progress::TaskStart { total });

        let mut outcome = BatchOutcome::default();
        for (i, deck) in decks.iter().enumerate() {
            debug!("Running solver on {:?}", deck);
            match self.solver.run(deck) {
                Ok(()) => outcome.succeeded.push(deck.clone()),
                Err(error) => {
                    warn!("Solver failed on {:?}: {}", deck, error);
                    if self.stop_on_failure {
                        reporter.report(Progress::TaskFinish);
                        return Err(EngineError::Solver {
                            deck: deck.clone(),
                            source: error,
                        });
                    }
                    outcome.failures.push(SolverFailure {
                        deck: deck.clone(),
                        error,
                    });
                }
            }
            reporter.report(Progress::TaskAdvance {
                current: i as u64 + 1,
                total,
                label: deck_label(deck),
            });
        }
        reporter.report(Progress::TaskFinish);

        info!(
            "Solver batch finished: {} succeeded, {} failed.",
            outcome.succeeded.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }
}

fn deck_label(deck: &Path) -> String {
    deck.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| deck.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fails on decks whose file name contains "bad" and records every call.
    struct ScriptedSolver {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl ScriptedSolver {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Solver for ScriptedSolver {
        fn run(&self, deck: &Path) -> Result<(), SolverError> {
            self.calls.borrow_mut().push(deck.to_path_buf());
            if deck.to_string_lossy().contains("bad") {
                Err(SolverError::ExitStatus { code: Some(2) })
            } else {
                Ok(())
            }
        }
    }

    fn decks() -> Vec<PathBuf> {
        ["a.mop", "bad.mop", "c.mop"]
            .iter()
            .map(PathBuf::from)
            .collect()
    }

    #[test]
    fn run_batch_continues_past_failures_by_default() {
        let solver = ScriptedSolver::new();
        let runner = SolverRunner::new(&solver, false);
        let outcome = runner.run_batch(&decks(), &ProgressReporter::new()).unwrap();

        assert_eq!(*solver.calls.borrow(), decks());
        assert_eq!(
            outcome.succeeded,
            vec![PathBuf::from("a.mop"), PathBuf::from("c.mop")]
        );
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].deck, PathBuf::from("bad.mop"));
        assert_eq!(outcome.total(), 3);
    }

    #[test]
    fn run_batch_stops_on_first_failure_when_requested() {
        let solver = ScriptedSolver::new();
        let runner = SolverRunner::new(&solver, true);
        let err = runner
            .run_batch(&decks(), &ProgressReporter::new())
            .unwrap_err();

        assert!(matches!(err, EngineError::Solver { ref deck, .. } if deck == Path::new("bad.mop")));
        assert_eq!(solver.calls.borrow().len(), 2);
    }

    #[test]
    fn run_batch_reports_progress_for_every_deck() {
        use std::sync::{Arc, Mutex};

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p: Progress| {
            sink.lock().unwrap().push(p);
        }));

        let solver = ScriptedSolver::new();
        SolverRunner::new(&solver, false)
            .run_batch(&decks(), &reporter)
            .unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(Progress::TaskStart { total: 3 })));
        assert!(matches!(events.last(), Some(Progress::TaskFinish)));
        let labels: Vec<_> = events
            .iter()
            .filter_map(|p| match p {
                Progress::TaskAdvance { current, label, .. } => Some((*current, label.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                (1, "a.mop".to_string()),
                (2, "bad.mop".to_string()),
                (3, "c.mop".to_string())
            ]
        );
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let solver = ScriptedSolver::new();
        let outcome = SolverRunner::new(&solver, true)
            .run_batch(&[], &ProgressReporter::new())
            .unwrap();
        assert_eq!(outcome.total(), 0);
        assert!(solver.calls.borrow().is_empty());
    }

    #[test]
    fn mopac_solver_reports_missing_executable() {
        let solver = MopacSolver::new("/definitely/not/a/solver/binary");
        let err = solver.run(Path::new("deck.mop")).unwrap_err();
        assert!(matches!(err, SolverError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn mopac_solver_maps_exit_status() {
        assert!(MopacSolver::new("true").run(Path::new("deck.mop")).is_ok());

        let err = MopacSolver::new("false")
            .run(Path::new("deck.mop"))
            .unwrap_err();
        assert!(matches!(err, SolverError::ExitStatus { code: Some(1) }));
    }

    #[test]
    fn solver_error_messages_are_descriptive() {
        let err = SolverError::ExitStatus { code: Some(3) };
        assert_eq!(err.to_string(), "Solver exited unsuccessfully (exit code: 3)");
        let err = SolverError::ExitStatus { code: None };
        assert_eq!(err.to_string(), "Solver exited unsuccessfully (exit code: none)");
    }
}

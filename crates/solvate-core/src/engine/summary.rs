use super::config::PipelineConfig;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::report::{ExtractError, TotalEnergy, extract_from_path};
use crate::core::io::{molecule_id, sorted_files};
use crate::core::models::condition::Condition;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Header row of the summary table.
pub const SUMMARY_HEADER: [&str; 4] = ["Filename", "Ecosmo", "Epm7", "delta(eV)"];

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to list report directory '{path}': {source}", path = .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write summary table '{path}': {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Why a molecule produced no solvation energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The report has no total-energy line.
    MissingEnergySection,
    /// The total-energy line holds no decimal number.
    UnparseableEnergyValue,
    /// The vacuum report paired with a solvent report does not exist.
    ReportMissing,
    /// The report exists but could not be read.
    ReportUnreadable,
}

impl ErrorClass {
    /// The tag written into the summary table in place of an energy.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorClass::MissingEnergySection => "ERROR1",
            ErrorClass::UnparseableEnergyValue => "ERROR2",
            ErrorClass::ReportMissing => "MISSING",
            ErrorClass::ReportUnreadable => "UNREADABLE",
        }
    }
}

/// The energy of one molecule under one condition, or why it is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    pub molecule: String,
    pub condition: Condition,
    pub energy: Result<TotalEnergy, ErrorClass>,
}

/// A report that failed extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub molecule: String,
    pub condition: Condition,
    pub class: ErrorClass,
    /// Where the offending report was copied, if there was a report to copy.
    pub quarantined: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryRow {
    Complete {
        molecule: String,
        solvent: TotalEnergy,
        vacuum: TotalEnergy,
        delta: f64,
    },
    SolventError {
        molecule: String,
        class: ErrorClass,
    },
    VacuumError {
        molecule: String,
        solvent: TotalEnergy,
        class: ErrorClass,
    },
}

impl SummaryRow {
    fn complete(molecule: String, solvent: TotalEnergy, vacuum: TotalEnergy) -> Self {
        let delta = solvent.value - vacuum.value;
        Self::Complete {
            molecule,
            solvent,
            vacuum,
            delta,
        }
    }

    pub fn molecule(&self) -> &str {
        match self {
            Self::Complete { molecule, .. }
            | Self::SolventError { molecule, .. }
            | Self::VacuumError { molecule, .. } => molecule,
        }
    }

    pub fn delta(&self) -> Option<f64> {
        match self {
            Self::Complete { delta, .. } => Some(*delta),
            _ => None,
        }
    }

    /// The tab-separated fields of this row. Energies are reproduced exactly as
    /// printed in the reports; the delta carries as many decimals as the more
    /// precise of the two energies.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::Complete {
                molecule,
                solvent,
                vacuum,
                delta,
            } => {
                let decimals = solvent.decimals().max(vacuum.decimals());
                vec![
                    molecule.clone(),
                    solvent.text.clone(),
                    vacuum.text.clone(),
                    format!("{delta:.decimals$}"),
                ]
            }
            Self::SolventError { molecule, class } => {
                vec![molecule.clone(), class.tag().to_string()]
            }
            Self::VacuumError {
                molecule,
                solvent,
                class,
            } => vec![
                molecule.clone(),
                solvent.text.clone(),
                class.tag().to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub rows: Vec<SummaryRow>,
    pub errors: Vec<ErrorRecord>,
    pub table_path: PathBuf,
}

impl SummaryReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Pairs solvent and vacuum reports per molecule and writes the summary table.
pub struct SummaryAggregator<'a> {
    config: &'a PipelineConfig,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Visits every file of the solvent directory, builds one row per report and
    /// writes the table once all rows are known.
    pub fn run(&self, reporter: &ProgressReporter) -> Result<SummaryReport, SummaryError> {
        let solvent_dir = &self.config.directories.solvent_dir;
        let files = sorted_files(solvent_dir).map_err(|source| SummaryError::ReadDir {
            path: solvent_dir.clone(),
            source,
        })?;

        let total = files.len() as u64;
        reporter.report(Progress::TaskStart { total });

        let mut rows = Vec::new();
        let mut errors = Vec::new();
        for (i, path) in files.iter().enumerate() {
            if let Some((row, error)) = self.process_report(path) {
                if let Some(error) = error {
                    errors.push(error);
                }
                rows.push(row);
            }
            reporter.report(Progress::TaskAdvance {
                current: i as u64 + 1,
                total,
                label: molecule_id(path).unwrap_or_default(),
            });
        }
        reporter.report(Progress::TaskFinish);

        let table_path = self.config.summary_path.clone();
        write_table(&rows, &table_path)?;
        info!(
            "Summary written to {:?}: {} row(s), {} error(s) detected.",
            table_path,
            rows.len(),
            errors.len()
        );

        Ok(SummaryReport {
            rows,
            errors,
            table_path,
        })
    }

    /// Returns `None` for files that are not reports.
    fn process_report(&self, solvent_path: &Path) -> Option<(SummaryRow, Option<ErrorRecord>)> {
        let molecule = molecule_id(solvent_path)?;

        let solvent = match self.extract(&molecule, Condition::Solvent, solvent_path) {
            None => return None,
            Some(record) => record,
        };
        let solvent_energy = match solvent.energy {
            Ok(energy) => energy,
            Err(class) => {
                let error = self.classify_failure(&molecule, Condition::Solvent, solvent_path, class);
                let row = SummaryRow::SolventError { molecule, class };
                return Some((row, Some(error)));
            }
        };

        let vacuum_path = self.vacuum_counterpart(solvent_path);
        if !vacuum_path.is_file() {
            warn!(
                "No vacuum report for '{}' (expected {:?}).",
                molecule, vacuum_path
            );
            let class = ErrorClass::ReportMissing;
            let error = ErrorRecord {
                molecule: molecule.clone(),
                condition: Condition::Vacuum,
                class,
                quarantined: None,
            };
            let row = SummaryRow::VacuumError {
                molecule,
                solvent: solvent_energy,
                class,
            };
            return Some((row, Some(error)));
        }

        let vacuum = self
            .extract(&molecule, Condition::Vacuum, &vacuum_path)
            .map(|record| record.energy)
            .unwrap_or(Err(ErrorClass::ReportMissing));
        match vacuum {
            Ok(vacuum_energy) => {
                debug!(
                    "'{}': solvent {} / vacuum {}",
                    molecule, solvent_energy.text, vacuum_energy.text
                );
                Some((
                    SummaryRow::complete(molecule, solvent_energy, vacuum_energy),
                    None,
                ))
            }
            Err(class) => {
                let error = self.classify_failure(&molecule, Condition::Vacuum, &vacuum_path, class);
                let row = SummaryRow::VacuumError {
                    molecule,
                    solvent: solvent_energy,
                    class,
                };
                Some((row, Some(error)))
            }
        }
    }

    /// Extracts the energy of one report. `None` means the file is not a report.
    fn extract(
        &self,
        molecule: &str,
        condition: Condition,
        path: &Path,
    ) -> Option<EnergyRecord> {
        let energy = match extract_from_path(path, &self.config.extensions.report) {
            Ok(energy) => Ok(energy),
            Err(ExtractError::NotAReport(_)) => {
                trace!("Skipping non-report file {:?}", path);
                return None;
            }
            Err(ExtractError::MissingEnergySection) => Err(ErrorClass::MissingEnergySection),
            Err(ExtractError::UnparseableEnergyValue { .. }) => {
                Err(ErrorClass::UnparseableEnergyValue)
            }
            Err(ExtractError::Io(source)) => {
                warn!("Failed to read {} report {:?}: {}", condition, path, source);
                Err(ErrorClass::ReportUnreadable)
            }
        };
        Some(EnergyRecord {
            molecule: molecule.to_string(),
            condition,
            energy,
        })
    }

    fn vacuum_counterpart(&self, solvent_path: &Path) -> PathBuf {
        let file_name = solvent_path.file_name().unwrap_or_default();
        self.config.directories.vacuum_dir.join(file_name)
    }

    /// Copies a corrupted report into quarantine and records the failure.
    /// Solvent reports keep their file name; vacuum reports get a `.vacuum`
    /// infix so both reports of one molecule can sit in quarantine together.
    /// A failed copy is logged and leaves `quarantined` empty.
    fn classify_failure(
        &self,
        molecule: &str,
        condition: Condition,
        report: &Path,
        class: ErrorClass,
    ) -> ErrorRecord {
        let failure = |quarantined| ErrorRecord {
            molecule: molecule.to_string(),
            condition,
            class,
            quarantined,
        };
        if class == ErrorClass::ReportUnreadable {
            return failure(None);
        }

        let file_name = match condition {
            Condition::Solvent => report.file_name().map(OsString::from).unwrap_or_default(),
            Condition::Vacuum => OsString::from(format!(
                "{molecule}.{}.{}",
                condition.label(),
                self.config.extensions.report
            )),
        };
        let destination = self.config.directories.quarantine_dir.join(file_name);
        if let Err(e) = fs::copy(report, &destination) {
            warn!(
                "{} report for '{}' is corrupted ({}), could not copy it to {:?}: {}",
                condition,
                molecule,
                class.tag(),
                destination,
                e
            );
            return failure(None);
        }
        warn!(
            "{} report for '{}' is corrupted ({}), copied to {:?}.",
            condition,
            molecule,
            class.tag(),
            destination
        );
        failure(Some(destination))
    }
}

/// Writes the table to a temporary sibling file and renames it into place, so
/// readers never observe a half-written table.
pub fn write_table(rows: &[SummaryRow], path: &Path) -> Result<(), SummaryError> {
    let to_error = |source: csv::Error| SummaryError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = write_and_rename(rows, &tmp_path, path);
    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!("Failed to remove temporary table {:?}: {}", tmp_path, e);
        }
    }
    result.map_err(to_error)
}

fn write_and_rename(rows: &[SummaryRow], tmp_path: &Path, path: &Path) -> Result<(), csv::Error> {
    // Ids are written verbatim; the table is tab-separated, not CSV.
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_path(tmp_path)?;
    writer.write_record(SUMMARY_HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(tmp_path, path)?;
    Ok(())
}

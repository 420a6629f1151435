use crate::core::io::deck::DECK_EXTENSION;
use crate::core::io::orca::OrcaOutputFile;
use crate::core::io::report::REPORT_EXTENSION;
use crate::core::io::traits::GeometrySource;
use crate::core::io::xyz::XyzFile;
use crate::core::models::condition::{Condition, ConditionHeader, spin_keyword};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Directories the pipeline reads from and writes into. All of them must exist
/// before a run; none are created by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryLayout {
    /// Raw-coordinate geometry sources, if any.
    pub geometry_dir: Option<PathBuf>,
    /// Reports of a previous solver stage to re-read geometries from, if any.
    pub prior_report_dir: Option<PathBuf>,
    /// Solvent-condition decks and the reports the solver writes next to them.
    pub solvent_dir: PathBuf,
    /// Vacuum-condition decks and reports.
    pub vacuum_dir: PathBuf,
    /// Copies of reports that failed energy extraction.
    pub quarantine_dir: PathBuf,
}

impl DirectoryLayout {
    pub fn condition_dir(&self, condition: Condition) -> &Path {
        match condition {
            Condition::Solvent => &self.solvent_dir,
            Condition::Vacuum => &self.vacuum_dir,
        }
    }
}

/// File extensions (without the leading dot) used to recognise each kind of file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExtensions {
    pub geometry: String,
    pub prior_report: String,
    pub deck: String,
    pub report: String,
}

impl Default for FileExtensions {
    fn default() -> Self {
        Self {
            geometry: XyzFile::EXTENSION.to_string(),
            prior_report: OrcaOutputFile::EXTENSION.to_string(),
            deck: DECK_EXTENSION.to_string(),
            report: REPORT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub directories: DirectoryLayout,
    pub extensions: FileExtensions,
    pub solver_executable: PathBuf,
    pub solvent_header: ConditionHeader,
    pub vacuum_header: ConditionHeader,
    pub summary_path: PathBuf,
    /// Abort the batch on the first solver failure instead of moving on.
    pub stop_on_solver_failure: bool,
}

impl PipelineConfig {
    pub fn header(&self, condition: Condition) -> &ConditionHeader {
        match condition {
            Condition::Solvent => &self.solvent_header,
            Condition::Vacuum => &self.vacuum_header,
        }
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    geometry_dir: Option<PathBuf>,
    prior_report_dir: Option<PathBuf>,
    solvent_dir: Option<PathBuf>,
    vacuum_dir: Option<PathBuf>,
    quarantine_dir: Option<PathBuf>,
    extensions: Option<FileExtensions>,
    solver_executable: Option<PathBuf>,
    solvent_header: Option<ConditionHeader>,
    vacuum_header: Option<ConditionHeader>,
    summary_path: Option<PathBuf>,
    stop_on_solver_failure: bool,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry_dir(mut self, path: PathBuf) -> Self {
        self.geometry_dir = Some(path);
        self
    }
    pub fn prior_report_dir(mut self, path: PathBuf) -> Self {
        self.prior_report_dir = Some(path);
        self
    }
    pub fn solvent_dir(mut self, path: PathBuf) -> Self {
        self.solvent_dir = Some(path);
        self
    }
    pub fn vacuum_dir(mut self, path: PathBuf) -> Self {
        self.vacuum_dir = Some(path);
        self
    }
    pub fn quarantine_dir(mut self, path: PathBuf) -> Self {
        self.quarantine_dir = Some(path);
        self
    }
    pub fn extensions(mut self, extensions: FileExtensions) -> Self {
        self.extensions = Some(extensions);
        self
    }
    pub fn solver_executable(mut self, path: PathBuf) -> Self {
        self.solver_executable = Some(path);
        self
    }
    pub fn solvent_header(mut self, header: ConditionHeader) -> Self {
        self.solvent_header = Some(header);
        self
    }
    pub fn vacuum_header(mut self, header: ConditionHeader) -> Self {
        self.vacuum_header = Some(header);
        self
    }
    pub fn summary_path(mut self, path: PathBuf) -> Self {
        self.summary_path = Some(path);
        self
    }
    pub fn stop_on_solver_failure(mut self, stop: bool) -> Self {
        self.stop_on_solver_failure = stop;
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let directories = DirectoryLayout {
            geometry_dir: self.geometry_dir,
            prior_report_dir: self.prior_report_dir,
            solvent_dir: self
                .solvent_dir
                .ok_or(ConfigError::MissingParameter("solvent_dir"))?,
            vacuum_dir: self
                .vacuum_dir
                .ok_or(ConfigError::MissingParameter("vacuum_dir"))?,
            quarantine_dir: self
                .quarantine_dir
                .ok_or(ConfigError::MissingParameter("quarantine_dir"))?,
        };
        if directories.solvent_dir == directories.vacuum_dir {
            return Err(ConfigError::InvalidParameter {
                name: "vacuum_dir",
                reason: "solvent and vacuum reports share file names and need separate directories"
                    .to_string(),
            });
        }

        let extensions = self.extensions.unwrap_or_default();
        for (name, ext) in [
            ("extensions.geometry", &extensions.geometry),
            ("extensions.prior_report", &extensions.prior_report),
            ("extensions.deck", &extensions.deck),
            ("extensions.report", &extensions.report),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("'{ext}' must be a non-empty extension without a leading dot"),
                });
            }
        }
        if extensions.deck.eq_ignore_ascii_case(&extensions.report) {
            return Err(ConfigError::InvalidParameter {
                name: "extensions.deck",
                reason: "decks and reports live side by side and need distinct extensions"
                    .to_string(),
            });
        }

        let solvent_header = self
            .solvent_header
            .unwrap_or_else(ConditionHeader::default_solvent);
        let vacuum_header = self
            .vacuum_header
            .unwrap_or_else(ConditionHeader::default_vacuum);
        validate_header("solvent_header", &solvent_header)?;
        validate_header("vacuum_header", &vacuum_header)?;
        match solvent_header.solvent {
            None => {
                return Err(ConfigError::InvalidParameter {
                    name: "solvent_header",
                    reason: "the solvent condition requires a solvent model".to_string(),
                });
            }
            Some(model) if !is_positive(model.dielectric_constant) || !is_positive(model.solvent_radius) => {
                return Err(ConfigError::InvalidParameter {
                    name: "solvent_header",
                    reason: "dielectric constant and solvent radius must be positive".to_string(),
                });
            }
            Some(_) => {}
        }
        if vacuum_header.solvent.is_some() {
            return Err(ConfigError::InvalidParameter {
                name: "vacuum_header",
                reason: "the vacuum condition cannot carry a solvent model".to_string(),
            });
        }

        Ok(PipelineConfig {
            directories,
            extensions,
            solver_executable: self
                .solver_executable
                .ok_or(ConfigError::MissingParameter("solver_executable"))?,
            solvent_header,
            vacuum_header,
            summary_path: self
                .summary_path
                .ok_or(ConfigError::MissingParameter("summary_path"))?,
            stop_on_solver_failure: self.stop_on_solver_failure,
        })
    }
}

/// Rejects zero, negatives, NaN and infinities.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_header(name: &'static str, header: &ConditionHeader) -> Result<(), ConfigError> {
    if header.method.trim().is_empty() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "method must not be empty".to_string(),
        });
    }
    if spin_keyword(header.multiplicity).is_none() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("unsupported multiplicity {}", header.multiplicity),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::condition::SolventModel;

    fn complete_builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
            .geometry_dir(PathBuf::from("xyz"))
            .solvent_dir(PathBuf::from("COSMO"))
            .vacuum_dir(PathBuf::from("PM7"))
            .quarantine_dir(PathBuf::from("errorfiles"))
            .solver_executable(PathBuf::from("/opt/mopac/MOPAC2016.exe"))
            .summary_path(PathBuf::from("SolvatE.dat"))
    }

    #[test]
    fn build_uses_default_headers_and_extensions() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.solvent_header, ConditionHeader::default_solvent());
        assert_eq!(config.vacuum_header, ConditionHeader::default_vacuum());
        assert_eq!(config.extensions, FileExtensions::default());
        assert_eq!(config.extensions.deck, "mop");
        assert_eq!(config.extensions.report, "out");
        assert!(!config.stop_on_solver_failure);
        assert!(config.directories.prior_report_dir.is_none());
    }

    #[test]
    fn condition_accessors_select_matching_values() {
        let config = complete_builder().build().unwrap();
        assert_eq!(
            config.directories.condition_dir(Condition::Solvent),
            Path::new("COSMO")
        );
        assert_eq!(
            config.directories.condition_dir(Condition::Vacuum),
            Path::new("PM7")
        );
        assert!(config.header(Condition::Solvent).solvent.is_some());
        assert!(config.header(Condition::Vacuum).solvent.is_none());
    }

    #[test]
    fn build_fails_when_required_parameter_missing() {
        let err = PipelineConfigBuilder::new()
            .solvent_dir(PathBuf::from("a"))
            .vacuum_dir(PathBuf::from("b"))
            .quarantine_dir(PathBuf::from("c"))
            .summary_path(PathBuf::from("s.dat"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("solver_executable"));

        let err = PipelineConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("solvent_dir"));
    }

    #[test]
    fn build_rejects_shared_condition_directory() {
        let err = complete_builder()
            .vacuum_dir(PathBuf::from("COSMO"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "vacuum_dir",
                ..
            }
        ));
    }

    #[test]
    fn build_rejects_solvent_header_without_model() {
        let err = complete_builder()
            .solvent_header(ConditionHeader::default_vacuum())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "solvent_header",
                ..
            }
        ));
    }

    #[test]
    fn build_rejects_vacuum_header_with_model() {
        let err = complete_builder()
            .vacuum_header(ConditionHeader::default_solvent())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "vacuum_header",
                ..
            }
        ));
    }

    #[test]
    fn build_rejects_non_physical_solvent_model() {
        let mut header = ConditionHeader::default_solvent();
        header.solvent = Some(SolventModel {
            dielectric_constant: 0.0,
            solvent_radius: 1.3,
        });
        assert!(complete_builder().solvent_header(header).build().is_err());
    }

    #[test]
    fn build_rejects_nan_and_infinite_solvent_parameters() {
        for (eps, radius) in [(f64::NAN, 1.3), (34.8, f64::NAN), (f64::INFINITY, 1.3)] {
            let mut header = ConditionHeader::default_solvent();
            header.solvent = Some(SolventModel {
                dielectric_constant: eps,
                solvent_radius: radius,
            });
            let err = complete_builder().solvent_header(header).build().unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::InvalidParameter {
                        name: "solvent_header",
                        ..
                    }
                ),
                "EPS={eps} RSOLV={radius} should be rejected"
            );
        }
    }

    #[test]
    fn build_rejects_unsupported_multiplicity() {
        let mut header = ConditionHeader::default_vacuum();
        header.multiplicity = 0;
        assert!(complete_builder().vacuum_header(header).build().is_err());
    }

    #[test]
    fn build_rejects_bad_extensions() {
        let dotted = FileExtensions {
            report: ".out".to_string(),
            ..FileExtensions::default()
        };
        assert!(complete_builder().extensions(dotted).build().is_err());

        let clashing = FileExtensions {
            deck: "out".to_string(),
            ..FileExtensions::default()
        };
        assert!(complete_builder().extensions(clashing).build().is_err());
    }
}

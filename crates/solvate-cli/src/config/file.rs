use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDirectories {
    pub geometry: Option<PathBuf>,
    pub prior_reports: Option<PathBuf>,
    pub solvent: Option<PathBuf>,
    pub vacuum: Option<PathBuf>,
    pub quarantine: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolverConfig {
    pub executable: Option<PathBuf>,
    pub stop_on_failure: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolventCondition {
    pub method: Option<String>,
    pub charge: Option<i32>,
    pub multiplicity: Option<u8>,
    pub dielectric_constant: Option<f64>,
    pub solvent_radius: Option<f64>,
    pub extra_keywords: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileVacuumCondition {
    pub method: Option<String>,
    pub charge: Option<i32>,
    pub multiplicity: Option<u8>,
    pub extra_keywords: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConditions {
    pub solvent: Option<FileSolventCondition>,
    pub vacuum: Option<FileVacuumCondition>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSummaryConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub directories: Option<FileDirectories>,
    pub solver: Option<FileSolverConfig>,
    pub conditions: Option<FileConditions>,
    pub summary: Option<FileSummaryConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

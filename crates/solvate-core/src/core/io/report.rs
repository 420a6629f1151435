use super::has_extension;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Default extension of solver text reports.
pub const REPORT_EXTENSION: &str = "out";

/// Substring identifying the line that carries the total energy.
pub const ENERGY_MARKER: &str = "TOTAL ENERGY";

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.\d+").expect("decimal pattern is valid"));

/// The total energy read from a report, kept together with its source text so
/// tables can reproduce the value exactly as the solver printed it.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalEnergy {
    pub value: f64,
    pub text: String,
}

impl TotalEnergy {
    /// Number of digits after the decimal point in the printed value.
    pub fn decimals(&self) -> usize {
        self.text
            .split_once('.')
            .map_or(0, |(_, fraction)| fraction.len())
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("'{}' is not a solver report", .0.display())]
    NotAReport(PathBuf),
    #[error("No line containing 'TOTAL ENERGY' was found")]
    MissingEnergySection,
    #[error("No decimal number found on energy line '{line}'")]
    UnparseableEnergyValue { line: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Scans report text for the first line containing [`ENERGY_MARKER`] and returns
/// the first decimal number on that line.
///
/// # Errors
///
/// * [`ExtractError::MissingEnergySection`] if no line contains the marker.
/// * [`ExtractError::UnparseableEnergyValue`] if the marker line holds no decimal number.
pub fn extract_total_energy(text: &str) -> Result<TotalEnergy, ExtractError> {
    let line = text
        .lines()
        .find(|line| line.contains(ENERGY_MARKER))
        .ok_or(ExtractError::MissingEnergySection)?;

    let unparseable = || ExtractError::UnparseableEnergyValue {
        line: line.trim().to_string(),
    };
    let token = DECIMAL_RE.find(line).ok_or_else(unparseable)?.as_str();
    let value = token.parse::<f64>().map_err(|_| unparseable())?;

    Ok(TotalEnergy {
        value,
        text: token.to_string(),
    })
}

/// Reads the report at `path` and extracts its total energy.
///
/// Files whose extension differs from `report_extension` are rejected with
/// [`ExtractError::NotAReport`] without being opened. Report bytes that are not
/// valid UTF-8 are decoded lossily.
pub fn extract_from_path(path: &Path, report_extension: &str) -> Result<TotalEnergy, ExtractError> {
    if !has_extension(path, report_extension) {
        return Err(ExtractError::NotAReport(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    extract_total_energy(&String::from_utf8_lossy(&bytes))
}

use crate::core::models::geometry::{Atom, MolecularGeometry};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: GeometryParseErrorKind,
    },
    #[error("Expected {expected} atom records but found only {found}")]
    Truncated { expected: usize, found: usize },
    #[error("Missing required section: {0}")]
    MissingSection(String),
    #[error("Coordinate block contains no atoms")]
    Empty,
}

#[derive(Debug, Error)]
pub enum GeometryParseErrorKind {
    #[error("Atom count must be a positive integer (value: '{value}')")]
    InvalidAtomCount { value: String },
    #[error("Invalid float format for {field} coordinate (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Required field '{field}' is missing")]
    MissingField { field: &'static str },
}

/// Defines the interface for reading a molecular geometry from a source format.
///
/// Every implementor produces the same canonical [`MolecularGeometry`], so the
/// rest of the pipeline never needs to know where a geometry came from.
pub trait GeometrySource {
    /// The conventional file extension of the format, without the leading dot.
    const EXTENSION: &'static str;

    /// Reads a geometry from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the text cannot be parsed as this format or
    /// the underlying reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<MolecularGeometry, GeometryError>;

    /// Reads a geometry from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MolecularGeometry, GeometryError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Parses a whitespace-separated `<element> <x> <y> <z>` record.
///
/// Tokens after the third coordinate are ignored.
pub(crate) fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, GeometryError> {
    let mut fields = line.split_whitespace();
    let element = fields.next().ok_or(GeometryError::Parse {
        line: line_num,
        kind: GeometryParseErrorKind::MissingField { field: "element" },
    })?;

    let mut coords = [0.0f64; 3];
    for (slot, field) in coords.iter_mut().zip(["x", "y", "z"]) {
        let token = fields.next().ok_or(GeometryError::Parse {
            line: line_num,
            kind: GeometryParseErrorKind::MissingField { field },
        })?;
        *slot = token.parse().map_err(|_| GeometryError::Parse {
            line: line_num,
            kind: GeometryParseErrorKind::InvalidFloat {
                field,
                value: token.to_string(),
            },
        })?;
    }

    Ok(Atom::new(element, Point3::from(coords)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_atom_line_reads_element_and_coordinates() {
        let atom = parse_atom_line("  C   0.5  -1.25   2.0", 3).unwrap();
        assert_eq!(atom.element, "C");
        assert_eq!(atom.position, Point3::new(0.5, -1.25, 2.0));
    }

    #[test]
    fn parse_atom_line_ignores_trailing_columns() {
        let atom = parse_atom_line("H 1.0 2.0 3.0 0.123 extra", 1).unwrap();
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn parse_atom_line_rejects_non_numeric_coordinate() {
        let err = parse_atom_line("O 1.0 abc 3.0", 7).unwrap_err();
        match err {
            GeometryError::Parse {
                line,
                kind: GeometryParseErrorKind::InvalidFloat { field, value },
            } => {
                assert_eq!(line, 7);
                assert_eq!(field, "y");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_atom_line_rejects_missing_coordinate() {
        let err = parse_atom_line("N 1.0 2.0", 2).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Parse {
                kind: GeometryParseErrorKind::MissingField { field: "z" },
                ..
            }
        ));
    }

    #[test]
    fn parse_atom_line_rejects_blank_line() {
        let err = parse_atom_line("   ", 4).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Parse {
                kind: GeometryParseErrorKind::MissingField { field: "element" },
                ..
            }
        ));
    }
}

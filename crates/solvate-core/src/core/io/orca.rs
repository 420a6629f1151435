use super::traits::{GeometryError, GeometrySource, parse_atom_line};
use crate::core::models::geometry::MolecularGeometry;
use std::io::BufRead;

/// Title of the block holding Cartesian coordinates in Angstroms.
pub const CARTESIAN_HEADER: &str = "CARTESIAN COORDINATES (ANGSTROEM)";

/// Geometries re-read from the text report of an earlier solver stage.
///
/// A report may print the coordinate block many times (once per optimization
/// cycle); only the last block is read, since it holds the final geometry:
///
/// ```text
/// ---------------------------------
/// CARTESIAN COORDINATES (ANGSTROEM)
/// ---------------------------------
///   C      0.000000    0.000000    0.000000
///   H      0.000000    0.000000    1.089000
///
/// ----------------------------
/// CARTESIAN COORDINATES (A.U.)
/// ----------------------------
/// ```
///
/// The block starts after the rule underlining the title and ends at the next
/// horizontal rule. Blank lines inside the block are skipped.
pub struct OrcaOutputFile;

impl GeometrySource for OrcaOutputFile {
    const EXTENSION: &'static str = "out";

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularGeometry, GeometryError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

        let header_idx = lines
            .iter()
            .rposition(|line| line.contains(CARTESIAN_HEADER))
            .ok_or_else(|| GeometryError::MissingSection(CARTESIAN_HEADER.to_string()))?;

        let mut start = header_idx + 1;
        if lines.get(start).is_some_and(|line| is_horizontal_rule(line)) {
            start += 1;
        }

        let mut atoms = Vec::new();
        for (offset, line) in lines[start..].iter().enumerate() {
            if is_horizontal_rule(line) {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            atoms.push(parse_atom_line(line, start + offset + 1)?);
        }

        if atoms.is_empty() {
            return Err(GeometryError::Empty);
        }
        Ok(MolecularGeometry::new(atoms))
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

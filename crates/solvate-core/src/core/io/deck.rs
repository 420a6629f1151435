use super::traits::{GeometryError, parse_atom_line};
use crate::core::models::condition::{Condition, ConditionHeader};
use crate::core::models::geometry::{Atom, MolecularGeometry};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default extension of solver input decks.
pub const DECK_EXTENSION: &str = "mop";

/// Lines between the keyword line and the first atom record (title and comment).
const HEADER_LINES: usize = 3;

const COORDINATE_DECIMALS: usize = 8;

/// Optimization flag written after every coordinate. The flag marks the
/// coordinate as free in the solver's syntax; `1SCF` in the header still keeps
/// the run a single-point evaluation.
const COORDINATE_FLAG: &str = "1";

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Failed to write input deck '{path}': {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A solver input deck on disk, identified by molecule and condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeck {
    pub molecule: String,
    pub condition: Condition,
    pub path: PathBuf,
}

impl InputDeck {
    /// Describes the deck `<dir>/<molecule>.<extension>` without touching the disk.
    pub fn new(molecule: &str, condition: Condition, dir: &Path, extension: &str) -> Self {
        Self {
            molecule: molecule.to_string(),
            condition,
            path: dir.join(format!("{molecule}.{extension}")),
        }
    }

    /// Creates or overwrites the deck file. The parent directory must exist.
    pub fn write(
        &self,
        geometry: &MolecularGeometry,
        header: &ConditionHeader,
    ) -> Result<(), DeckError> {
        let to_error = |source| DeckError::Write {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(to_error)?;
        let mut writer = BufWriter::new(file);
        write_to(geometry, header, &mut writer).map_err(to_error)?;
        writer.flush().map_err(to_error)
    }
}

/// Renders a deck: the keyword line, two blank lines, then one
/// `<element>  <x> 1 <y> 1 <z> 1` record per atom.
pub fn write_to(
    geometry: &MolecularGeometry,
    header: &ConditionHeader,
    writer: &mut impl Write,
) -> io::Result<()> {
    write!(writer, "{}\n\n\n", header.keywords())?;
    for atom in geometry.atoms() {
        let p = atom.position;
        writeln!(
            writer,
            "{}  {:.prec$} {flag} {:.prec$} {flag} {:.prec$} {flag}",
            atom.element,
            p.x,
            p.y,
            p.z,
            prec = COORDINATE_DECIMALS,
            flag = COORDINATE_FLAG,
        )?;
    }
    Ok(())
}

/// Reads the atom records back out of a deck written by [`write_to`].
pub fn read_atom_records(reader: &mut impl BufRead) -> Result<MolecularGeometry, GeometryError> {
    let mut atoms = Vec::new();
    for (idx, line) in reader.lines().enumerate().skip(HEADER_LINES) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        atoms.push(parse_deck_record(&line, idx + 1)?);
    }
    Ok(MolecularGeometry::new(atoms))
}

/// A deck record is `<el> <x> 1 <y> 1 <z> 1`; the optimization flags are
/// dropped and the rest parses as a plain atom line.
fn parse_deck_record(line: &str, line_num: usize) -> Result<Atom, GeometryError> {
    let columns: Vec<&str> = line
        .split_whitespace()
        .enumerate()
        .filter(|(i, _)| matches!(i, 0 | 1 | 3 | 5))
        .map(|(_, token)| token)
        .collect();
    parse_atom_line(&columns.join(" "), line_num)
}

use super::traits::{GeometryError, GeometryParseErrorKind, GeometrySource, parse_atom_line};
use crate::core::models::geometry::MolecularGeometry;
use std::io::BufRead;

/// Raw Cartesian coordinate files.
///
/// ```text
/// 3
/// water
/// O   0.000000   0.000000   0.117300
/// H   0.000000   0.757200  -0.469200
/// H   0.000000  -0.757200  -0.469200
/// ```
///
/// The first line declares the atom count, the second is a free-form title, and
/// exactly that many atom records follow. Lines after the last declared atom are
/// not read.
pub struct XyzFile;

impl GeometrySource for XyzFile {
    const EXTENSION: &'static str = "xyz";

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularGeometry, GeometryError> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.unwrap_or_default();
        let count_str = count_line.trim();
        let expected: usize = match count_str.parse() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(GeometryError::Parse {
                    line: 1,
                    kind: GeometryParseErrorKind::InvalidAtomCount {
                        value: count_str.to_string(),
                    },
                });
            }
        };

        if lines.next().transpose()?.is_none() {
            return Err(GeometryError::Truncated { expected, found: 0 });
        }

        let mut atoms = Vec::new();
        for index in 0..expected {
            let Some(line) = lines.next().transpose()? else {
                return Err(GeometryError::Truncated {
                    expected,
                    found: index,
                });
            };
            atoms.push(parse_atom_line(&line, index + 3)?);
        }

        Ok(MolecularGeometry::new(atoms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WATER: &str = "3\nwater molecule\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";

    fn read(content: &str) -> Result<MolecularGeometry, GeometryError> {
        XyzFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_well_formed_file() {
        let geom = read(WATER).unwrap();
        assert_eq!(geom.len(), 3);
        assert_eq!(geom.elements().collect::<Vec<_>>(), vec!["O", "H", "H"]);
        assert_eq!(geom.atoms()[2].position, Point3::new(0.0, -0.7572, -0.4692));
    }

    #[test]
    fn ignores_lines_after_declared_atoms() {
        let content = format!("{WATER}this is not an atom\n");
        assert_eq!(read(&content).unwrap().len(), 3);
    }

    #[test]
    fn tolerates_padding_around_atom_count() {
        let geom = read("  1  \n\nHe 0 0 0").unwrap();
        assert_eq!(geom.len(), 1);
        assert_eq!(geom.atoms()[0].element, "He");
    }

    #[test]
    fn rejects_fewer_atom_lines_than_declared() {
        let err = read("4\ntitle\nC 0 0 0\nH 0 0 1\n").unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Truncated {
                expected: 4,
                found: 2
            }
        ));
    }

    #[test]
    fn huge_declared_count_is_truncated_not_allocated() {
        for count in [usize::MAX.to_string(), "100000000000".to_string()] {
            let err = read(&format!("{count}\ntitle\nC 0 0 0\n")).unwrap_err();
            assert!(
                matches!(err, GeometryError::Truncated { found: 1, .. }),
                "count {count} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_missing_title_line() {
        let err = read("2\n").unwrap_err();
        assert!(matches!(err, GeometryError::Truncated { found: 0, .. }));
    }

    #[test]
    fn rejects_non_numeric_atom_count() {
        for bad in ["three\ntitle\n", "0\ntitle\n", "-2\ntitle\n", ""] {
            let err = read(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    GeometryError::Parse {
                        line: 1,
                        kind: GeometryParseErrorKind::InvalidAtomCount { .. }
                    }
                ),
                "input {bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_coordinate_with_line_number() {
        let err = read("2\ntitle\nC 0 0 0\nH 0 x 1\n").unwrap_err();
        assert!(matches!(err, GeometryError::Parse { line: 4, .. }));
    }

    #[test]
    fn read_from_path_opens_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.xyz");
        fs::write(&path, WATER).unwrap();
        assert_eq!(XyzFile::read_from_path(&path).unwrap().len(), 3);
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = XyzFile::read_from_path(dir.path().join("absent.xyz")).unwrap_err();
        assert!(matches!(err, GeometryError::Io(_)));
    }
}

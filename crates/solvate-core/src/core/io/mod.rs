//! Provides input/output functionality for the text formats exchanged with the solver.
//!
//! Geometries enter the pipeline either as raw Cartesian coordinates ([`xyz`]) or as
//! the final coordinate block of a previous solver run ([`orca`]). Both are rendered
//! into solver input decks ([`deck`]), and the solver's text reports are scanned for
//! their total energy ([`report`]).

pub mod deck;
pub mod orca;
pub mod report;
pub mod traits;
pub mod xyz;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Derives the molecule identifier shared by every file of one molecule: the
/// file name with its extension stripped (`benzene.xyz` -> `benzene`).
pub fn molecule_id(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Returns `true` if the path carries the given extension (ASCII case-insensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Lists the regular files directly inside `dir`, sorted by file name so batch
/// runs visit molecules in a reproducible order.
pub fn sorted_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn molecule_id_strips_extension() {
        assert_eq!(molecule_id(Path::new("dir/benzene.xyz")).as_deref(), Some("benzene"));
        assert_eq!(molecule_id(Path::new("a.b.out")).as_deref(), Some("a.b"));
        assert_eq!(molecule_id(Path::new("plain")).as_deref(), Some("plain"));
        assert_eq!(molecule_id(Path::new("")), None);
    }

    #[test]
    fn has_extension_ignores_case() {
        assert!(has_extension(Path::new("x/benzene.OUT"), "out"));
        assert!(has_extension(Path::new("benzene.out"), "out"));
        assert!(!has_extension(Path::new("benzene.arc"), "out"));
        assert!(!has_extension(Path::new("benzene"), "out"));
    }

    #[test]
    fn sorted_files_lists_only_files_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.out"), "").unwrap();
        fs::write(dir.path().join("a.out"), "").unwrap();
        fs::create_dir(dir.path().join("c.out")).unwrap();

        let files = sorted_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.out"), dir.path().join("b.out")]);
    }

    #[test]
    fn sorted_files_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(sorted_files(&dir.path().join("missing")).is_err());
    }
}

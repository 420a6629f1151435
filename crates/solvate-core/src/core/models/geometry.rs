use nalgebra::Point3;

/// A single atom of a molecular geometry.
///
/// Atoms carry only what the solver input decks need: the element symbol as
/// written in the source file and the Cartesian position in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "Cl"). Never empty.
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }
}

/// An ordered, immutable sequence of atoms read from one source file.
///
/// The order of atoms is the order in which they appear in the source and is
/// preserved when the geometry is rendered into an input deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularGeometry {
    atoms: Vec<Atom>,
}

impl MolecularGeometry {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the element symbols in atom order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(|a| a.element.as_str())
    }
}

impl FromIterator<Atom> for MolecularGeometry {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

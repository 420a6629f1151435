use std::fmt;

/// One of the two physical environments a molecule is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    /// Implicit dielectric medium (COSMO-style continuum solvation).
    Solvent,
    /// Isolated molecule, no surrounding medium.
    Vacuum,
}

impl Condition {
    /// Both conditions in the order the pipeline processes them.
    pub const ALL: [Condition; 2] = [Condition::Solvent, Condition::Vacuum];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Solvent => "solvent",
            Condition::Vacuum => "vacuum",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Continuum solvent parameters appended to the solvent-condition header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolventModel {
    /// Relative dielectric constant of the medium (`EPS=`).
    pub dielectric_constant: f64,
    /// Effective solvent radius in Angstroms used to build the cavity (`RSOLV=`).
    pub solvent_radius: f64,
}

/// The keyword directive that opens every input deck of a condition.
///
/// The pipeline only performs single-point evaluations, so the rendered keyword
/// line always requests one SCF cycle (`1SCF`) and never a geometry optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionHeader {
    /// Semi-empirical Hamiltonian (e.g., "PM7").
    pub method: String,
    /// Net molecular charge.
    pub charge: i32,
    /// Spin multiplicity (1 = singlet, 2 = doublet, ...).
    pub multiplicity: u8,
    /// Present only for the solvent condition.
    pub solvent: Option<SolventModel>,
    /// Additional raw keywords appended verbatim before the spin keyword.
    pub extra_keywords: Vec<String>,
}

impl ConditionHeader {
    /// PM7 single point in a COSMO continuum with the default solvent parameters:
    /// `PM7 1SCF EPS=34.8 CHARGE=0 RSOLV=1.3 SINGLET`.
    pub fn default_solvent() -> Self {
        Self {
            method: "PM7".to_string(),
            charge: 0,
            multiplicity: 1,
            solvent: Some(SolventModel {
                dielectric_constant: 34.8,
                solvent_radius: 1.3,
            }),
            extra_keywords: Vec::new(),
        }
    }

    /// PM7 single point in the gas phase: `PM7 1SCF CHARGE=0 SINGLET`.
    pub fn default_vacuum() -> Self {
        Self {
            solvent: None,
            ..Self::default_solvent()
        }
    }

    /// Renders the single keyword line of the deck (without trailing newline).
    pub fn keywords(&self) -> String {
        let mut tokens = vec![self.method.clone(), "1SCF".to_string()];
        if let Some(solvent) = &self.solvent {
            tokens.push(format!("EPS={}", solvent.dielectric_constant));
        }
        tokens.push(format!("CHARGE={}", self.charge));
        if let Some(solvent) = &self.solvent {
            tokens.push(format!("RSOLV={}", solvent.solvent_radius));
        }
        tokens.extend(self.extra_keywords.iter().cloned());
        if let Some(spin) = spin_keyword(self.multiplicity) {
            tokens.push(spin.to_string());
        }
        tokens.join(" ")
    }
}

impl fmt::Display for ConditionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords())
    }
}

/// Maps a spin multiplicity onto the solver's spin-state keyword.
pub fn spin_keyword(multiplicity: u8) -> Option<&'static str> {
    match multiplicity {
        1 => Some("SINGLET"),
        2 => Some("DOUBLET"),
        3 => Some("TRIPLET"),
        4 => Some("QUARTET"),
        5 => Some("QUINTET"),
        6 => Some("SEXTET"),
        7 => Some("SEPTET"),
        8 => Some("OCTET"),
        9 => Some("NONET"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_solvent_header_renders_cosmo_keywords() {
        assert_eq!(
            ConditionHeader::default_solvent().keywords(),
            "PM7 1SCF EPS=34.8 CHARGE=0 RSOLV=1.3 SINGLET"
        );
    }

    #[test]
    fn default_vacuum_header_has_no_solvent_keywords() {
        let header = ConditionHeader::default_vacuum();
        assert_eq!(header.keywords(), "PM7 1SCF CHARGE=0 SINGLET");
        assert!(header.solvent.is_none());
    }

    #[test]
    fn extra_keywords_and_spin_are_rendered() {
        let header = ConditionHeader {
            method: "PM6".to_string(),
            charge: -1,
            multiplicity: 2,
            solvent: None,
            extra_keywords: vec!["UHF".to_string()],
        };
        assert_eq!(header.to_string(), "PM6 1SCF CHARGE=-1 UHF DOUBLET");
    }

    #[test]
    fn spin_keyword_rejects_out_of_range_multiplicity() {
        assert_eq!(spin_keyword(0), None);
        assert_eq!(spin_keyword(3), Some("TRIPLET"));
        assert_eq!(spin_keyword(10), None);
    }

    #[test]
    fn condition_labels_are_lowercase() {
        assert_eq!(Condition::Solvent.to_string(), "solvent");
        assert_eq!(Condition::Vacuum.label(), "vacuum");
        assert_eq!(Condition::ALL, [Condition::Solvent, Condition::Vacuum]);
    }
}

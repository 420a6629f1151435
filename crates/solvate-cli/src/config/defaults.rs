use solvate::core::models::condition::ConditionHeader;

pub struct DefaultsConfig {
    pub geometry_dir: String,
    pub prior_report_dir: String,
    pub solvent_dir: String,
    pub vacuum_dir: String,
    pub quarantine_dir: String,
    pub summary_path: String,
    pub solver_executable: String,
    pub stop_on_failure: bool,
    pub solvent_header: ConditionHeader,
    pub vacuum_header: ConditionHeader,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            geometry_dir: "xyz".to_string(),
            prior_report_dir: "out".to_string(),
            solvent_dir: "COSMO".to_string(),
            vacuum_dir: "PM7".to_string(),
            quarantine_dir: "errorfiles".to_string(),
            summary_path: "SolvatE.dat".to_string(),
            solver_executable: "MOPAC2016.exe".to_string(),
            stop_on_failure: false,
            solvent_header: ConditionHeader::default_solvent(),
            vacuum_header: ConditionHeader::default_vacuum(),
        }
    }
}

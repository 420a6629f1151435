use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Solvate CLI - Batch solvation energies from paired implicit-solvent and vacuum semi-empirical calculations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate decks, run the solver over them and write the summary table.
    Run(PipelineArgs),
    /// Generate solvent and vacuum input decks from the geometry sources.
    Prepare(PipelineArgs),
    /// Run the solver over every deck present in the solvent and vacuum directories.
    Execute(PipelineArgs),
    /// Build the summary table from the reports on disk.
    Summarize(PipelineArgs),
}

/// Options shared by every pipeline stage.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Directory Overrides ---
    /// Directory of raw-coordinate geometry files.
    #[arg(long, value_name = "DIR")]
    pub geometry_dir: Option<PathBuf>,

    /// Directory of prior solver reports to re-read geometries from.
    #[arg(long, value_name = "DIR")]
    pub prior_report_dir: Option<PathBuf>,

    /// Directory for solvent-condition decks and reports.
    #[arg(long, value_name = "DIR")]
    pub solvent_dir: Option<PathBuf>,

    /// Directory for vacuum-condition decks and reports.
    #[arg(long, value_name = "DIR")]
    pub vacuum_dir: Option<PathBuf>,

    /// Directory receiving copies of corrupted reports.
    #[arg(long, value_name = "DIR")]
    pub quarantine_dir: Option<PathBuf>,

    // --- Solver Overrides ---
    /// Path to the solver executable.
    #[arg(short = 'x', long = "solver", value_name = "PATH")]
    pub solver_executable: Option<PathBuf>,

    /// Abort on the first failed solver invocation instead of moving on.
    #[arg(long)]
    pub stop_on_failure: bool,

    // --- Output Overrides ---
    /// Path of the summary table.
    #[arg(short = 'o', long = "summary", value_name = "PATH")]
    pub summary_path: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S conditions.solvent.dielectric-constant=78.4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "solvate",
            "-vv",
            "run",
            "--solver",
            "/opt/mopac/MOPAC2016.exe",
            "--solvent-dir",
            "cosmo",
            "--stop-on-failure",
            "-S",
            "conditions.solvent.charge=-1",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected 'run' subcommand");
        };
        assert_eq!(
            args.solver_executable,
            Some(PathBuf::from("/opt/mopac/MOPAC2016.exe"))
        );
        assert_eq!(args.solvent_dir, Some(PathBuf::from("cosmo")));
        assert!(args.stop_on_failure);
        assert_eq!(args.set_values, vec!["conditions.solvent.charge=-1"]);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["solvate", "summarize", "--quiet", "--log-file", "x.log"])
            .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_file, Some(PathBuf::from("x.log")));
        assert!(matches!(cli.command, Commands::Summarize(_)));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["solvate", "-q", "-v", "prepare"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["solvate"]).is_err());
    }
}

use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSolventCondition, FileVacuumCondition};
use crate::cli::PipelineArgs;
use crate::error::{CliError, Result};
use solvate::core::models::condition::ConditionHeader;
use solvate::engine::config::{PipelineConfig, PipelineConfigBuilder};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let dirs_file = file_config.directories.take().unwrap_or_default();
    let geometry_dir = resolve_source_dir(
        args.geometry_dir.as_deref(),
        dirs_file.geometry.as_deref(),
        &defaults.geometry_dir,
    );
    let prior_report_dir = resolve_source_dir(
        args.prior_report_dir.as_deref(),
        dirs_file.prior_reports.as_deref(),
        &defaults.prior_report_dir,
    );
    let solvent_dir = resolve_path(
        args.solvent_dir.as_ref(),
        dirs_file.solvent,
        &defaults.solvent_dir,
    );
    let vacuum_dir = resolve_path(
        args.vacuum_dir.as_ref(),
        dirs_file.vacuum,
        &defaults.vacuum_dir,
    );
    let quarantine_dir = resolve_path(
        args.quarantine_dir.as_ref(),
        dirs_file.quarantine,
        &defaults.quarantine_dir,
    );

    let solver_file = file_config.solver.take().unwrap_or_default();
    let solver_executable = resolve_path(
        args.solver_executable.as_ref(),
        solver_file.executable,
        &defaults.solver_executable,
    );
    let stop_on_failure = args.stop_on_failure
        || solver_file
            .stop_on_failure
            .unwrap_or(defaults.stop_on_failure);

    let summary_file = file_config.summary.take().unwrap_or_default();
    let summary_path = resolve_path(
        args.summary_path.as_ref(),
        summary_file.path,
        &defaults.summary_path,
    );

    let conditions_file = file_config.conditions.take().unwrap_or_default();
    let solvent_header = merge_solvent_header(conditions_file.solvent, &defaults.solvent_header);
    let vacuum_header = merge_vacuum_header(conditions_file.vacuum, &defaults.vacuum_header);

    let mut builder = PipelineConfigBuilder::new()
        .solvent_dir(solvent_dir)
        .vacuum_dir(vacuum_dir)
        .quarantine_dir(quarantine_dir)
        .solver_executable(solver_executable)
        .stop_on_solver_failure(stop_on_failure)
        .summary_path(summary_path)
        .solvent_header(solvent_header)
        .vacuum_header(vacuum_header);
    if let Some(dir) = geometry_dir {
        builder = builder.geometry_dir(dir);
    }
    if let Some(dir) = prior_report_dir {
        builder = builder.prior_report_dir(dir);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_path(cli_arg: Option<&PathBuf>, file_arg: Option<PathBuf>, default_arg: &str) -> PathBuf {
    cli_arg
        .cloned()
        .or(file_arg)
        .unwrap_or_else(|| PathBuf::from(default_arg))
}

/// Explicitly configured source directories are always used, so a missing one
/// fails loudly later on. The default location is only used when it exists.
fn resolve_source_dir(
    cli_arg: Option<&Path>,
    file_arg: Option<&Path>,
    default_arg: &str,
) -> Option<PathBuf> {
    if let Some(dir) = cli_arg.or(file_arg) {
        return Some(dir.to_path_buf());
    }
    let default_dir = PathBuf::from(default_arg);
    if default_dir.is_dir() {
        Some(default_dir)
    } else {
        debug!(
            "Default source directory {:?} does not exist; skipping it.",
            default_dir
        );
        None
    }
}

fn merge_solvent_header(
    file_val: Option<FileSolventCondition>,
    defaults: &ConditionHeader,
) -> ConditionHeader {
    let file_val = file_val.unwrap_or_default();
    let mut header = defaults.clone();
    if let Some(method) = file_val.method {
        header.method = method;
    }
    header.charge = file_val.charge.unwrap_or(header.charge);
    header.multiplicity = file_val.multiplicity.unwrap_or(header.multiplicity);
    if let Some(keywords) = file_val.extra_keywords {
        header.extra_keywords = keywords;
    }
    if let Some(model) = header.solvent.as_mut() {
        model.dielectric_constant = file_val
            .dielectric_constant
            .unwrap_or(model.dielectric_constant);
        model.solvent_radius = file_val.solvent_radius.unwrap_or(model.solvent_radius);
    }
    header
}

fn merge_vacuum_header(
    file_val: Option<FileVacuumCondition>,
    defaults: &ConditionHeader,
) -> ConditionHeader {
    let file_val = file_val.unwrap_or_default();
    let mut header = defaults.clone();
    if let Some(method) = file_val.method {
        header.method = method;
    }
    header.charge = file_val.charge.unwrap_or(header.charge);
    header.multiplicity = file_val.multiplicity.unwrap_or(header.multiplicity);
    if let Some(keywords) = file_val.extra_keywords {
        header.extra_keywords = keywords;
    }
    header
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "directories.geometry"
            | "directories.prior-reports"
            | "directories.solvent"
            | "directories.vacuum"
            | "directories.quarantine" => {
                let dirs = config.directories.get_or_insert_with(Default::default);
                let path = Some(PathBuf::from(value_str));
                match key {
                    "directories.geometry" => dirs.geometry = path,
                    "directories.prior-reports" => dirs.prior_reports = path,
                    "directories.solvent" => dirs.solvent = path,
                    "directories.vacuum" => dirs.vacuum = path,
                    _ => dirs.quarantine = path,
                }
            }
            "solver.executable" => {
                config.solver.get_or_insert_with(Default::default).executable =
                    Some(PathBuf::from(value_str));
            }
            "solver.stop-on-failure" => {
                config
                    .solver
                    .get_or_insert_with(Default::default)
                    .stop_on_failure = Some(parse_value(key, value_str, "boolean")?);
            }
            "summary.path" => {
                config.summary.get_or_insert_with(Default::default).path =
                    Some(PathBuf::from(value_str));
            }
            "conditions.solvent.method" => {
                solvent_condition(&mut config).method = Some(value_str.to_string());
            }
            "conditions.solvent.charge" => {
                solvent_condition(&mut config).charge =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "conditions.solvent.multiplicity" => {
                solvent_condition(&mut config).multiplicity =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "conditions.solvent.dielectric-constant" => {
                solvent_condition(&mut config).dielectric_constant =
                    Some(parse_value(key, value_str, "float")?);
            }
            "conditions.solvent.solvent-radius" => {
                solvent_condition(&mut config).solvent_radius =
                    Some(parse_value(key, value_str, "float")?);
            }
            "conditions.vacuum.method" => {
                vacuum_condition(&mut config).method = Some(value_str.to_string());
            }
            "conditions.vacuum.charge" => {
                vacuum_condition(&mut config).charge =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "conditions.vacuum.multiplicity" => {
                vacuum_condition(&mut config).multiplicity =
                    Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn solvent_condition(config: &mut FileConfig) -> &mut FileSolventCondition {
    config
        .conditions
        .get_or_insert_with(Default::default)
        .solvent
        .get_or_insert_with(Default::default)
}

fn vacuum_condition(config: &mut FileConfig) -> &mut FileVacuumCondition {
    config
        .conditions
        .get_or_insert_with(Default::default)
        .vacuum
        .get_or_insert_with(Default::default)
}

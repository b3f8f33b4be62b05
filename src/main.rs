use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cibguard::cli::{Cli, Command, PropertyCli, PropertyCommand};
use cibguard::core::error::CibGuardError;
use cibguard::core::output;
use cibguard::core::preprocessor::ReportPreprocessor;
use cibguard::core::property;
use cibguard::core::reports::{self, ReportItem, Severity};
use cibguard::core::snapshot::ClusterSnapshot;

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Property(property_cli) => run_property_cli(property_cli),
    }
}

fn run_property_cli(cli: PropertyCli) -> Result<()> {
    match cli.command {
        PropertyCommand::ValidateSet {
            snapshot,
            properties,
            force,
            format,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let pairs = parse_property_pairs(&properties)?;
            let report_list = property::validate_set_cluster_properties(
                &snapshot.agents,
                &snapshot,
                &pairs,
                force,
            );
            render_outcome(&snapshot, report_list, &format)
        }
        PropertyCommand::ValidateRemove {
            snapshot,
            properties,
            set_id,
            force,
            format,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let report_list = property::validate_remove_cluster_properties(
                &snapshot.configured_properties,
                &set_id,
                &snapshot,
                &properties,
                force,
            );
            render_outcome(&snapshot, report_list, &format)
        }
    }
}

fn load_snapshot(path: &Path) -> Result<ClusterSnapshot> {
    ClusterSnapshot::load(path)
        .with_context(|| format!("unable to load cluster snapshot {}", path.display()))
}

fn parse_property_pairs(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| {
                    CibGuardError::ValidationError(format!(
                        "expected NAME=VALUE, got '{entry}'"
                    ))
                    .into()
                })
        })
        .collect()
}

/// Render the report stream through the enrichment pipeline and fail while
/// blocking errors remain.
fn render_outcome(
    snapshot: &ClusterSnapshot,
    report_list: Vec<ReportItem>,
    format: &str,
) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report_list)?);
        if reports::has_errors(&report_list) {
            return Err(CibGuardError::ValidationError(
                "unable to apply the requested change".to_string(),
            )
            .into());
        }
        return Ok(());
    }

    let mut preprocessor = ReportPreprocessor::new(snapshot, io::stderr());
    let mut error_count = 0usize;
    for item in report_list {
        if let Some(item) = preprocessor.process(item) {
            let line = output::render_report(&item);
            match item.severity {
                Severity::Error => {
                    error_count += 1;
                    eprintln!("{}", line.red());
                }
                Severity::Warning => eprintln!("{}", line.yellow()),
            }
        }
    }
    if error_count > 0 {
        return Err(CibGuardError::ValidationError(format!(
            "{error_count} validation error{} reported",
            output::plural_s(error_count)
        ))
        .into());
    }
    println!("{}", "Validation passed".green());
    Ok(())
}

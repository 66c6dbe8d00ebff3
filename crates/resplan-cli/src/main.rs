//! resplan CLI - Resource Assignment Engine
//!
//! Command-line interface for assigning resources and dates to task rows.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resplan_core::{rows_from_json, PlanType, PlannerConfig, Row};
use resplan_solver::{summarize, AssignOptions, GreedyAssigner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resplan")]
#[command(author, version, about = "Resource assignment engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Planner configuration file (built-in defaults if not specified)
    #[arg(short, long, global = true, env = "RESPLAN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign resources and dates to the unassigned rows of a JSON file
    Assign {
        /// Input file path (JSON array of rows)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Plan type (development, maintenance, support, testing)
        #[arg(short, long, default_value = "development")]
        plan: String,

        /// Create overflow consultants when no resource is free
        #[arg(long)]
        overflow: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the workload per assigned resource
    Summary {
        /// Input file path (JSON array of rows)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Plan type (development, maintenance, support, testing)
        #[arg(short, long, default_value = "development")]
        plan: String,
    },

    /// Validate the planner configuration
    Check,
}

/// Configuration overview reported by `check`
#[derive(Debug, Serialize)]
struct ConfigReport {
    holidays: Vec<HolidayReport>,
    groups: Vec<GroupReport>,
    developers: usize,
    testers: usize,
}

#[derive(Debug, Serialize)]
struct HolidayReport {
    date: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    name: String,
    resources: usize,
    capacity: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assign {
            file,
            plan,
            overflow,
            output,
        } => cmd_assign(&config, &file, &plan, overflow, output.as_deref()),
        Commands::Summary { file, plan } => cmd_summary(&config, &file, &plan),
        Commands::Check => cmd_check(&config),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display())),
        None => PlannerConfig::builtin().context("Built-in configuration is invalid"),
    }
}

fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    rows_from_json(value).with_context(|| format!("Invalid rows in {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, text + "\n")
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn cmd_assign(
    config: &PlannerConfig,
    file: &Path,
    plan: &str,
    overflow: bool,
    output: Option<&Path>,
) -> Result<()> {
    let plan_type = PlanType::from_name_or_default(plan);
    let plan = config.plan(plan_type);
    let calendar = config.calendar();
    let rows = load_rows(file)?;

    let assignment = GreedyAssigner::new(&plan, &calendar, &config.catalog)
        .with_options(AssignOptions {
            overflow_consultants: overflow,
        })
        .assign(&rows)?;

    let stats = &assignment.stats;
    info!(
        plan = %plan_type,
        file = %file.display(),
        newly_assigned = stats.newly_assigned,
        backfilled = stats.backfilled,
        still_unassigned = stats.still_unassigned(),
        overflow_created = stats.overflow_created,
        "assign complete"
    );

    write_json(&assignment.rows, output)
}

fn cmd_summary(config: &PlannerConfig, file: &Path, plan: &str) -> Result<()> {
    let plan = config.plan(PlanType::from_name_or_default(plan));
    let rows = load_rows(file)?;
    write_json(&summarize(&rows, &plan), None)
}

fn cmd_check(config: &PlannerConfig) -> Result<()> {
    write_json(&config_report(config), None)
}

fn config_report(config: &PlannerConfig) -> ConfigReport {
    ConfigReport {
        holidays: config
            .holidays
            .iter()
            .map(|(date, name)| HolidayReport {
                date: date.format("%Y-%m-%d").to_string(),
                name: name.to_string(),
            })
            .collect(),
        groups: config
            .catalog
            .groups()
            .map(|(name, pool)| GroupReport {
                name: name.to_string(),
                resources: pool.len(),
                capacity: pool.total_capacity(),
            })
            .collect(),
        developers: config.catalog.all_developers().len(),
        testers: config.catalog.testers().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assign_defaults_to_development() {
        let cli = Cli::try_parse_from(["resplan", "assign", "rows.json"]).unwrap();
        match cli.command {
            Commands::Assign {
                plan,
                overflow,
                output,
                ..
            } => {
                assert_eq!(plan, "development");
                assert!(!overflow);
                assert!(output.is_none());
            }
            _ => panic!("expected assign"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resplan", "check", "-vv", "--config", "planner.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("planner.toml")));
    }

    #[test]
    fn report_counts_builtin_catalog() {
        let config = PlannerConfig::builtin().unwrap();
        let report = config_report(&config);
        assert_eq!(report.holidays.len(), 6);
        assert_eq!(report.holidays[0].date, "2025-01-01");
        assert_eq!(report.holidays[0].name, "Año Nuevo");
        assert_eq!(report.groups.len(), 7);
        assert_eq!(report.groups[0].name, "GRID");
        assert_eq!(report.groups[0].resources, 7);
        assert_eq!(report.developers, 18);
        assert_eq!(report.testers, 3);
    }

    #[test]
    fn load_rows_rejects_non_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"{"abapAssigned": "ana"}"#).unwrap();
        let err = load_rows(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Expected a sequence of rows"));
    }
}

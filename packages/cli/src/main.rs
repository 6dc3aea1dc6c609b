#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for querying NYC crash data.
//!
//! Uses `indicatif-log-bridge` (via [`crash_report_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load spinner never fight for the terminal.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use crash_report_analytics_models::ReportConfig;
use crash_report_cli_utils::{IndicatifProgress, MultiProgress};
use crash_report_crash_models::{
    Borough, DayOfWeek, InjurySeverity, PersonSex, PersonType, TimeOfDayBand, VehicleType,
};
use crash_report_dataset::Dataset;
use crash_report_dataset::schema::REQUIRED_COLUMNS;
use crash_report_filter::{DropdownSelections, parse_with_trace};
use crash_report_filter_models::MONTH_NAMES;
use crash_report_lexicon::lexicon;
use crash_report_report::generate_report;

#[derive(Parser)]
#[command(name = "crash_report", about = "Natural-language reports over NYC crash data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a report for a query and print it as JSON
    Report {
        /// Free-text query (e.g., "Brooklyn 2022 pedestrian crashes")
        text: Vec<String>,
        #[command(flatten)]
        selections: Selections,
        /// Crash dataset CSV (`.csv` or `.csv.gz`)
        #[arg(long, env = "CRASH_REPORT_DATA")]
        data: PathBuf,
        /// Report configuration TOML
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the filters a query resolves to without loading any data
    Parse {
        /// Free-text query
        text: Vec<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List the columns a dataset file must have
    Schema,
    /// Show the query vocabulary
    Lexicon {
        /// Also list every surface form and what it maps to
        #[arg(long)]
        forms: bool,
    },
}

/// Explicit selections. Each one overrides whatever the query text implies.
#[derive(Args)]
struct Selections {
    /// Borough (e.g., "Queens")
    #[arg(long)]
    borough: Option<String>,
    /// Year or year range (e.g., "2022", "2019-2021")
    #[arg(long)]
    year: Option<String>,
    /// Month name or number
    #[arg(long)]
    month: Option<String>,
    /// Day of week, "weekend" or "weekdays"
    #[arg(long)]
    day: Option<String>,
    /// Hour (0-23) or time band (e.g., "rush hour")
    #[arg(long)]
    time: Option<String>,
    /// Vehicle type (e.g., "Taxi")
    #[arg(long)]
    vehicle: Option<String>,
    /// Person type (e.g., "Pedestrian")
    #[arg(long)]
    person: Option<String>,
    /// Minimum injury severity (e.g., "Injury")
    #[arg(long)]
    severity: Option<String>,
    /// Gender ("M" or "F")
    #[arg(long)]
    gender: Option<String>,
}

impl From<Selections> for DropdownSelections {
    fn from(selections: Selections) -> Self {
        Self {
            borough: selections.borough,
            year: selections.year,
            month: selections.month,
            day_of_week: selections.day,
            time_of_day: selections.time,
            vehicle_type: selections.vehicle,
            person_type: selections.person,
            severity: selections.severity,
            gender: selections.gender,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crash_report_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            text,
            selections,
            data,
            config,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let dataset = load_dataset(&multi, &data)?;
            let bundle = generate_report(
                &dataset.view(),
                &text.join(" "),
                &selections.into(),
                &config,
            )?;
            print_json(&bundle, pretty)?;
        }
        Commands::Parse { text, pretty } => {
            print_json(&parse_with_trace(&text.join(" ")), pretty)?;
        }
        Commands::Schema => {
            for column in REQUIRED_COLUMNS {
                println!("{column}");
            }
        }
        Commands::Lexicon { forms } => print_lexicon(forms),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };

    log::info!("Reading report config from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(ReportConfig::from_toml_str(&contents)?)
}

fn load_dataset(
    multi: &MultiProgress,
    path: &Path,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::rows_spinner(multi, "Loading crashes");
    let start = std::time::Instant::now();
    let dataset = Dataset::load(path, &progress)?;
    log::info!("Dataset ready in {:.1}s", start.elapsed().as_secs_f64());
    Ok(dataset)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn print_lexicon(forms: bool) {
    let lex = lexicon();
    println!("Lexicon version {}", lex.version());
    let years = lex.year_bounds();
    println!("Years {}-{}", years.min, years.max);
    println!();

    println!("{:<16} {:>6} {:>6}", "SECTION", "VALUES", "FORMS");
    println!("{}", "-".repeat(30));
    for section in lex.sections() {
        println!(
            "{:<16} {:>6} {:>6}",
            section.name, section.values, section.forms
        );
    }
    println!();

    println!("Selection labels");
    println!("{}", "-".repeat(30));
    print_labels("borough", Borough::all().iter().map(|v| v.label()));
    print_labels("month", MONTH_NAMES.iter().copied());
    print_labels(
        "day",
        DayOfWeek::all()
            .iter()
            .map(|v| v.label())
            .chain(["Weekend", "Weekdays"]),
    );
    print_labels("time", TimeOfDayBand::all().iter().map(|v| v.label()));
    print_labels("vehicle", VehicleType::all().iter().map(|v| v.label()));
    print_labels("person", PersonType::all().iter().map(|v| v.label()));
    print_labels("severity", InjurySeverity::all().iter().map(|v| v.label()));
    print_labels("gender", PersonSex::all().iter().map(|v| v.label()));

    if forms {
        println!();
        println!("{:<24} VALUE", "FORM");
        println!("{}", "-".repeat(50));
        for (form, term) in lex.entries() {
            println!("{form:<24} {}", term.describe());
        }
    }
}

fn print_labels<'a>(name: &str, labels: impl Iterator<Item = &'a str>) {
    println!("{name:<10} {}", labels.collect::<Vec<_>>().join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_become_selections() {
        let cli = Cli::try_parse_from([
            "crash_report",
            "report",
            "taxi",
            "injuries",
            "--borough",
            "Manhattan",
            "--day",
            "weekend",
            "--data",
            "crashes.csv",
        ])
        .unwrap();

        let Commands::Report {
            text, selections, ..
        } = cli.command
        else {
            panic!("expected report command");
        };
        assert_eq!(text, vec!["taxi", "injuries"]);

        let dropdowns = DropdownSelections::from(selections);
        assert_eq!(dropdowns.borough.as_deref(), Some("Manhattan"));
        assert_eq!(dropdowns.day_of_week.as_deref(), Some("weekend"));
        assert_eq!(dropdowns.year, None);
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), ReportConfig::default());
    }
}

//! Hybrid simulator entry point: CLI wiring and config-driven scenario runs.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hybrid_sim::config::ScenarioConfig;
use hybrid_sim::io::export::export_csv;
use hybrid_sim::reference::{CountryCatalog, GeneratorCatalog};
use hybrid_sim::runner::{SimulationReport, run_scenario};

/// PV + diesel generator hybrid simulation.
///
/// If no --scenario or --preset is given, the baseline preset is used.
#[derive(Parser, Debug)]
#[command(name = "hybrid-sim", version, about)]
struct Args {
    /// Load scenario from TOML config file.
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, high_solar, night_heavy).
    #[arg(long)]
    preset: Option<String>,

    /// Override the random load seed.
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<u64>,

    /// Seed the random load from OS entropy (non-reproducible).
    #[arg(long)]
    random_seed: bool,

    /// Override the number of simulated days.
    #[arg(long)]
    days: Option<usize>,

    /// Override the first simulated day (YYYY-MM-DD, UTC).
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Override the country.
    #[arg(long)]
    country: Option<String>,

    /// Disable PV for the main run.
    #[arg(long)]
    no_pv: bool,

    /// Country table JSON replacing the built-in one.
    #[arg(long, env = "HYBRID_SIM_COUNTRIES")]
    countries: Option<PathBuf>,

    /// Export hourly results to CSV.
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Skip the per-hour rows and print only the reports.
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn load_scenario(&self) -> Result<ScenarioConfig, String> {
        // --scenario takes priority, then --preset, then baseline default
        let mut scenario = if let Some(ref path) = self.scenario {
            ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?
        } else if let Some(ref name) = self.preset {
            ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?
        } else {
            ScenarioConfig::baseline()
        };

        if let Some(seed) = self.seed {
            scenario.simulation.seed = Some(seed);
        }
        if self.random_seed {
            scenario.simulation.seed = None;
        }
        if let Some(days) = self.days {
            scenario.simulation.days = days;
        }
        if let Some(start_date) = self.start_date {
            scenario.simulation.start_date = start_date;
        }
        if let Some(ref country) = self.country {
            scenario.simulation.country.clone_from(country);
        }
        if self.no_pv {
            scenario.pv.enabled = false;
        }
        Ok(scenario)
    }
}

fn print_report(report: &SimulationReport, quiet: bool) {
    if !quiet {
        for (t, hour) in report.result.iter().enumerate() {
            let time = report
                .timestamps
                .get(t)
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!("t={t:>4} {time} | {hour}");
        }
        println!();
    }
    println!("{}", report.summary);
    println!();
    println!("{}", report.savings);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = match args.load_scenario() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let countries = match args.countries {
        Some(ref path) => CountryCatalog::from_json_file(path),
        None => CountryCatalog::builtin(),
    };
    let countries = match countries {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("error: failed to load country table: {e}");
            process::exit(1);
        }
    };
    let generators = GeneratorCatalog::builtin();

    let report = match run_scenario(&scenario, &countries, &generators) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    print_report(&report, args.quiet);

    if let Some(ref path) = args.telemetry_out {
        if let Err(e) = export_csv(&report, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {}", path.display());
    }
}

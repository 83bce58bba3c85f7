//! # Pavement Design CLI
//!
//! Command-line front end for `pave_core`:
//!
//! - `pave run` - load inputs, define layers, simulate, print the report
//! - `pave report` - reprint (and optionally export) a saved session's report
//! - `pave template` - print the manual-entry defaults and workbook layout

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pave_core::config::AppConfig;
use pave_core::inputs::{ClimateData, ManualInput, MaterialProperties, SubgradeProperties, TrafficData, SHEETS};
use pave_core::lcca::{LccaParameters, LccaResult, MaintenanceSchedule};
use pave_core::pavement::{parse_layers, CostTable, LayerDesignSummary, PavementDesign};
use pave_core::pdf::save_report_pdf;
use pave_core::performance::DistressResult;
use pave_core::report::format_currency;
use pave_core::units::Percent;
use pave_core::{load_session, logging, save_session, PaveError, PaveResult, Session};
use serde_json::json;
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(
    name = "pave",
    about = "Mechanistic-empirical pavement performance and lifecycle-cost calculator",
    version
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "PAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log file path
    #[arg(long, global = true, env = "PAVE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Override the log level (used when RUST_LOG is unset)
    #[arg(long, global = true, env = "PAVE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Do not echo log lines to stderr
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a complete design: inputs, layers, simulation, LCCA, report
    Run(RunArgs),
    /// Print the report stored in a saved session
    Report(ReportArgs),
    /// Print the manual-entry defaults and the expected workbook layout
    Template,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Workbook (.xlsx) or directory of CSV sheets; manual flags are ignored when set
    #[arg(long, value_name = "PATH")]
    workbook: Option<PathBuf>,

    #[command(flatten)]
    manual: ManualArgs,

    /// Layer stack, top course first
    #[arg(long, default_value = "Asphalt:100, Base:200, Sub-base:150")]
    layers: String,

    /// Pavement type: Flexible, Rigid or Composite
    #[arg(long, default_value = "Flexible")]
    pavement_type: String,

    /// Cost per mm by layer type, e.g. "Asphalt:50, Base:40" (defaults from config)
    #[arg(long)]
    costs: Option<String>,

    #[command(flatten)]
    lcca: LccaArgs,

    /// Export the report as PDF (default file name from config)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pdf: Option<Option<PathBuf>>,

    /// Save the session to a .pvd file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ManualArgs {
    /// Comma-separated axle loads (kN)
    #[arg(long)]
    axle_loads: Option<String>,
    /// Traffic growth rate (% per year)
    #[arg(long)]
    growth_rate: Option<f64>,
    /// Traffic analysis period (years, 1-100)
    #[arg(long)]
    analysis_period: Option<u32>,
    /// Average temperature (°C)
    #[arg(long)]
    avg_temperature: Option<f64>,
    /// Temperature variation (°C)
    #[arg(long)]
    temperature_variation: Option<f64>,
    /// Annual rainfall (mm)
    #[arg(long)]
    rainfall: Option<f64>,
    /// Subgrade modulus (MPa)
    #[arg(long)]
    subgrade_modulus: Option<f64>,
    /// California Bearing Ratio (%)
    #[arg(long)]
    cbr: Option<f64>,
    /// Asphalt modulus (MPa)
    #[arg(long)]
    asphalt_modulus: Option<f64>,
    /// Concrete strength (MPa)
    #[arg(long)]
    concrete_strength: Option<f64>,
    /// Thermal coefficient (1/°C)
    #[arg(long)]
    thermal_coeff: Option<f64>,
}

#[derive(Args, Debug)]
struct LccaArgs {
    /// Initial construction cost ($)
    #[arg(long)]
    initial_cost: Option<f64>,
    /// Maintenance schedule as year:cost pairs, e.g. "5:100000, 10:150000"
    #[arg(long)]
    maintenance: Option<String>,
    /// Discount rate (%)
    #[arg(long)]
    discount_rate: Option<f64>,
    /// LCCA period (years, 1-100)
    #[arg(long)]
    lcca_period: Option<u32>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Saved session (.pvd)
    #[arg(long, value_name = "PATH")]
    session: PathBuf,

    /// Export the report as PDF (default file name from config)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pdf: Option<Option<PathBuf>>,
}

impl ManualArgs {
    fn apply(&self, mut manual: ManualInput) -> ManualInput {
        if let Some(loads) = &self.axle_loads {
            manual.axle_loads = loads.clone();
        }
        if let Some(rate) = self.growth_rate {
            manual.traffic_growth_rate_pct = Percent(rate);
        }
        if let Some(years) = self.analysis_period {
            manual.analysis_period_years = years;
        }
        if let Some(value) = self.avg_temperature {
            manual.average_temperature_c = value;
        }
        if let Some(value) = self.temperature_variation {
            manual.temperature_variation_c = value;
        }
        if let Some(value) = self.rainfall {
            manual.rainfall_mm = value;
        }
        if let Some(value) = self.subgrade_modulus {
            manual.subgrade_modulus = value;
        }
        if let Some(value) = self.cbr {
            manual.cbr = value;
        }
        if let Some(value) = self.asphalt_modulus {
            manual.asphalt_modulus_mpa = value;
        }
        if let Some(value) = self.concrete_strength {
            manual.concrete_strength_mpa = value;
        }
        if let Some(value) = self.thermal_coeff {
            manual.thermal_coeff = value;
        }
        manual
    }
}

impl LccaArgs {
    /// Merge flags over `defaults`. Skipped schedule entries are already
    /// logged; `echo_warnings` repeats them on stderr when console logging is off.
    fn resolve(&self, defaults: &LccaParameters, echo_warnings: bool) -> PaveResult<LccaParameters> {
        let maintenance = match &self.maintenance {
            Some(text) => {
                let (schedule, warnings) = MaintenanceSchedule::parse(text)?;
                if echo_warnings {
                    for warning in &warnings {
                        eprintln!("[WARN] {}", warning.message);
                    }
                }
                schedule
            }
            None => defaults.maintenance.clone(),
        };
        let discount_rate = match self.discount_rate {
            Some(pct) => Percent(pct).to_fraction_checked("discount_rate")?.0,
            None => defaults.discount_rate,
        };
        let params = LccaParameters {
            initial_cost: self.initial_cost.unwrap_or(defaults.initial_cost),
            maintenance,
            discount_rate,
            analysis_period_years: self.lcca_period.unwrap_or(defaults.analysis_period_years),
        };
        params.validate()?;
        Ok(params)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };
    if let Some(file) = &cli.log_file {
        config.log.file = Some(file.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if cli.quiet {
        config.log.console = false;
    }

    let _guard = match logging::init(&config.log) {
        Ok(guard) => guard,
        Err(e) => return fail(&e),
    };

    let outcome = match &cli.command {
        Command::Run(args) => run(args, &config),
        Command::Report(args) => report(args, &config),
        Command::Template => template(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_failure(&e);
            fail(&e)
        }
    }
}

/// Input problems the user can fix are warnings; everything else is an error.
fn failure_level(e: &PaveError) -> Level {
    if e.is_validation() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

fn log_failure(e: &PaveError) {
    match failure_level(e) {
        Level::WARN => warn!(code = e.error_code(), "{}", e),
        _ => error!(code = e.error_code(), "{}", e),
    }
}

fn fail(e: &PaveError) -> ExitCode {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn run(args: &RunArgs, config: &AppConfig) -> PaveResult<()> {
    let mut session = Session::with_settings(config.design.clone());

    match &args.workbook {
        Some(path) => session.load_inputs(path)?,
        None => session.load_manual_inputs(&args.manual.apply(ManualInput::default()))?,
    };

    let mut design = PavementDesign::new(parse_layers(&args.layers)?, Default::default());
    design.set_pavement_type(&args.pavement_type)?;
    let costs = match &args.costs {
        Some(text) => CostTable::parse(text)?,
        None => session.settings.default_costs.clone(),
    };
    let summary = session.define_design(design, costs)?.clone();

    let params = args.lcca.resolve(&session.settings.default_lcca, !config.log.console)?;
    let (simulation, lcca) = session.run_simulation(&params)?;
    let (simulation, lcca) = (*simulation, lcca.clone());
    let report_text = session.generate_report()?;

    if args.json {
        let output = json!({
            "layer_summary": summary,
            "simulation": simulation,
            "lcca": lcca,
            "report": report_text,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_layer_summary(&summary);
        print_simulation(&simulation);
        print_lcca(&lcca);
        println!("{}", report_text);
    }

    if let Some(pdf) = &args.pdf {
        export_pdf(&report_text, pdf.as_deref(), config)?;
    }
    if let Some(path) = &args.save {
        save_session(&session, path)?;
        eprintln!("[OK] Session saved to {}", path.display());
    }
    Ok(())
}

fn report(args: &ReportArgs, config: &AppConfig) -> PaveResult<()> {
    let session = load_session(&args.session)?;
    let report_text = session.generate_report()?;
    println!("{}", report_text);

    if let Some(pdf) = &args.pdf {
        export_pdf(&report_text, pdf.as_deref(), config)?;
    }
    Ok(())
}

fn export_pdf(report_text: &str, path: Option<&Path>, config: &AppConfig) -> PaveResult<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.report.file_name));
    save_report_pdf(report_text, &path)?;
    eprintln!("[OK] PDF report written to {} ({})", path.display(), config.report.mime_type);
    Ok(())
}

fn template(config: &AppConfig) -> PaveResult<()> {
    let columns: [&[&str]; 4] = [
        &TrafficData::COLUMNS,
        &ClimateData::COLUMNS,
        &SubgradeProperties::COLUMNS,
        &MaterialProperties::COLUMNS,
    ];

    println!("Workbook layout (.xlsx sheets, or <sheet>.csv files in a directory):");
    for ((sheet, alias), columns) in SHEETS.iter().zip(columns) {
        println!("  {:<10} (or {}): {}", sheet, alias, columns.join(", "));
    }
    println!("  {} is read as a whole column; every other field from the first data row.", TrafficData::AXLE_LOADS);
    println!();

    let output = json!({
        "manual_input": ManualInput::default(),
        "config": config,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Template printed.");
    Ok(())
}

fn print_layer_summary(summary: &LayerDesignSummary) {
    println!("═══════════════════════════════════════");
    println!("  LAYER DESIGN");
    println!("═══════════════════════════════════════");
    println!("  Total thickness:   {:.1} mm", summary.total_thickness_mm);
    println!("  Total cost:        {}", format_currency(summary.total_cost));
    println!("  Preview (thickness-based, not the simulation):");
    println!("    Fatigue Cracking: {:.2}", summary.preview.fatigue_cracking);
    println!("    Rutting:          {:.2} mm", summary.preview.rutting);
    println!("    Thermal Cracking: {:.2}", summary.preview.thermal_cracking);
    println!();
}

fn print_simulation(simulation: &DistressResult) {
    println!("═══════════════════════════════════════");
    println!("  SIMULATION");
    println!("═══════════════════════════════════════");
    for (kind, value) in simulation.entries() {
        println!("  {:<18} {:.4} {}", format!("{}:", kind), value, status_icon(value.is_finite()));
    }
    println!();
}

fn print_lcca(lcca: &LccaResult) {
    println!("═══════════════════════════════════════");
    println!("  LIFECYCLE COST");
    println!("═══════════════════════════════════════");
    println!("  {:>4}  {:>16}  {:>16}  {:>18}", "Year", "Maintenance", "Discounted", "Cumulative");
    for year in &lcca.over_time {
        println!(
            "  {:>4}  {:>16}  {:>16}  {:>18}",
            year.year,
            format_currency(year.maintenance_cost),
            format_currency(year.discounted_cost),
            format_currency(year.cumulative_cost)
        );
    }
    println!("  Total Lifecycle Cost: {}", format_currency(lcca.total_lcc));
    println!();
}

fn status_icon(ok: bool) -> &'static str {
    if ok { "" } else { "[NON-FINITE]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "pave", "run", "--growth-rate", "3", "--layers", "Asphalt:120", "--pdf", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.manual.growth_rate, Some(3.0));
                assert_eq!(args.pdf, Some(None));
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_manual_overrides() {
        let args = ManualArgs {
            axle_loads: Some("90".to_string()),
            growth_rate: Some(5.0),
            analysis_period: None,
            avg_temperature: None,
            temperature_variation: None,
            rainfall: Some(800.0),
            subgrade_modulus: None,
            cbr: None,
            asphalt_modulus: None,
            concrete_strength: None,
            thermal_coeff: None,
        };
        let manual = args.apply(ManualInput::default());
        assert_eq!(manual.axle_loads, "90");
        assert_eq!(manual.traffic_growth_rate_pct, Percent(5.0));
        assert_eq!(manual.rainfall_mm, 800.0);
        assert_eq!(manual.analysis_period_years, 20);
    }

    #[test]
    fn test_lcca_defaults_from_config() {
        let args = LccaArgs {
            initial_cost: None,
            maintenance: Some("5:100000, junk".to_string()),
            discount_rate: None,
            lcca_period: Some(5),
        };
        let params = args.resolve(&LccaParameters::default(), false).unwrap();
        assert_eq!(params.initial_cost, 1_000_000.0);
        assert!((params.discount_rate - 0.03).abs() < 1e-12);
        assert_eq!(params.maintenance.cost_in(5), 100_000.0);
        assert_eq!(params.analysis_period_years, 5);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured(e: &PaveError) -> String {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || log_failure(e));
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_failure_level() {
        assert_eq!(failure_level(&PaveError::missing_field("Rainfall")), Level::WARN);
        assert_eq!(failure_level(&PaveError::render_failed("boom")), Level::ERROR);
    }

    #[test]
    fn test_failures_reach_log() {
        let text = captured(&PaveError::render_failed("font missing"));
        assert!(text.contains("ERROR"));
        assert!(text.contains("font missing"));

        let text = captured(&PaveError::sheet_not_found("Climate"));
        assert!(text.contains("WARN"));
        assert!(text.contains("Climate"));
    }
}

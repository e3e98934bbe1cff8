#![warn(missing_docs)]
//! RateBench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Use `ratebench::run()` (or `ratebench_cli::run()`) in your main function to
//! measure every linked `#[suite]` against the configured baseline profile.
//!
//! # Example
//!
//! ```ignore
//! use ratebench::prelude::*;
//!
//! #[suite(name = "Array.map")]
//! fn array_map(suite: &mut Suite) -> Result<(), SuiteError> {
//!     suite.add("small", || { let _ = [1, 2, 3].map(|x| x * 2); })
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     ratebench::run()
//! }
//! ```

mod benchmark;
mod config;
mod planner;

pub use benchmark::{Benchmark, BenchmarkError, BenchmarkSettings};
pub use config::*;
pub use planner::{ExecutionPlan, build_plan, compile_filters};

use anyhow::Context;
use clap::{Parser, Subcommand};
use ratebench_core::{SuiteConfig, TimedSampler, registered_suites};
use ratebench_report::{MachineInfo, Profile, ReportContext, ReporterKind, create_reporter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for configuration, registration, setup and I/O errors
pub const FATAL_EXIT_CODE: u8 = 2;

/// RateBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "ratebench")]
#[command(
    author,
    version,
    about = "RateBench - throughput regression testing against recorded baselines"
)]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run only suites whose name matches this regex (overrides `suites` in the config)
    pub filter: Option<String>,

    /// Config file (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Benchmark name shown in reports
    #[arg(long)]
    pub name: Option<String>,

    /// Fraction of the expected rate below which a test warns
    #[arg(long)]
    pub warn_threshold: Option<f64>,

    /// Fraction of the expected rate below which a test fails
    #[arg(long)]
    pub fail_threshold: Option<f64>,

    /// Reporters to use: cli, junit, json (repeatable or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub reporters: Vec<String>,

    /// Baseline profile to compare against
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Write an updated profile to this file
    #[arg(long)]
    pub profile_out: Option<PathBuf>,

    /// Warmup time per test (e.g. 500ms, 1s)
    #[arg(long)]
    pub warmup: Option<String>,

    /// Measurement time per test (e.g. 5s)
    #[arg(long)]
    pub measurement: Option<String>,

    /// Target sample count per test
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// List discovered suites and their tests
    List,
    /// Run suites (default)
    Run,
}

/// Run the RateBench CLI with the process arguments.
///
/// Maps the benchmark outcome to the configured exit code, or to
/// [`FATAL_EXIT_CODE`] when the run could not complete.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match run_with_cli(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

/// Run the RateBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;

    match cli.command {
        Some(Commands::List) => {
            list_suites(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run) | None => run_benchmark(&config),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "ratebench=debug"
    } else {
        "ratebench=info"
    };
    // A subscriber may already be installed when embedded in a larger binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the effective configuration: defaults → config file → CLI flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::discover()?.unwrap_or_default(),
    };

    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Apply CLI flags on top of a loaded configuration
pub fn apply_overrides(config: &mut BenchConfig, cli: &Cli) {
    if let Some(name) = &cli.name {
        config.name = name.clone();
    }
    if let Some(filter) = &cli.filter {
        config.suites = vec![filter.clone()];
    }
    if let Some(warn) = cli.warn_threshold {
        config.warn_threshold = warn;
    }
    if let Some(fail) = cli.fail_threshold {
        config.fail_threshold = fail;
    }
    if !cli.reporters.is_empty() {
        config.reporters = cli
            .reporters
            .iter()
            .map(|name| ReporterEntry::Name(name.clone()))
            .collect();
    }
    if let Some(profile) = &cli.profile {
        config.profile = Some(profile.clone());
    }
    if let Some(profile_out) = &cli.profile_out {
        config.profile_out = Some(profile_out.clone());
    }
    if let Some(warmup) = &cli.warmup {
        config.sampler.warmup_time = warmup.clone();
    }
    if let Some(measurement) = &cli.measurement {
        config.sampler.measurement_time = measurement.clone();
    }
    if let Some(samples) = cli.samples {
        config.sampler.target_samples = samples;
    }
}

/// Load the baseline named in the config, or start an empty one.
///
/// A missing profile file is not an error: every test passes on its first
/// recorded run. A malformed one is.
pub fn load_profile(config: &BenchConfig) -> anyhow::Result<Profile> {
    match &config.profile {
        Some(path) if path.exists() => Ok(Profile::load(path)?),
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "profile not found; every test will pass against an empty baseline"
            );
            Ok(Profile::create())
        }
        None => Ok(Profile::create()),
    }
}

/// Assemble a benchmark with reporters and discovered suites
pub fn build_benchmark(config: &BenchConfig) -> anyhow::Result<Benchmark> {
    let sampler = TimedSampler::new(config.sampler.to_sampler_config()?);
    let settings = BenchmarkSettings {
        name: config.name.clone(),
        warn_threshold: config.warn_threshold,
        fail_threshold: config.fail_threshold,
        profile_out: config.profile_out.clone(),
    };
    let mut benchmark = Benchmark::new(settings, load_profile(config)?, Box::new(sampler));

    let context = ReportContext {
        name: config.name.clone(),
        machine: MachineInfo::collect(),
    };
    for entry in &config.reporters {
        let kind: ReporterKind = entry.name().parse().map_err(anyhow::Error::msg)?;
        let options = entry.options();
        let reporter = create_reporter(kind, &options, &context).with_context(|| {
            format!("failed to open output for reporter '{}'", entry.name())
        })?;
        benchmark.add_reporter(reporter);
    }

    let filters = compile_filters(&config.suites).context("invalid suite filter")?;
    let found = benchmark.discover(&filters)?;
    if found == 0 {
        tracing::warn!("no suites matched; nothing to run");
    }
    Ok(benchmark)
}

fn run_benchmark(config: &BenchConfig) -> anyhow::Result<ExitCode> {
    let mut benchmark = build_benchmark(config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let outcome = runtime.block_on(benchmark.run())?;

    let code = config.exit_codes.code(outcome);
    tracing::debug!(%outcome, code, "exiting");
    Ok(ExitCode::from(code))
}

fn list_suites(config: &BenchConfig) -> anyhow::Result<()> {
    println!("RateBench Plan:");

    let filters = compile_filters(&config.suites).context("invalid suite filter")?;
    let all = registered_suites();
    let plan = build_plan(all.iter().copied(), &filters);

    let mut total_tests = 0;
    for def in &plan.suites {
        let suite = def.build(SuiteConfig::default())?;
        println!(
            "├── suite: {} ({}:{})",
            def.name, def.file, def.line
        );
        for test in suite.test_names() {
            println!("│   ├── {}", test);
            total_tests += 1;
        }
    }

    println!(
        "{} suites, {} tests found.",
        plan.suites.len(),
        total_tests
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratebench_core::Outcome;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "ratebench",
            "^Array",
            "--warn-threshold",
            "0.9",
            "--reporters",
            "cli,junit",
            "--profile-out",
            "profile.json",
            "-n",
            "20",
        ])
        .unwrap();

        assert_eq!(cli.filter.as_deref(), Some("^Array"));
        assert_eq!(cli.warn_threshold, Some(0.9));
        assert_eq!(cli.reporters, vec!["cli", "junit"]);
        assert_eq!(cli.samples, Some(20));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["ratebench", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));
        let cli = Cli::try_parse_from(["ratebench", "run"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Run));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "ratebench",
            "Set",
            "--name",
            "Nightly",
            "--fail-threshold",
            "0.6",
            "--reporters",
            "json",
            "--measurement",
            "250ms",
        ])
        .unwrap();

        let mut config = BenchConfig {
            name: "From file".into(),
            suites: vec!["Array".into()],
            ..BenchConfig::default()
        };
        apply_overrides(&mut config, &cli);

        assert_eq!(config.name, "Nightly");
        assert_eq!(config.suites, vec!["Set"]);
        assert_eq!(config.fail_threshold, 0.6);
        assert_eq!(config.warn_threshold, 0.8);
        assert_eq!(config.reporters, vec![ReporterEntry::Name("json".into())]);
        assert_eq!(config.sampler.measurement_time, "250ms");
        assert_eq!(config.sampler.warmup_time, "1s");
    }

    #[test]
    fn test_missing_profile_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            profile: Some(dir.path().join("absent.json")),
            ..BenchConfig::default()
        };
        let profile = load_profile(&config).unwrap();
        assert!(profile.suites.is_empty());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        let config = BenchConfig {
            profile: Some(broken),
            ..BenchConfig::default()
        };
        assert!(load_profile(&config).is_err());
    }

    #[test]
    fn test_unknown_reporter_is_fatal() {
        let config = BenchConfig {
            reporters: vec![ReporterEntry::Name("html".into())],
            ..BenchConfig::default()
        };
        let error = build_benchmark(&config).err().expect("unknown reporter rejected");
        assert!(error.to_string().contains("Unknown reporter"));
    }

    #[test]
    fn test_exit_code_mapping() {
        let codes = ExitCodes {
            warn: 3,
            ..ExitCodes::default()
        };
        assert_eq!(codes.code(Outcome::Pass), 0);
        assert_eq!(codes.code(Outcome::Warn), 3);
        assert_eq!(codes.code(Outcome::Fail), 1);
        assert_eq!(codes.code(Outcome::None), 0);
    }
}

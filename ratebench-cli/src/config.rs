//! Configuration loading from ratebench.json / ratebench.toml
//!
//! The configuration file is optional. When `--config` is not given, it is
//! discovered by walking up from the current directory. JSON keys may be
//! written in snake_case or camelCase (`warnThreshold`, `profileOut`).

use crate::FATAL_EXIT_CODE;
use anyhow::{Context, bail};
use ratebench_core::{Outcome, SamplerConfig};
use ratebench_report::ReporterOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched for by [`BenchConfig::discover`], in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["ratebench.json", "ratebench.toml"];

/// RateBench configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Benchmark name shown by reporters
    #[serde(default = "default_name")]
    pub name: String,
    /// Regex filters over suite names; empty runs every suite
    #[serde(default)]
    pub suites: Vec<String>,
    /// Fraction of the expected rate below which a test warns
    #[serde(default = "default_warn_threshold", alias = "warnThreshold")]
    pub warn_threshold: f64,
    /// Fraction of the expected rate below which a test fails
    #[serde(default = "default_fail_threshold", alias = "failThreshold")]
    pub fail_threshold: f64,
    /// Reporters, each a name or `[name, options]`
    #[serde(default = "default_reporters")]
    pub reporters: Vec<ReporterEntry>,
    /// Baseline profile to compare against
    #[serde(default)]
    pub profile: Option<PathBuf>,
    /// Where to write the updated profile
    #[serde(default, alias = "profileOut")]
    pub profile_out: Option<PathBuf>,
    /// Sampling budget
    #[serde(default)]
    pub sampler: SamplerSection,
    /// Process exit codes per benchmark outcome
    #[serde(default, alias = "exitCodes")]
    pub exit_codes: ExitCodes,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            suites: Vec::new(),
            warn_threshold: default_warn_threshold(),
            fail_threshold: default_fail_threshold(),
            reporters: default_reporters(),
            profile: None,
            profile_out: None,
            sampler: SamplerSection::default(),
            exit_codes: ExitCodes::default(),
        }
    }
}

fn default_name() -> String {
    "Benchmark".to_string()
}
fn default_warn_threshold() -> f64 {
    0.8
}
fn default_fail_threshold() -> f64 {
    0.5
}
fn default_reporters() -> Vec<ReporterEntry> {
    vec![ReporterEntry::Name("cli".to_string())]
}

/// A reporter entry: `"junit"` or `["junit", { "out": "junit.xml" }]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReporterEntry {
    /// Reporter with default options
    Name(String),
    /// Reporter with explicit options
    WithOptions(String, ReporterOptions),
}

impl ReporterEntry {
    /// Reporter name
    pub fn name(&self) -> &str {
        match self {
            ReporterEntry::Name(name) | ReporterEntry::WithOptions(name, _) => name,
        }
    }

    /// Reporter options (defaults for bare names)
    pub fn options(&self) -> ReporterOptions {
        match self {
            ReporterEntry::Name(_) => ReporterOptions::default(),
            ReporterEntry::WithOptions(_, options) => options.clone(),
        }
    }
}

/// Sampling budget, durations as strings (`"500ms"`, `"5s"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerSection {
    /// Warmup duration before measurement
    #[serde(default = "default_warmup", alias = "warmupTime")]
    pub warmup_time: String,
    /// Measurement duration per test
    #[serde(default = "default_measurement", alias = "measurementTime")]
    pub measurement_time: String,
    /// Stop once this many samples exist
    #[serde(default = "default_target_samples", alias = "targetSamples")]
    pub target_samples: usize,
    /// Never stop with fewer samples than this
    #[serde(default = "default_min_samples", alias = "minSamples")]
    pub min_samples: usize,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            target_samples: default_target_samples(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_warmup() -> String {
    "1s".to_string()
}
fn default_measurement() -> String {
    "5s".to_string()
}
fn default_target_samples() -> usize {
    100
}
fn default_min_samples() -> usize {
    10
}

impl SamplerSection {
    /// Parse the durations into a sampler budget
    pub fn to_sampler_config(&self) -> anyhow::Result<SamplerConfig> {
        let warmup_ns = BenchConfig::parse_duration(&self.warmup_time)
            .with_context(|| format!("invalid sampler.warmup_time {:?}", self.warmup_time))?;
        let measurement_ns = BenchConfig::parse_duration(&self.measurement_time).with_context(
            || format!("invalid sampler.measurement_time {:?}", self.measurement_time),
        )?;

        Ok(SamplerConfig {
            warmup_time: Duration::from_nanos(warmup_ns),
            measurement_time: Duration::from_nanos(measurement_ns),
            target_samples: self.target_samples.max(1),
            min_samples: self.min_samples,
            ..SamplerConfig::default()
        })
    }
}

/// Exit code for each overall outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitCodes {
    /// Every suite passed
    pub pass: u8,
    /// At least one test warned, none failed
    pub warn: u8,
    /// At least one test failed
    pub fail: u8,
    /// No suite ran
    pub none: u8,
}

impl Default for ExitCodes {
    fn default() -> Self {
        Self {
            pass: 0,
            warn: 0,
            fail: 1,
            none: 0,
        }
    }
}

impl ExitCodes {
    /// Exit code for an outcome
    pub fn code(&self, outcome: Outcome) -> u8 {
        match outcome {
            Outcome::None => self.none,
            Outcome::Pass => self.pass,
            Outcome::Warn => self.warn,
            Outcome::Fail => self.fail,
        }
    }
}

impl BenchConfig {
    /// Load configuration from a JSON file, or TOML when the extension is `.toml`
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config: Self = if is_toml {
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Find the nearest config file walking up from the current directory
    pub fn discover_path() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            for file_name in CONFIG_FILE_NAMES {
                let config_path = dir.join(file_name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Load the nearest config file, if any.
    ///
    /// A config file that exists but cannot be parsed is an error.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        match Self::discover_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Check thresholds: both in (0, 1] and fail ≤ warn
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [
            ("warn_threshold", self.warn_threshold),
            ("fail_threshold", self.fail_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                bail!("{key} must be in (0, 1], got {value}");
            }
        }
        if self.fail_threshold > self.warn_threshold {
            bail!(
                "fail_threshold ({}) must not exceed warn_threshold ({})",
                self.fail_threshold,
                self.warn_threshold
            );
        }
        if self.reporters.is_empty() {
            bail!("at least one reporter must be configured");
        }
        for (outcome, code) in [
            ("pass", self.exit_codes.pass),
            ("warn", self.exit_codes.warn),
            ("fail", self.exit_codes.fail),
            ("none", self.exit_codes.none),
        ] {
            if code == FATAL_EXIT_CODE {
                bail!("exit_codes.{outcome} must not be {FATAL_EXIT_CODE}; it is reserved for fatal errors");
            }
        }
        Ok(())
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

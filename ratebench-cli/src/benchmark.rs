//! Benchmark Orchestrator
//!
//! Runs registered suites one after another, forwards each result to every
//! reporter before the next suite starts, folds suite outcomes into the
//! benchmark outcome and optionally records a new baseline profile.

use crate::planner::build_plan;
use ratebench_core::{
    Outcome, Sampler, Suite, SuiteConfig, SuiteError, registered_suites,
};
use ratebench_report::{Profile, ProfileError, Reporter};
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// A suite could not be defined, or its setup failed
    #[error(transparent)]
    Suite(#[from] SuiteError),
    /// A reporter could not write its output
    #[error("reporter failed: {0}")]
    Report(#[from] std::io::Error),
    /// The updated profile could not be written
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// `run` was called twice
    #[error("benchmark '{0}' has already run")]
    AlreadyRun(String),
}

/// Benchmark-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSettings {
    /// Name shown by reporters
    pub name: String,
    /// Fraction of the expected rate below which a test warns
    pub warn_threshold: f64,
    /// Fraction of the expected rate below which a test fails
    pub fail_threshold: f64,
    /// Where to write the updated profile; `None` leaves baselines untouched
    pub profile_out: Option<PathBuf>,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            name: "Benchmark".to_string(),
            warn_threshold: 0.8,
            fail_threshold: 0.5,
            profile_out: None,
        }
    }
}

/// An ordered set of suites measured against one profile
pub struct Benchmark {
    settings: BenchmarkSettings,
    profile: Profile,
    sampler: Box<dyn Sampler>,
    suites: Vec<Suite>,
    reporters: Vec<Box<dyn Reporter>>,
    outcome: Outcome,
    finished: bool,
}

impl Benchmark {
    /// Create a benchmark comparing against `profile`
    pub fn new(settings: BenchmarkSettings, profile: Profile, sampler: Box<dyn Sampler>) -> Self {
        Self {
            settings,
            profile,
            sampler,
            suites: Vec::new(),
            reporters: Vec::new(),
            outcome: Outcome::None,
            finished: false,
        }
    }

    /// Benchmark name
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Outcome so far; `None` until a suite completes
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Baseline profile, including suites recorded during the run
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Names of the queued suites, in run order
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|s| s.name())
    }

    /// Thresholds plus recorded expectations for a suite
    pub fn suite_config(&self, name: &str) -> SuiteConfig {
        self.profile.suite_config(
            name,
            self.settings.warn_threshold,
            self.settings.fail_threshold,
        )
    }

    /// Register a suite from a flat list of named tests.
    pub fn add<I, N>(&mut self, name: &str, tests: I) -> Result<(), SuiteError>
    where
        I: IntoIterator<Item = (N, Box<dyn FnMut()>)>,
        N: Into<String>,
    {
        let mut suite = Suite::new(name, self.suite_config(name));
        for (test_name, test) in tests {
            suite.add(test_name, test)?;
        }
        self.push_suite(suite);
        Ok(())
    }

    /// Register a suite through a builder callback.
    pub fn define<F>(&mut self, name: &str, define: F) -> Result<(), SuiteError>
    where
        F: FnOnce(&mut Suite) -> Result<(), SuiteError>,
    {
        let mut suite = Suite::new(name, self.suite_config(name));
        define(&mut suite)?;
        self.push_suite(suite);
        Ok(())
    }

    /// Register every linked `#[suite]` whose name matches a filter.
    ///
    /// Returns the number of suites added.
    pub fn discover(&mut self, filters: &[Regex]) -> Result<usize, SuiteError> {
        let all = registered_suites();
        let plan = build_plan(all.iter().copied(), filters);
        for def in &plan.suites {
            tracing::debug!(suite = def.name, file = def.file, line = def.line, "discovered");
            let suite = def.build(self.suite_config(def.name))?;
            self.push_suite(suite);
        }
        Ok(plan.suites.len())
    }

    /// Attach a reporter
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    fn push_suite(&mut self, suite: Suite) {
        if self.suites.iter().any(|s| s.name() == suite.name()) {
            tracing::warn!(
                suite = suite.name(),
                "duplicate suite name; its baseline entry will be overwritten"
            );
        }
        self.suites.push(suite);
    }

    /// Run every suite in order and finish the reporters.
    ///
    /// A suite setup failure stops the run immediately: later suites are not
    /// run, reporters are not finished and no profile is written.
    pub async fn run(&mut self) -> Result<Outcome, BenchmarkError> {
        if self.finished {
            return Err(BenchmarkError::AlreadyRun(self.settings.name.clone()));
        }
        self.finished = true;

        let suites = std::mem::take(&mut self.suites);
        tracing::info!(benchmark = %self.settings.name, suites = suites.len(), "starting benchmark");

        for mut suite in suites {
            let result = suite.run(&mut *self.sampler).await?;
            tracing::info!(suite = %result.name, outcome = %result.outcome, time = %result.time, "suite complete");

            self.outcome = self.outcome.worse_of(result.outcome);
            for reporter in self.reporters.iter_mut() {
                reporter.write(&result)?;
            }
            if self.settings.profile_out.is_some() {
                self.profile.record_suite(&result);
            }
        }

        for reporter in self.reporters.iter_mut() {
            reporter.end(self.outcome)?;
        }

        if let Some(path) = &self.settings.profile_out {
            self.profile.persist(path)?;
        }

        tracing::info!(benchmark = %self.settings.name, outcome = %self.outcome, "benchmark complete");
        Ok(self.outcome)
    }
}

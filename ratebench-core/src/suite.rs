//! Suite Engine
//!
//! A suite owns a named, ordered group of wrapped tests. Running it:
//!
//! 1. awaits every suite-level `before` future in registration order
//! 2. builds each test's data pool in registration order
//! 3. measures each test through the [`Sampler`], after its once-only
//!    `before` hook (a failing hook aborts the suite)
//! 4. classifies each rate against the suite's expectations
//!
//! A suite runs at most once.

use crate::outcome::Outcome;
use crate::sampler::{Cycle, Sampler};
use crate::stat::{
    Stat, format_expectation_variance, format_hz, format_margin, format_millis,
};
use crate::wrapper::{TestOptions, TestRoutine, WrappedTest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Boxed error returned by setup callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Future returned by a suite-level `before` callback
pub type BeforeFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>>>>;

type BeforeCallback = Box<dyn FnMut() -> BeforeFuture>;

/// Errors raised while defining or running a suite
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Registration attempted after the suite started running
    #[error("suite '{suite}' has already started; '{item}' cannot be registered")]
    AlreadyStarted {
        /// Suite name
        suite: String,
        /// Test name, or `before` for setup callbacks
        item: String,
    },
    /// Two tests share a name
    #[error("suite '{suite}' already has a test named '{test}'")]
    DuplicateTest {
        /// Suite name
        suite: String,
        /// Repeated test name
        test: String,
    },
    /// `run` was called twice
    #[error("suite '{suite}' has already run")]
    AlreadyRun {
        /// Suite name
        suite: String,
    },
    /// A suite-level `before` callback failed
    #[error("setup for suite '{suite}' failed: {source}")]
    Setup {
        /// Suite name
        suite: String,
        /// Error returned by the callback
        #[source]
        source: BoxError,
    },
    /// A suite definition function rejected its input
    #[error("suite '{suite}' could not be defined: {message}")]
    Definition {
        /// Suite name
        suite: String,
        /// Reason given by the definition
        message: String,
    },
}

/// Thresholds and expected rates for one suite
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Fraction of the expected rate below which a test warns
    pub warn_threshold: f64,
    /// Fraction of the expected rate below which a test fails
    pub fail_threshold: f64,
    /// Expected operations per second, by test name
    pub expectations: BTreeMap<String, f64>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            warn_threshold: 0.8,
            fail_threshold: 0.5,
            expectations: BTreeMap::new(),
        }
    }
}

impl SuiteConfig {
    /// Expected rate for a test; 0 when there is no usable baseline.
    pub fn expectation(&self, test: &str) -> f64 {
        self.expectations
            .get(test)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(0.0)
    }

    /// Classify a measured rate for `test`.
    pub fn classify(&self, test: &str, hz: f64) -> Outcome {
        classify(
            hz,
            self.expectation(test),
            self.warn_threshold,
            self.fail_threshold,
        )
    }

    /// Build the result for one measured test.
    pub fn evaluate(&self, test: &str, cycle: &Cycle) -> TestResult {
        let expectation = self.expectation(test);
        let outcome = classify(cycle.hz, expectation, self.warn_threshold, self.fail_threshold);
        let ratio = if expectation > 0.0 {
            cycle.hz / expectation
        } else {
            1.0
        };

        let hz = format_hz(cycle.hz);
        let variance = format_margin(cycle.rme);
        let runs = if cycle.samples == 1 { "run" } else { "runs" };
        let result = format!(
            "{test} x {hz} ops/sec {variance} ({} {runs} sampled)",
            cycle.samples
        );

        TestResult {
            name: test.to_string(),
            result,
            hz,
            expectation: format_hz(expectation),
            expectation_variance: format_expectation_variance(ratio),
            variance,
            runs_sampled: cycle.samples,
            time: format_millis(cycle.elapsed.as_secs_f64() * 1000.0),
            outcome,
        }
    }
}

/// Classify a rate against an expectation.
///
/// Pass at or above `expectation * warn_threshold`, Warn at or above
/// `expectation * fail_threshold`, Fail otherwise. With no expectation (0)
/// every non-negative rate passes.
pub fn classify(hz: f64, expectation: f64, warn_threshold: f64, fail_threshold: f64) -> Outcome {
    let minimum_warn_rate = expectation * warn_threshold;
    let minimum_fail_rate = expectation * fail_threshold;

    if hz >= minimum_warn_rate {
        Outcome::Pass
    } else if hz >= minimum_fail_rate {
        Outcome::Warn
    } else {
        Outcome::Fail
    }
}

/// One test's classified measurement
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Test name
    pub name: String,
    /// One-line summary
    pub result: String,
    /// Measured operations per second
    pub hz: Stat,
    /// Expected operations per second (0 without a baseline)
    pub expectation: Stat,
    /// Signed percentage difference from the expectation
    pub expectation_variance: Stat,
    /// Relative margin of error
    pub variance: Stat,
    /// Samples the rate was computed from
    pub runs_sampled: usize,
    /// Time spent measuring
    pub time: Stat,
    /// Classification
    pub outcome: Outcome,
}

/// A completed suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResult {
    /// Suite name
    pub name: String,
    /// Results in registration order
    pub tests: Vec<TestResult>,
    /// Worst test outcome (Pass for an empty suite)
    pub outcome: Outcome,
    /// Wall time for setup and measurement
    pub time: Stat,
}

impl SuiteResult {
    /// Number of tests with the given outcome
    pub fn count(&self, outcome: Outcome) -> usize {
        self.tests.iter().filter(|t| t.outcome == outcome).count()
    }
}

/// Lifecycle of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteState {
    /// Accepting tests and setup callbacks
    Defined,
    /// Running setup and data generation
    Preparing,
    /// Tests are being sampled
    Measuring,
    /// Finished, successfully or not
    Complete,
}

struct SuiteTest {
    name: String,
    routine: Box<dyn TestRoutine>,
}

/// A named group of tests
pub struct Suite {
    name: String,
    config: SuiteConfig,
    state: SuiteState,
    tests: Vec<SuiteTest>,
    before_callbacks: Vec<BeforeCallback>,
}

impl Suite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>, config: SuiteConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: SuiteState::Defined,
            tests: Vec::new(),
            before_callbacks: Vec::new(),
        }
    }

    /// Suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Thresholds and expectations
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> SuiteState {
        self.state
    }

    /// Registered test names, in order
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.name.as_str())
    }

    /// Number of registered tests
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether no tests are registered
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Register a test without hooks.
    pub fn add<F>(&mut self, name: impl Into<String>, mut test: F) -> Result<(), SuiteError>
    where
        F: FnMut() + 'static,
    {
        let routine: WrappedTest<()> =
            WrappedTest::new(move |_: Option<&()>| test(), TestOptions::new());
        self.push_test(name.into(), Box::new(routine))
    }

    /// Register a test with setup or data-generation hooks.
    pub fn add_with<D, F>(
        &mut self,
        name: impl Into<String>,
        test: F,
        options: TestOptions<D>,
    ) -> Result<(), SuiteError>
    where
        D: 'static,
        F: FnMut(Option<&D>) + 'static,
    {
        self.push_test(name.into(), Box::new(WrappedTest::new(test, options)))
    }

    /// Register an async setup callback, awaited before any test is measured.
    pub fn before<F, Fut, E>(&mut self, mut callback: F) -> Result<(), SuiteError>
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = Result<(), E>> + 'static,
        E: Into<BoxError> + 'static,
    {
        self.ensure_defined("before")?;
        self.before_callbacks.push(Box::new(move || -> BeforeFuture {
            let future = callback();
            Box::pin(async move { future.await.map_err(Into::into) })
        }));
        Ok(())
    }

    fn push_test(&mut self, name: String, routine: Box<dyn TestRoutine>) -> Result<(), SuiteError> {
        self.ensure_defined(&name)?;
        if self.tests.iter().any(|t| t.name == name) {
            return Err(SuiteError::DuplicateTest {
                suite: self.name.clone(),
                test: name,
            });
        }
        self.tests.push(SuiteTest { name, routine });
        Ok(())
    }

    fn ensure_defined(&self, item: &str) -> Result<(), SuiteError> {
        if self.state == SuiteState::Defined {
            Ok(())
        } else {
            Err(SuiteError::AlreadyStarted {
                suite: self.name.clone(),
                item: item.to_string(),
            })
        }
    }

    fn transition(&mut self, next: SuiteState) {
        tracing::debug!(suite = %self.name, from = ?self.state, to = ?next, "suite state");
        self.state = next;
    }

    /// Run setup, measure every test and classify the results.
    pub async fn run(&mut self, sampler: &mut dyn Sampler) -> Result<SuiteResult, SuiteError> {
        if self.state != SuiteState::Defined {
            return Err(SuiteError::AlreadyRun {
                suite: self.name.clone(),
            });
        }

        let started = Instant::now();
        self.transition(SuiteState::Preparing);

        for callback in self.before_callbacks.iter_mut() {
            if let Err(source) = callback().await {
                self.state = SuiteState::Complete;
                tracing::debug!(suite = %self.name, error = %source, "setup failed");
                return Err(SuiteError::Setup {
                    suite: self.name.clone(),
                    source,
                });
            }
        }

        for test in self.tests.iter_mut() {
            if test.routine.generates_data() {
                test.routine.generate_data();
            }
        }

        self.transition(SuiteState::Measuring);

        let mut results = Vec::with_capacity(self.tests.len());
        for test in self.tests.iter_mut() {
            let routine = &mut test.routine;
            let mut failure = routine.start().err();
            let cycle = if failure.is_none() {
                sampler.measure(&test.name, &mut || {
                    if failure.is_none() {
                        failure = routine.call().err();
                    }
                })
            } else {
                Cycle::empty(Duration::ZERO)
            };
            if let Some(source) = failure {
                self.state = SuiteState::Complete;
                tracing::debug!(suite = %self.name, test = %test.name, error = %source, "test setup failed");
                return Err(SuiteError::Setup {
                    suite: self.name.clone(),
                    source,
                });
            }

            let result = self.config.evaluate(&test.name, &cycle);
            tracing::debug!(
                suite = %self.name,
                test = %test.name,
                hz = cycle.hz,
                expectation = result.expectation.raw,
                outcome = %result.outcome,
                "classified"
            );
            results.push(result);
        }

        let outcome = Outcome::worst(results.iter().map(|t| t.outcome)).worse_of(Outcome::Pass);
        self.transition(SuiteState::Complete);

        Ok(SuiteResult {
            name: self.name.clone(),
            tests: results,
            outcome,
            time: format_millis(started.elapsed().as_secs_f64() * 1000.0),
        })
    }
}

//! Reporter contract
//!
//! `write` is called once per completed suite, in suite order, and returns
//! only after that suite's output is flushed. `end` is called once after
//! every suite has been written.

use crate::cli::CliReporter;
use crate::json::JsonReporter;
use crate::junit::JunitReporter;
use crate::machine::MachineInfo;
use ratebench_core::{Outcome, SuiteResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Receives suite results as a benchmark runs
pub trait Reporter {
    /// Report one completed suite
    fn write(&mut self, result: &SuiteResult) -> io::Result<()>;

    /// Finish the report with the benchmark's overall outcome
    fn end(&mut self, outcome: Outcome) -> io::Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn write(&mut self, result: &SuiteResult) -> io::Result<()> {
        (**self).write(result)
    }

    fn end(&mut self, outcome: Outcome) -> io::Result<()> {
        (**self).end(outcome)
    }
}

/// Built-in reporter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterKind {
    /// Human-readable terminal output
    Cli,
    /// JUnit XML for CI systems
    Junit,
    /// JSON document with every result
    Json,
}

impl std::str::FromStr for ReporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cli" | "text" | "human" => Ok(ReporterKind::Cli),
            "junit" | "xml" => Ok(ReporterKind::Junit),
            "json" => Ok(ReporterKind::Json),
            other => Err(format!("Unknown reporter: {}", other)),
        }
    }
}

/// Per-reporter options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReporterOptions {
    /// Write to this file instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    /// Force colors on or off (terminal output only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,
}

/// What every reporter knows about the benchmark being run
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Benchmark name
    pub name: String,
    /// Host the benchmark runs on
    pub machine: MachineInfo,
}

/// Build a reporter writing to the file in `options.out`, or to stdout.
pub fn create_reporter(
    kind: ReporterKind,
    options: &ReporterOptions,
    context: &ReportContext,
) -> io::Result<Box<dyn Reporter>> {
    let to_stdout = options.out.is_none();
    let sink = open_output(options.out.as_deref())?;

    Ok(match kind {
        ReporterKind::Cli => {
            let colors = options
                .colors
                .unwrap_or(to_stdout && console::colors_enabled());
            Box::new(CliReporter::new(&context.name, sink, colors))
        }
        ReporterKind::Junit => Box::new(JunitReporter::new(
            &context.name,
            crate::machine::hostname(),
            sink,
        )),
        ReporterKind::Json => Box::new(JsonReporter::new(
            &context.name,
            context.machine.clone(),
            sink,
        )),
    })
}

/// Open a buffered output file (creating parent directories), or stdout.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

//! Terminal Output
//!
//! ```text
//!   Benchmark
//!   =========
//!
//!   Suite: Array.map (2 pass, 0 warn, 0 fail)
//!    - small x 1,234,567 ops/sec +/-0.52% (90 runs sampled) [+1.20%]
//!    - large x 4,321 ops/sec +/-1.10% (88 runs sampled) [-0.35%]
//!
//!   Benchmark Complete
//!   2 pass, 0 warn, 0 fail
//! ```

use crate::reporter::Reporter;
use console::style;
use ratebench_core::{Outcome, SuiteResult};
use std::fmt::Display;
use std::io::{self, Write};

/// Writes results as they arrive, optionally colored
pub struct CliReporter<W: Write> {
    name: String,
    out: W,
    colors: bool,
    header_written: bool,
    pass: usize,
    warn: usize,
    fail: usize,
}

impl<W: Write> CliReporter<W> {
    /// Create a reporter for the named benchmark
    pub fn new(name: &str, out: W, colors: bool) -> Self {
        Self {
            name: name.to_string(),
            out,
            colors,
            header_written: false,
            pass: 0,
            warn: 0,
            fail: 0,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;
        writeln!(self.out)?;
        writeln!(self.out, "  {}", self.name)?;
        writeln!(self.out, "  {}", "=".repeat(self.name.chars().count()))
    }

    fn paint(&self, outcome: Outcome, text: impl Display) -> String {
        let styled = style(text).force_styling(self.colors);
        match outcome {
            Outcome::Pass => styled.green().to_string(),
            Outcome::Warn => styled.yellow().to_string(),
            Outcome::Fail => styled.red().to_string(),
            Outcome::None => styled.to_string(),
        }
    }

    fn tally(&self, pass: usize, warn: usize, fail: usize) -> String {
        format!(
            "{}{}, {}{}, {}{}",
            pass,
            self.paint(Outcome::Pass, " pass"),
            warn,
            self.paint(Outcome::Warn, " warn"),
            fail,
            self.paint(Outcome::Fail, " fail"),
        )
    }
}

impl<W: Write> Reporter for CliReporter<W> {
    fn write(&mut self, result: &SuiteResult) -> io::Result<()> {
        self.header()?;

        let pass = result.count(Outcome::Pass);
        let warn = result.count(Outcome::Warn);
        let fail = result.count(Outcome::Fail);
        self.pass += pass;
        self.warn += warn;
        self.fail += fail;

        writeln!(self.out)?;
        writeln!(
            self.out,
            "  Suite: {} ({})",
            result.name,
            self.tally(pass, warn, fail)
        )?;
        for test in &result.tests {
            let line = format!(
                "   - {} [{}]",
                test.result, test.expectation_variance.formatted
            );
            writeln!(self.out, "{}", self.paint(test.outcome, line))?;
        }
        self.out.flush()
    }

    fn end(&mut self, outcome: Outcome) -> io::Result<()> {
        self.header()?;
        writeln!(self.out)?;
        writeln!(self.out, "  Benchmark Complete")?;
        writeln!(
            self.out,
            "  {}",
            self.tally(self.pass, self.warn, self.fail)
        )?;
        if outcome == Outcome::None {
            writeln!(self.out, "  no suites were run")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

//! JUnit XML Output
//!
//! One `<testsuite>` per suite and one `<testcase>` per test. Failing tests
//! carry a `<failure>`; every other test records its summary in
//! `<system-out>`. Times are in seconds.

use crate::reporter::Reporter;
use ratebench_core::{Outcome, SuiteResult};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Buffers suites and writes a `<testsuites>` document at the end
pub struct JunitReporter<W: Write> {
    name: String,
    hostname: String,
    out: W,
    testsuites: Vec<String>,
    tests: usize,
    failures: usize,
}

impl<W: Write> JunitReporter<W> {
    /// Create a reporter for the named benchmark
    pub fn new(name: &str, hostname: String, out: W) -> Self {
        Self {
            name: name.to_string(),
            hostname,
            out,
            testsuites: Vec::new(),
            tests: 0,
            failures: 0,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JunitReporter<W> {
    fn write(&mut self, result: &SuiteResult) -> io::Result<()> {
        let failures = result.count(Outcome::Fail);
        self.tests += result.tests.len();
        self.failures += failures;

        let suite = escape(&result.name);
        let mut xml = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(
            xml,
            r#"  <testsuite name="{suite}" tests="{}" failures="{failures}" time="{}">"#,
            result.tests.len(),
            result.time.raw / 1000.0
        );
        for test in &result.tests {
            let summary = escape(&format!(
                "{} [{}]",
                test.result, test.expectation_variance.formatted
            ));
            let _ = writeln!(
                xml,
                r#"    <testcase classname="{suite}" name="{}" time="{}">"#,
                escape(&test.name),
                test.time.raw / 1000.0
            );
            if test.outcome == Outcome::Fail {
                let _ = writeln!(xml, r#"      <failure message="{summary}"></failure>"#);
            } else {
                let _ = writeln!(xml, "      <system-out>{summary}</system-out>");
            }
            let _ = writeln!(xml, "    </testcase>");
        }
        let _ = writeln!(xml, "  </testsuite>");

        self.testsuites.push(xml);
        Ok(())
    }

    fn end(&mut self, _outcome: Outcome) -> io::Result<()> {
        writeln!(self.out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.out,
            r#"<testsuites errors="0" failures="{}" name="{}" tests="{}" hostname="{}">"#,
            self.failures,
            escape(&self.name),
            self.tests,
            escape(&self.hostname)
        )?;
        for suite in &self.testsuites {
            self.out.write_all(suite.as_bytes())?;
        }
        writeln!(self.out, "</testsuites>")?;
        self.out.flush()
    }
}

/// Escape text for XML attributes and character data
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

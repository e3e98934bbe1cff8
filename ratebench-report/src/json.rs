//! JSON Output

use crate::machine::MachineInfo;
use crate::reporter::Reporter;
use ratebench_core::{Outcome, SuiteResult};
use serde::Serialize;
use std::io::{self, Write};

/// Document written by [`JsonReporter`]
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Benchmark name
    pub name: &'a str,
    /// Overall outcome
    pub outcome: Outcome,
    /// Host description
    pub machine: &'a MachineInfo,
    /// Suites in run order
    pub suites: &'a [SuiteResult],
}

/// Buffers suite results and writes one JSON document at the end
pub struct JsonReporter<W: Write> {
    name: String,
    machine: MachineInfo,
    out: W,
    suites: Vec<SuiteResult>,
}

impl<W: Write> JsonReporter<W> {
    /// Create a reporter for the named benchmark
    pub fn new(name: &str, machine: MachineInfo, out: W) -> Self {
        Self {
            name: name.to_string(),
            machine,
            out,
            suites: Vec::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn write(&mut self, result: &SuiteResult) -> io::Result<()> {
        self.suites.push(result.clone());
        Ok(())
    }

    fn end(&mut self, outcome: Outcome) -> io::Result<()> {
        let report = JsonReport {
            name: &self.name,
            outcome,
            machine: &self.machine,
            suites: &self.suites,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratebench_core::{Cycle, SuiteConfig, format_millis};
    use std::time::Duration;

    #[test]
    fn test_document() {
        let machine = MachineInfo {
            os: "linux (x86_64) 6.1.0".into(),
            runtime: "ratebench 0.3.0".into(),
            cpu: "1x CPU".into(),
            mem: "1GB".into(),
        };
        let test = SuiteConfig::default().evaluate(
            "t",
            &Cycle {
                hz: 1234.0,
                rme: 2.0,
                samples: 12,
                elapsed: Duration::from_millis(8),
            },
        );
        let suite = SuiteResult {
            name: "S".into(),
            tests: vec![test],
            outcome: Outcome::Pass,
            time: format_millis(8.0),
        };

        let mut reporter = JsonReporter::new("Bench", machine, Vec::new());
        reporter.write(&suite).unwrap();
        reporter.end(Outcome::Pass).unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(json["name"], "Bench");
        assert_eq!(json["outcome"], "pass");
        assert_eq!(json["machine"]["cpu"], "1x CPU");
        assert_eq!(json["suites"][0]["tests"][0]["hz"]["formatted"], "1,234");
        assert_eq!(json["suites"][0]["tests"][0]["runsSampled"], 12);
    }
}

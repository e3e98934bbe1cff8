//! Baseline Store
//!
//! A profile records the rate each test achieved the last time it was
//! recorded, per suite, together with the machine it was recorded on.
//!
//! ```json
//! {
//!   "os": "linux (x86_64) 6.1.0",
//!   "node": "ratebench 0.3.0",
//!   "cpu": "8x AMD Ryzen 7 5800X",
//!   "mem": "31.2GB",
//!   "updated": "2026-01-04T10:00:00Z",
//!   "suites": {
//!     "Array.map": {
//!       "name": "Array.map",
//!       "updated": "2026-01-04T10:00:00Z",
//!       "tests": { "small": 1234567.8 }
//!     }
//!   }
//! }
//! ```

use crate::machine::MachineInfo;
use chrono::{DateTime, Utc};
use ratebench_core::{SuiteConfig, SuiteResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a profile
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The file could not be read or written
    #[error("profile {path}: {source}")]
    Io {
        /// Profile path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The document is not a valid profile
    #[error("profile {path} is malformed: {source}")]
    Parse {
        /// Profile path, or `<inline>` for in-memory documents
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// The profile could not be serialized
    #[error("failed to serialize profile: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Recorded rates for one suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSuite {
    /// Suite name
    pub name: String,
    /// When this suite was last recorded
    pub updated: DateTime<Utc>,
    /// Operations per second, by test name
    pub tests: BTreeMap<String, f64>,
}

/// Baseline rates and the machine they were recorded on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Operating system description
    pub os: String,
    /// Harness runtime description
    #[serde(rename = "node")]
    pub runtime: String,
    /// CPU description
    pub cpu: String,
    /// Memory description
    pub mem: String,
    /// When the profile was created
    pub updated: DateTime<Utc>,
    /// Recorded suites, by name
    #[serde(default)]
    pub suites: BTreeMap<String, ProfileSuite>,
}

impl Profile {
    /// Empty profile describing the current machine
    pub fn create() -> Self {
        Self::for_machine(&MachineInfo::collect())
    }

    /// Empty profile describing `machine`
    pub fn for_machine(machine: &MachineInfo) -> Self {
        Self {
            os: machine.os.clone(),
            runtime: machine.runtime.clone(),
            cpu: machine.cpu.clone(),
            mem: machine.mem.clone(),
            updated: Utc::now(),
            suites: BTreeMap::new(),
        }
    }

    /// Read a profile from disk.
    ///
    /// Logs a warning when the profile was recorded on a different machine.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Profile =
            serde_json::from_str(&contents).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let machine = MachineInfo::collect();
        if !profile.matches_machine(&machine) {
            tracing::warn!(
                path = %path.display(),
                recorded_on = %profile.machine().describe(),
                "profile was recorded on a different machine; expectations may not be comparable"
            );
        }
        tracing::debug!(path = %path.display(), suites = profile.suites.len(), "loaded profile");
        Ok(profile)
    }

    /// Parse a profile from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(json).map_err(|source| ProfileError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Machine the profile was recorded on
    pub fn machine(&self) -> MachineInfo {
        MachineInfo {
            os: self.os.clone(),
            runtime: self.runtime.clone(),
            cpu: self.cpu.clone(),
            mem: self.mem.clone(),
        }
    }

    /// Whether the profile was recorded on hardware matching `machine`.
    ///
    /// The runtime version is ignored; upgrading the harness does not
    /// invalidate a baseline.
    pub fn matches_machine(&self, machine: &MachineInfo) -> bool {
        self.os == machine.os && self.cpu == machine.cpu && self.mem == machine.mem
    }

    /// Suite configuration seeded with the recorded rates for `suite`
    pub fn suite_config(&self, suite: &str, warn_threshold: f64, fail_threshold: f64) -> SuiteConfig {
        SuiteConfig {
            warn_threshold,
            fail_threshold,
            expectations: self.expectations(suite),
        }
    }

    /// Recorded rates for `suite`, empty when it was never recorded
    pub fn expectations(&self, suite: &str) -> BTreeMap<String, f64> {
        self.suites
            .get(suite)
            .map(|s| s.tests.clone())
            .unwrap_or_default()
    }

    /// Replace the recorded rates of a suite with a fresh result.
    ///
    /// Non-finite or negative rates are stored as 0, which reads back as
    /// "no expectation".
    pub fn record_suite(&mut self, result: &SuiteResult) {
        let tests = result
            .tests
            .iter()
            .map(|t| {
                let hz = t.hz.raw;
                let recorded = if hz.is_finite() && hz >= 0.0 { hz } else { 0.0 };
                (t.name.clone(), recorded)
            })
            .collect();
        self.suites.insert(
            result.name.clone(),
            ProfileSuite {
                name: result.name.clone(),
                updated: Utc::now(),
                tests,
            },
        );
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ProfileError> {
        serde_json::to_string_pretty(self).map_err(ProfileError::Serialize)
    }

    /// Write the profile, creating parent directories as needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        let path = path.as_ref();
        let io_error = |source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(io_error)?;

        tracing::info!(path = %path.display(), suites = self.suites.len(), "profile written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratebench_core::{Cycle, Outcome, format_millis};
    use std::time::Duration;

    fn machine() -> MachineInfo {
        MachineInfo {
            os: "linux (x86_64) 6.1.0".into(),
            runtime: "ratebench 0.3.0".into(),
            cpu: "8x Test CPU".into(),
            mem: "16GB".into(),
        }
    }

    fn suite_result(name: &str, rates: &[(&str, f64)]) -> SuiteResult {
        let config = SuiteConfig::default();
        let tests: Vec<_> = rates
            .iter()
            .map(|(test, hz)| {
                config.evaluate(
                    test,
                    &Cycle {
                        hz: *hz,
                        rme: 1.0,
                        samples: 10,
                        elapsed: Duration::from_millis(1),
                    },
                )
            })
            .collect();
        SuiteResult {
            name: name.to_string(),
            tests,
            outcome: Outcome::Pass,
            time: format_millis(1.0),
        }
    }

    #[test]
    fn test_record_and_expectations() {
        let mut profile = Profile::for_machine(&machine());
        assert!(profile.expectations("Array.map").is_empty());

        profile.record_suite(&suite_result("Array.map", &[("small", 1000.0), ("large", 10.5)]));
        let expectations = profile.expectations("Array.map");
        assert_eq!(expectations.get("small"), Some(&1000.0));
        assert_eq!(expectations.get("large"), Some(&10.5));

        let config = profile.suite_config("Array.map", 0.9, 0.6);
        assert_eq!(config.warn_threshold, 0.9);
        assert_eq!(config.classify("small", 850.0), Outcome::Warn);
    }

    #[test]
    fn test_record_overwrites_suite() {
        let mut profile = Profile::for_machine(&machine());
        profile.record_suite(&suite_result("s", &[("old", 1.0), ("kept", 2.0)]));
        profile.record_suite(&suite_result("s", &[("kept", 3.0)]));

        let tests = &profile.suites["s"].tests;
        assert_eq!(tests.len(), 1);
        assert_eq!(tests["kept"], 3.0);
    }

    #[test]
    fn test_unusable_rates_record_as_zero() {
        let mut profile = Profile::for_machine(&machine());
        profile.record_suite(&suite_result(
            "odd",
            &[("inf", f64::INFINITY), ("nan", f64::NAN), ("neg", -5.0), ("ok", 7.0)],
        ));

        let json = profile.to_json().unwrap();
        assert!(!json.contains("null"));
        let back = Profile::from_json(&json).unwrap();
        let expectations = back.expectations("odd");
        assert_eq!(expectations["inf"], 0.0);
        assert_eq!(expectations["nan"], 0.0);
        assert_eq!(expectations["neg"], 0.0);
        assert_eq!(expectations["ok"], 7.0);
        assert_eq!(back.suite_config("odd", 0.8, 0.5).classify("inf", 1.0), Outcome::Pass);
    }

    #[test]
    fn test_json_round_trip() {
        let mut profile = Profile::for_machine(&machine());
        profile.record_suite(&suite_result("a", &[("x", 1234.5)]));
        profile.record_suite(&suite_result("b", &[("y", 0.25), ("z", 99.0)]));

        let json = profile.to_json().unwrap();
        assert!(json.contains("\"node\": \"ratebench 0.3.0\""));
        let back = Profile::from_json(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_reads_legacy_timestamps() {
        let json = r#"{
          "os": "linux (x64) 5.4.0",
          "node": "12.16.1",
          "cpu": "4x Intel(R) Core(TM) i5",
          "mem": "15.5GB",
          "updated": "2020-03-01T12:00:00.000Z",
          "suites": {
            "Array.map": {
              "name": "Array.map",
              "updated": "2020-03-01T12:00:01.000Z",
              "tests": { "small": 5000000 }
            }
          }
        }"#;

        let profile = Profile::from_json(json).unwrap();
        assert_eq!(profile.runtime, "12.16.1");
        assert_eq!(profile.expectations("Array.map")["small"], 5_000_000.0);
    }

    #[test]
    fn test_malformed_profile_is_parse_error() {
        let error = Profile::from_json("{ not json").unwrap_err();
        assert!(matches!(error, ProfileError::Parse { .. }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            Profile::load(&path),
            Err(ProfileError::Parse { .. })
        ));
        assert!(matches!(
            Profile::load(dir.path().join("missing.json")),
            Err(ProfileError::Io { .. })
        ));
    }

    #[test]
    fn test_persist_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles").join("ci.json");

        let mut profile = Profile::for_machine(&machine());
        profile.record_suite(&suite_result("suite", &[("t", 42.0)]));
        profile.persist(&path).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded.expectations("suite")["t"], 42.0);
    }

    #[test]
    fn test_machine_matching_ignores_runtime() {
        let profile = Profile::for_machine(&machine());
        let mut upgraded = machine();
        upgraded.runtime = "ratebench 9.9.9".into();
        assert!(profile.matches_machine(&upgraded));

        let mut other = machine();
        other.cpu = "2x Other CPU".into();
        assert!(!profile.matches_machine(&other));
    }
}

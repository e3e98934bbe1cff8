//! Integration tests for RateBench
//!
//! These tests drive registered suites through the benchmark orchestrator,
//! the baseline profile and the file-backed reporters.

use ratebench::prelude::*;
use ratebench::{
    Benchmark, BenchmarkError, BenchmarkSettings, BoxError, Cycle, MachineInfo, Profile,
    ReportContext, Reporter, ReporterKind, ReporterOptions, Sampler, compile_filters,
    create_reporter, registered_suites,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

#[suite(name = "Integration.array")]
fn integration_array(suite: &mut Suite) -> Result<(), SuiteError> {
    suite.add("map", || {
        std::hint::black_box([1u32, 2, 3].map(|x| x * 2));
    })?;
    suite.add("sum", || {
        std::hint::black_box((0..100u32).sum::<u32>());
    })
}

#[suite]
fn integration_unit_return(suite: &mut Suite) {
    let _ = suite.add("noop", || {});
}

/// Reports a fixed rate per test and calls the routine a few times
struct FixedRates {
    rates: BTreeMap<String, f64>,
}

impl FixedRates {
    fn boxed(rates: &[(&str, f64)]) -> Box<dyn Sampler> {
        Box::new(Self {
            rates: rates.iter().map(|(n, r)| (n.to_string(), *r)).collect(),
        })
    }
}

impl Sampler for FixedRates {
    fn measure(&mut self, name: &str, routine: &mut dyn FnMut()) -> Cycle {
        for _ in 0..4 {
            routine();
        }
        Cycle {
            hz: self.rates.get(name).copied().unwrap_or(1.0),
            rme: 0.5,
            samples: 4,
            elapsed: Duration::from_millis(2),
        }
    }
}

fn file_reporter(kind: ReporterKind, path: &Path) -> Box<dyn Reporter> {
    let options = ReporterOptions {
        out: Some(path.to_path_buf()),
        colors: Some(false),
    };
    let context = ReportContext {
        name: "Integration".to_string(),
        machine: MachineInfo::collect(),
    };
    create_reporter(kind, &options, &context).unwrap()
}

fn settings(profile_out: Option<&Path>) -> BenchmarkSettings {
    BenchmarkSettings {
        name: "Integration".to_string(),
        profile_out: profile_out.map(Path::to_path_buf),
        ..BenchmarkSettings::default()
    }
}

#[test]
fn test_macro_registers_suites() {
    let names: Vec<_> = registered_suites().iter().map(|d| d.name).collect();
    assert!(names.contains(&"Integration.array"));
    assert!(names.contains(&"integration_unit_return"));

    let def = registered_suites()
        .into_iter()
        .find(|d| d.name == "Integration.array")
        .unwrap();
    assert!(def.file.ends_with("integration.rs"));
    let suite = def.build(Default::default()).unwrap();
    assert_eq!(suite.test_names().collect::<Vec<_>>(), vec!["map", "sum"]);
}

#[tokio::test]
async fn test_record_then_detect_regression() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("bench/profile.json");
    let filters = compile_filters(&["^Integration\\.array$"]).unwrap();

    // First run records the baseline; without expectations everything passes
    let mut first = Benchmark::new(
        settings(Some(&profile_path)),
        Profile::create(),
        FixedRates::boxed(&[("map", 1000.0), ("sum", 2000.0)]),
    );
    assert_eq!(first.discover(&filters).unwrap(), 1);
    assert_eq!(first.run().await.unwrap(), Outcome::Pass);

    let recorded = Profile::load(&profile_path).unwrap();
    assert_eq!(recorded.expectations("Integration.array")["map"], 1000.0);
    assert_eq!(recorded.expectations("Integration.array")["sum"], 2000.0);

    // Second run compares: map at 70% warns, sum at 40% fails
    let junit_path = dir.path().join("reports/junit.xml");
    let json_path = dir.path().join("reports/result.json");
    let mut second = Benchmark::new(
        settings(None),
        recorded,
        FixedRates::boxed(&[("map", 700.0), ("sum", 800.0)]),
    );
    second.add_reporter(file_reporter(ReporterKind::Junit, &junit_path));
    second.add_reporter(file_reporter(ReporterKind::Json, &json_path));
    second.discover(&filters).unwrap();

    assert_eq!(second.run().await.unwrap(), Outcome::Fail);
    drop(second);

    let xml = std::fs::read_to_string(&junit_path).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("name=\"Integration.array\""));
    assert!(xml.contains("<failure"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["outcome"], "fail");
    let tests = json["suites"][0]["tests"].as_array().unwrap();
    assert_eq!(tests[0]["outcome"], "warn");
    assert_eq!(tests[1]["outcome"], "fail");
    assert_eq!(tests[0]["expectationVariance"]["formatted"], "-30.00%");
}

#[tokio::test]
async fn test_pooled_data_and_before_hooks() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let setup_runs = Rc::new(RefCell::new(0));

    let mut benchmark = Benchmark::new(
        settings(None),
        Profile::create(),
        FixedRates::boxed(&[]),
    );
    let (seen_in, setup_in) = (seen.clone(), setup_runs.clone());
    benchmark
        .define("pooled", move |suite| {
            let options = TestOptions::new()
                .before(move || *setup_in.borrow_mut() += 1)
                .generate_data_array(|| vec![1, 2, 3]);
            suite.add_with(
                "cycle",
                move |data: Option<&i32>| seen_in.borrow_mut().push(data.copied()),
                options,
            )
        })
        .unwrap();

    assert_eq!(benchmark.run().await.unwrap(), Outcome::Pass);
    assert_eq!(*setup_runs.borrow(), 1);
    assert_eq!(*seen.borrow(), vec![Some(1), Some(2), Some(3), Some(1)]);
}

#[tokio::test]
async fn test_setup_failure_skips_end_and_profile() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let json_path = dir.path().join("result.json");

    let mut benchmark = Benchmark::new(
        settings(Some(&profile_path)),
        Profile::create(),
        FixedRates::boxed(&[]),
    );
    benchmark.add_reporter(file_reporter(ReporterKind::Json, &json_path));
    benchmark
        .define("unreachable fixture", |suite| {
            suite.before(|| async { Err::<(), BoxError>("connection refused".into()) })?;
            suite.add("query", || {})
        })
        .unwrap();

    let error = benchmark.run().await.unwrap_err();
    assert!(matches!(error, BenchmarkError::Suite(SuiteError::Setup { .. })));
    assert!(error.to_string().contains("unreachable fixture"));
    assert!(!profile_path.exists());
    drop(benchmark);
    assert_eq!(std::fs::read_to_string(&json_path).unwrap(), "");
}

#[test]
fn test_profile_ignores_other_machine_runtime() {
    let machine = MachineInfo::collect();
    let mut other = machine.clone();
    other.runtime = "ratebench 0.0.1".to_string();
    let profile = Profile::for_machine(&other);
    assert!(profile.matches_machine(&machine));
}

//! Suite Planner
//!
//! Selects registered suites by name and orders them.
//!
//! - No filters selects every suite
//! - Otherwise a suite runs when any filter regex matches its name
//!
//! Ordering: suites are sorted alphabetically by name for deterministic execution.

use ratebench_core::SuiteDef;
use regex::Regex;

/// Execution plan for suites
pub struct ExecutionPlan<'a> {
    /// Ordered list of suites to run
    pub suites: Vec<&'a SuiteDef>,
}

/// Compile suite filters, reporting the first invalid pattern
pub fn compile_filters<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p.as_ref())).collect()
}

/// Build execution plan from discovered suites
pub fn build_plan<'a>(
    suites: impl IntoIterator<Item = &'a SuiteDef>,
    filters: &[Regex],
) -> ExecutionPlan<'a> {
    let mut selected: Vec<_> = suites
        .into_iter()
        .filter(|s| filters.is_empty() || filters.iter().any(|re| re.is_match(s.name)))
        .collect();

    selected.sort_by_key(|s| s.name);

    ExecutionPlan { suites: selected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratebench_core::{Suite, SuiteError};

    fn noop(_: &mut Suite) -> Result<(), SuiteError> {
        Ok(())
    }

    fn make_suite(name: &'static str) -> SuiteDef {
        SuiteDef {
            name,
            define: noop,
            file: "",
            line: 0,
            module_path: "",
        }
    }

    fn names<'a>(plan: &ExecutionPlan<'a>) -> Vec<&'a str> {
        plan.suites.iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_no_filter() {
        let suites = [
            make_suite("Set.has"),
            make_suite("Array.map"),
            make_suite("Array.forEach"),
        ];

        let plan = build_plan(&suites, &[]);

        assert_eq!(names(&plan), vec!["Array.forEach", "Array.map", "Set.has"]);
    }

    #[test]
    fn test_any_filter_matches() {
        let suites = [
            make_suite("Array.map"),
            make_suite("Map.get"),
            make_suite("Set.has"),
        ];
        let filters = compile_filters(&["^Array", "^Set"]).unwrap();

        let plan = build_plan(&suites, &filters);

        assert_eq!(names(&plan), vec!["Array.map", "Set.has"]);
    }

    #[test]
    fn test_invalid_filter() {
        assert!(compile_filters(&["(unclosed"]).is_err());
    }
}

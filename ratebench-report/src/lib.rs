#![warn(missing_docs)]
//! RateBench Report - Baselines and Reporters
//!
//! - `Profile`: the baseline store, read before and written after a run
//! - `MachineInfo`: the host a baseline belongs to
//! - Reporters: terminal (`cli`), JUnit XML (`junit`) and JSON (`json`)

mod cli;
mod json;
mod junit;
mod machine;
mod profile;
mod reporter;

pub use cli::CliReporter;
pub use json::{JsonReport, JsonReporter};
pub use junit::JunitReporter;
pub use machine::{MachineInfo, hostname, runtime_version};
pub use profile::{Profile, ProfileError, ProfileSuite};
pub use reporter::{
    ReportContext, Reporter, ReporterKind, ReporterOptions, create_reporter, open_output,
};

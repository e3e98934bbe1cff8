//! Suite registration
//!
//! `#[ratebench::suite]` submits a [`SuiteDef`] for each annotated function.
//! The definition function receives the suite it should populate.

use crate::suite::{Suite, SuiteConfig, SuiteError};

/// Suite definition registered via `#[ratebench::suite]`
#[derive(Debug, Clone)]
pub struct SuiteDef {
    /// Suite name
    pub name: &'static str,
    /// Registers tests and setup callbacks on the suite
    pub define: fn(&mut Suite) -> Result<(), SuiteError>,
    /// Source file path
    pub file: &'static str,
    /// Source line number
    pub line: u32,
    /// Module path
    pub module_path: &'static str,
}

impl SuiteDef {
    /// Create a suite with `config` and run the definition function on it.
    pub fn build(&self, config: SuiteConfig) -> Result<Suite, SuiteError> {
        let mut suite = Suite::new(self.name, config);
        (self.define)(&mut suite)?;
        Ok(suite)
    }
}

inventory::collect!(SuiteDef);

/// Every linked suite definition, sorted by name
pub fn registered_suites() -> Vec<&'static SuiteDef> {
    let mut defs: Vec<_> = inventory::iter::<SuiteDef>.into_iter().collect();
    defs.sort_by(|a, b| a.name.cmp(b.name).then(a.line.cmp(&b.line)));
    defs
}

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<SuiteDef> {}
};

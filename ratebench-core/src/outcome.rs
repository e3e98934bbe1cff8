//! Outcome classification levels
//!
//! The same four-level scale is used for a single test, a suite and the
//! whole benchmark. Variants are declared in severity order so the derived
//! `Ord` is the severity order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a test, suite or benchmark run
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Nothing has been classified yet
    #[default]
    None,
    /// At or above the warn threshold
    Pass,
    /// Between the fail and warn thresholds
    Warn,
    /// Below the fail threshold
    Fail,
}

impl Outcome {
    /// The more severe of two outcomes.
    ///
    /// `Fail` dominates `Warn`, which dominates `Pass`, which dominates `None`.
    #[inline]
    pub fn worse_of(self, other: Outcome) -> Outcome {
        self.max(other)
    }

    /// Fold a sequence of outcomes with [`Outcome::worse_of`], starting from `None`.
    pub fn worst<I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        outcomes.into_iter().fold(Outcome::None, Outcome::worse_of)
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::None => "none",
            Outcome::Pass => "pass",
            Outcome::Warn => "warn",
            Outcome::Fail => "fail",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Outcome::None < Outcome::Pass);
        assert!(Outcome::Pass < Outcome::Warn);
        assert!(Outcome::Warn < Outcome::Fail);
    }

    #[test]
    fn test_worse_of_is_symmetric() {
        let all = [Outcome::None, Outcome::Pass, Outcome::Warn, Outcome::Fail];
        for a in all {
            for b in all {
                assert_eq!(a.worse_of(b), b.worse_of(a));
            }
        }
        assert_eq!(Outcome::Warn.worse_of(Outcome::Fail), Outcome::Fail);
        assert_eq!(Outcome::Pass.worse_of(Outcome::None), Outcome::Pass);
    }

    #[test]
    fn test_worst() {
        assert_eq!(Outcome::worst([]), Outcome::None);
        assert_eq!(Outcome::worst([Outcome::Pass, Outcome::Warn]), Outcome::Warn);
        assert_eq!(
            Outcome::worst([Outcome::Pass, Outcome::Fail, Outcome::Warn]),
            Outcome::Fail
        );
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Outcome::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let back: Outcome = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(back, Outcome::Fail);
        assert_eq!(Outcome::Pass.to_string(), "pass");
    }
}

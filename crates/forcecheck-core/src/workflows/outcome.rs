use super::error::HarnessError;
use crate::core::compare::VerifyReport;
use crate::core::models::config::{Prerequisite, ScenarioConfig};
use std::fmt;

/// Why a scenario was not run in a mode. A skip is never a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    PackageMissing(String),
    /// Prerequisites as checked, with the style suffix applied.
    PrerequisitesMissing(Vec<Prerequisite>),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackageMissing(package) => write!(f, "package {} is not installed", package),
            Self::PrerequisitesMissing(missing) => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                write!(f, "unavailable styles: {}", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Verified(VerifyReport),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    Generated(Box<ScenarioConfig>),
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct ModeResult {
    pub mode: String,
    pub outcome: Result<CaseOutcome, HarnessError>,
}

impl ModeResult {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.outcome, Ok(CaseOutcome::Skipped(_)))
    }
}

/// Results of one scenario across every execution mode.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<ModeResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, Ok(CaseOutcome::Verified(_))))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Process exit code: 1 when any mode failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 { 1 } else { 0 }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

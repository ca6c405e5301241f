use super::stats::{ErrorAccumulator, relative_error};
use nalgebra::Vector3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Zero-step evaluation right after setup.
    Init,
    /// Short dynamic run.
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Run => "run",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observable {
    Forces,
    Stress,
    Energy,
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forces => "forces",
            Self::Stress => "stress",
            Self::Energy => "energy",
        })
    }
}

/// A single value whose relative error exceeded the group tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub label: String,
    pub computed: f64,
    pub reference: f64,
    pub error: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: computed {:.16e}, reference {:.16e}, relative error {:.3e}",
            self.label, self.computed, self.reference, self.error
        )
    }
}

/// Outcome of comparing one observable in one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub phase: Phase,
    pub observable: Observable,
    pub tolerance: f64,
    pub stats: ErrorAccumulator,
    pub mismatches: Vec<Mismatch>,
}

impl GroupReport {
    /// Group name as used for document keys and diagnostics, e.g. `init_forces`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.phase, self.observable)
    }

    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} values exceed tolerance {:.3e}; {}",
            self.name(),
            self.mismatches.len(),
            self.stats.count(),
            self.tolerance,
            self.stats
        )
    }
}

/// Compares computed values against reference values for one group.
///
/// Every sample is fed to a fresh [`ErrorAccumulator`], and every sample
/// above the tolerance is recorded. Checking never stops early, so the
/// finished report always covers the whole group.
#[derive(Debug, Clone)]
pub struct GroupComparison {
    report: GroupReport,
}

impl GroupComparison {
    pub fn new(phase: Phase, observable: Observable, tolerance: f64) -> Self {
        Self {
            report: GroupReport {
                phase,
                observable,
                tolerance,
                stats: ErrorAccumulator::new(),
                mismatches: Vec::new(),
            },
        }
    }

    /// Checks one value. Returns `true` when it is within tolerance.
    pub fn check(&mut self, label: impl fmt::Display, computed: f64, reference: f64) -> bool {
        let error = relative_error(computed, reference);
        self.report.stats.add(error);
        // NaN never compares below the tolerance, so it is reported as a mismatch.
        if error <= self.report.tolerance {
            return true;
        }
        self.report.mismatches.push(Mismatch {
            label: label.to_string(),
            computed,
            reference,
            error,
        });
        false
    }

    /// Checks the x, y, and z components of one particle's force.
    pub fn check_vector(&mut self, tag: usize, computed: &Vector3<f64>, reference: &Vector3<f64>) {
        for (axis, name) in ["x", "y", "z"].iter().enumerate() {
            self.check(
                format_args!("tag {} {}", tag, name),
                computed[axis],
                reference[axis],
            );
        }
    }

    pub fn stats(&self) -> &ErrorAccumulator {
        &self.report.stats
    }

    pub fn finish(self) -> GroupReport {
        self.report
    }
}

/// All group reports of one verification, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub groups: Vec<GroupReport>,
}

impl VerifyReport {
    pub fn push(&mut self, group: GroupReport) {
        self.groups.push(group);
    }

    pub fn passed(&self) -> bool {
        self.groups.iter().all(GroupReport::passed)
    }

    pub fn failed_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.passed())
    }

    pub fn group(&self, phase: Phase, observable: Observable) -> Option<&GroupReport> {
        self.groups
            .iter()
            .find(|g| g.phase == phase && g.observable == observable)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<String> = self.failed_groups().map(GroupReport::name).collect();
        if failed.is_empty() {
            write!(f, "all {} groups within tolerance", self.groups.len())
        } else {
            write!(f, "groups out of tolerance: {}", failed.join(", "))
        }
    }
}

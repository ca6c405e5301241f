use super::{launcher, load_scenario, script_root};
use crate::config::Settings;
use crate::error::Result;
use forcecheck::core::compare::VerifyReport;
use forcecheck::workflows::error::HarnessError;
use forcecheck::workflows::harness::Harness;
use forcecheck::workflows::outcome::{CaseOutcome, ModeResult, RunSummary};
use std::path::Path;
use tracing::info;

/// Verifies the scenario in every configured mode and returns the process
/// exit code of the run.
pub fn run(input: &Path, print_stats: bool, settings: &Settings) -> Result<i32> {
    let config = load_scenario(input)?;
    let launcher = launcher(settings);
    let harness = Harness::new(&launcher, &config).with_script_root(script_root(input));

    info!(modes = settings.modes.len(), "Verifying scenario.");
    let summary = harness.run_modes(&settings.modes);

    for result in &summary.results {
        println!("{}", status_line(result));
        if print_stats {
            if let Some(report) = report_of(result) {
                eprint!("{}", stats_lines(&result.mode, report));
            }
        }
        if let Err(HarnessError::ToleranceExceeded { report, .. }) = &result.outcome {
            eprint!("{}", mismatch_lines(&result.mode, report));
        }
    }
    println!("{}", summary_line(input, &summary));

    Ok(summary.exit_code())
}

fn report_of(result: &ModeResult) -> Option<&VerifyReport> {
    match &result.outcome {
        Ok(CaseOutcome::Verified(report)) => Some(report),
        Err(HarnessError::ToleranceExceeded { report, .. }) => Some(report),
        _ => None,
    }
}

fn status_line(result: &ModeResult) -> String {
    match &result.outcome {
        Ok(CaseOutcome::Verified(report)) => format!("[{}] PASSED ({})", result.mode, report),
        Ok(CaseOutcome::Skipped(reason)) => format!("[{}] SKIPPED ({})", result.mode, reason),
        Err(e) => format!("[{}] FAILED: {}", result.mode, e),
    }
}

fn stats_lines(mode: &str, report: &VerifyReport) -> String {
    report
        .groups
        .iter()
        .map(|group| format!("[{}] {} stats: {}\n", mode, group.name(), group.stats))
        .collect()
}

fn mismatch_lines(mode: &str, report: &VerifyReport) -> String {
    let mut out = String::new();
    for group in report.failed_groups() {
        out.push_str(&format!("[{}] {}\n", mode, group));
        for mismatch in &group.mismatches {
            out.push_str(&format!("[{}]   {}\n", mode, mismatch));
        }
    }
    out
}

fn summary_line(input: &Path, summary: &RunSummary) -> String {
    format!("{}: {}", input.display(), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{scenario, settings, write_inputs};
    use forcecheck::core::compare::{GroupComparison, Observable, Phase};
    use forcecheck::engine::sandbox::SandboxLauncher;
    use forcecheck::workflows::outcome::{GenerateOutcome, SkipReason};
    use tempfile::tempdir;

    fn failing_report() -> VerifyReport {
        let mut energy = GroupComparison::new(Phase::Init, Observable::Energy, 1e-13);
        energy.check("energy", 5.01, 5.0);
        let mut report = VerifyReport::default();
        report.push(energy.finish());
        report
    }

    #[test]
    fn stats_lines_name_every_group() {
        let text = stats_lines("plain", &failing_report());
        assert!(text.starts_with("[plain] init_energy stats: Average:"));
        assert!(text.contains("@ item: 1"));
    }

    #[test]
    fn mismatch_lines_list_failed_samples() {
        let text = mismatch_lines("omp", &failing_report());
        assert!(text.contains("[omp] init_energy"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn skipped_mode_reports_reason() {
        let result = ModeResult {
            mode: "omp".into(),
            outcome: Ok(CaseOutcome::Skipped(SkipReason::PackageMissing("OMP".into()))),
        };
        assert_eq!(
            status_line(&result),
            "[omp] SKIPPED (package OMP is not installed)"
        );
        assert!(report_of(&result).is_none());
    }

    #[test]
    fn tolerance_failure_still_exposes_its_report() {
        let result = ModeResult {
            mode: "plain".into(),
            outcome: Err(HarnessError::ToleranceExceeded {
                mode: "plain".into(),
                report: failing_report(),
            }),
        };
        assert!(status_line(&result).starts_with("[plain] FAILED"));
        assert_eq!(report_of(&result), Some(&failing_report()));
    }

    #[test]
    fn generated_reference_verifies_with_zero_exit_code() {
        let dir = tempdir().unwrap();
        let config = scenario("harmonic", "1 300.0 1.45");
        write_inputs(dir.path(), &config, "seed.yaml");
        let reference = match Harness::new(&SandboxLauncher::new(), &config)
            .with_script_root(dir.path())
            .generate("Sun Oct 18 12:00:00 2026")
            .unwrap()
        {
            GenerateOutcome::Generated(reference) => *reference,
            other => panic!("expected generated document, got {:?}", other),
        };
        let path = write_inputs(dir.path(), &reference, "bond-harmonic.yaml");

        assert_eq!(run(&path, true, &settings()).unwrap(), 0);
    }

    #[test]
    fn stale_reference_fails_with_exit_code_one() {
        let dir = tempdir().unwrap();
        let mut config = scenario("harmonic", "1 300.0 1.45");
        config.natoms = 3;
        config.init_energy = 1.0;
        config.run_energy = 1.0;
        let path = write_inputs(dir.path(), &config, "bond-harmonic.yaml");

        assert_eq!(run(&path, false, &settings()).unwrap(), 1);
    }

    #[test]
    fn unavailable_style_is_skipped_with_zero_exit_code() {
        let dir = tempdir().unwrap();
        let config = scenario("fene", "1 30.0 1.5 1.0 1.0");
        let path = write_inputs(dir.path(), &config, "bond-fene.yaml");

        assert_eq!(run(&path, false, &settings()).unwrap(), 0);
    }
}
